use std::cell::Cell;
use std::rc::Rc;

use hooks_core::compositor::{
    DrawFn, LocalImageLoader, RasterCanvas, WEBP_DATA_URL_PREFIX,
};
use hooks_core::{CANVAS_HEIGHT, CANVAS_WIDTH, CompositeError, Compositor};
use image::Rgba;
use test_helpers::{decode_webp_data_url, png_data_url, write_png};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn counting_draw(count: Rc<Cell<u32>>) -> DrawFn {
    Rc::new(move |_: &mut RasterCanvas, width: u32, height: u32| {
        assert_eq!((width, height), (CANVAS_WIDTH, CANVAS_HEIGHT));
        count.set(count.get() + 1);
    })
}

#[tokio::test]
async fn pending_until_composed_then_webp() -> anyhow::Result<()> {
    test_helpers::init_tracing();
    let (_dir, path) = write_png("a.png", 8, 8, RED)?;
    let path = path.to_string_lossy().into_owned();
    let draw: DrawFn = Rc::new(|_: &mut RasterCanvas, _: u32, _: u32| {});

    let mut compositor = Compositor::new(LocalImageLoader);
    assert!(compositor.result().is_pending());
    assert_eq!(compositor.result().data_url(), None);

    let result = compositor.composite(Some(&path), Some(&draw)).await;
    let url = result.data_url().expect("composition succeeds");
    assert!(url.starts_with(WEBP_DATA_URL_PREFIX));

    let image = decode_webp_data_url(url)?;
    assert_eq!(image.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    assert_eq!(image.get_pixel(7, 7), &RED);
    assert_eq!(image.get_pixel(8, 8)[3], 0);
    Ok(())
}

#[tokio::test]
async fn callback_drawing_lands_in_output() -> anyhow::Result<()> {
    let source = png_data_url(4, 4, RED)?;
    let draw: DrawFn =
        Rc::new(|canvas: &mut RasterCanvas, width: u32, height: u32| {
            canvas.fill_rect(0, height / 2, width, 1, WHITE);
        });

    let mut compositor = Compositor::new(LocalImageLoader);
    let url = compositor
        .composite(Some(&source), Some(&draw))
        .await
        .data_url()
        .expect("composition succeeds")
        .to_string();

    let image = decode_webp_data_url(&url)?;
    assert_eq!(image.get_pixel(0, 0), &RED);
    assert_eq!(image.get_pixel(1079, 540), &WHITE);
    Ok(())
}

#[tokio::test]
async fn same_input_composes_once() -> anyhow::Result<()> {
    let source = png_data_url(2, 2, RED)?;
    let other_source = png_data_url(2, 2, WHITE)?;
    let count = Rc::new(Cell::new(0));
    let draw = counting_draw(count.clone());

    let mut compositor = Compositor::new(LocalImageLoader);
    compositor.composite(Some(&source), Some(&draw)).await;
    compositor.composite(Some(&source), Some(&draw.clone())).await;
    assert_eq!(count.get(), 1);

    // a different callback is a different input
    let replacement = counting_draw(count.clone());
    compositor.composite(Some(&source), Some(&replacement)).await;
    assert_eq!(count.get(), 2);

    compositor
        .composite(Some(&other_source), Some(&replacement))
        .await;
    assert_eq!(count.get(), 3);
    assert!(compositor.result().data_url().is_some());
    Ok(())
}

#[tokio::test]
async fn missing_source_fails_without_drawing() -> anyhow::Result<()> {
    let count = Rc::new(Cell::new(0));
    let draw = counting_draw(count.clone());

    let mut compositor = Compositor::new(LocalImageLoader);
    let result = compositor.composite(None, Some(&draw)).await;
    assert!(matches!(
        result.error(),
        Some(CompositeError::SourceUnavailable(_))
    ));
    assert_eq!(result.data_url(), None);
    assert_eq!(count.get(), 0);
    Ok(())
}

#[tokio::test]
async fn undecodable_source_is_a_decode_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png")?;
    let path = path.to_string_lossy().into_owned();

    let mut compositor = Compositor::new(LocalImageLoader);
    let result = compositor.composite(Some(&path), None).await;
    assert!(matches!(result.error(), Some(CompositeError::Decode(_))));
    Ok(())
}
