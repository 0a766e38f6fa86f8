pub mod mock;

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use base64::Engine;
use hooks_core::{FetchAction, FetchState, FetchStatus};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub use mock::{Gate, MockFetcher, json_response};

/// Route logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error,hooks_core=debug"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .finish();
    let _ = LogTracer::init();
    let _ = subscriber.try_init();
}

/// PNG bytes of a solid `width` x `height` image.
pub fn png_bytes(
    width: u32,
    height: u32,
    color: Rgba<u8>,
) -> anyhow::Result<Vec<u8>> {
    let image = RgbaImage::from_pixel(width, height, color);
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// The same image as [`png_bytes`], as a `data:image/png` URL.
pub fn png_data_url(
    width: u32,
    height: u32,
    color: Rgba<u8>,
) -> anyhow::Result<String> {
    let bytes = png_bytes(width, height, color)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}

/// Decode a WEBP data URL produced by the compositor.
pub fn decode_webp_data_url(url: &str) -> anyhow::Result<RgbaImage> {
    let encoded = url
        .strip_prefix(hooks_core::compositor::WEBP_DATA_URL_PREFIX)
        .ok_or_else(|| anyhow::anyhow!("not a webp data URL: {url:.40}"))?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
    let image =
        image::load_from_memory_with_format(&bytes, ImageFormat::WebP)?;
    Ok(image.to_rgba8())
}

/// A temporary directory holding a single PNG named `name`. The file is
/// removed when the returned directory is dropped.
#[cfg(not(target_arch = "wasm32"))]
pub fn write_png(
    name: &str,
    width: u32,
    height: u32,
    color: Rgba<u8>,
) -> anyhow::Result<(tempfile::TempDir, std::path::PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    std::fs::write(&path, png_bytes(width, height, color)?)?;
    Ok((dir, path))
}

/// Run `future` on a `LocalSet` so it can spawn `!Send` cycle futures.
#[cfg(not(target_arch = "wasm32"))]
pub async fn run_local<F: std::future::Future>(future: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(future).await
}

/// Yield enough times for spawned cycles and immediate mock replies to
/// finish.
#[cfg(not(target_arch = "wasm32"))]
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Holds a fetch state the way a component would, and records every status
/// it passes through.
pub struct Recorder<T> {
    state: Rc<RefCell<FetchState<T>>>,
    history: Rc<RefCell<Vec<FetchStatus>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            history: self.history.clone(),
        }
    }
}

impl<T: Clone + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FetchState::Idle)),
            history: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A dispatch callback applying actions to this recorder.
    pub fn dispatcher(&self) -> impl Fn(FetchAction<T>) + 'static {
        let recorder = self.clone();
        move |action| {
            let mut state = recorder.state.borrow_mut();
            let next = std::mem::take(&mut *state).reduce(action);
            recorder.history.borrow_mut().push(next.status());
            *state = next;
        }
    }

    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    pub fn history(&self) -> Vec<FetchStatus> {
        self.history.borrow().clone()
    }
}

impl<T: Clone + 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}
