use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, Rgba, RgbaImage, imageops};

use crate::CompositeError;

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1080;

pub const WEBP_DATA_URL_PREFIX: &str = "data:image/webp;base64,";

/// A fixed 1080×1080 RGBA drawing surface, initially transparent.
pub struct RasterCanvas {
    pixels: RgbaImage,
}

impl Default for RasterCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterCanvas {
    pub fn new() -> Self {
        Self {
            pixels: RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Alpha-blend `image` with its top-left corner at (`x`, `y`). Parts
    /// outside the canvas are clipped.
    pub fn draw_image(&mut self, image: &DynamicImage, x: i64, y: i64) {
        imageops::overlay(&mut self.pixels, &image.to_rgba8(), x, y);
    }

    /// Fill a rectangle with a solid color, clipped to the canvas.
    pub fn fill_rect(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgba<u8>,
    ) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Encode the canvas as lossless WEBP.
    pub fn encode_webp(&self) -> Result<Vec<u8>, CompositeError> {
        let mut buffer = Vec::new();
        let encoder = WebPEncoder::new_lossless(Cursor::new(&mut buffer));
        self.pixels.write_with_encoder(encoder)?;
        Ok(buffer)
    }

    pub fn to_data_url(&self) -> Result<String, CompositeError> {
        let bytes = self.encode_webp()?;
        Ok(format!(
            "{WEBP_DATA_URL_PREFIX}{}",
            general_purpose::STANDARD.encode(bytes)
        ))
    }
}

/// Decode `source`, draw it at the origin of a fresh canvas, apply `draw`
/// with the canvas dimensions, and export a WEBP data URL.
pub fn compose(
    source: &[u8],
    draw: Option<&dyn Fn(&mut RasterCanvas, u32, u32)>,
) -> Result<String, CompositeError> {
    let image = image::load_from_memory(source)?;
    let mut canvas = RasterCanvas::new();
    canvas.draw_image(&image, 0, 0);

    if let Some(draw) = draw {
        let (width, height) = (canvas.width(), canvas.height());
        draw(&mut canvas, width, height);
    }

    canvas.to_data_url()
}
