//! Image composition: draw a source image on a fixed-size canvas, let the
//! caller draw over it, and export the result as a lossless WEBP data URL.
//!
//! The browser hook uses [`CompositionState`] and [`ImageResult`] around an
//! HTML canvas. Everything else here is the native counterpart built on the
//! `image` crate.

mod canvas;
mod loader;
mod state;

pub use canvas::{
    CANVAS_HEIGHT, CANVAS_WIDTH, RasterCanvas, WEBP_DATA_URL_PREFIX, compose,
};
pub use loader::{ImageLoader, LocalImageLoader, decode_data_url};
pub use state::{
    CompositionKey, CompositionState, ImageResult, SENTINEL_SOURCE,
    callback_identity,
};

use std::rc::Rc;

/// Caller drawing applied after the source image, given the canvas width
/// and height.
pub type DrawFn = Rc<dyn Fn(&mut RasterCanvas, u32, u32)>;

/// Runs compositions for one consumer, once per distinct input.
pub struct Compositor<L> {
    loader: L,
    state: CompositionState<CompositionKey>,
}

impl<L: ImageLoader> Compositor<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            state: CompositionState::default(),
        }
    }

    /// The latest result for the most recent input.
    pub fn result(&self) -> &ImageResult {
        self.state.result()
    }

    /// Compose `source` with `draw` unless this exact input has already been
    /// composed, and return the current result.
    pub async fn composite(
        &mut self,
        source: Option<&str>,
        draw: Option<&DrawFn>,
    ) -> &ImageResult {
        let key = CompositionKey::new(source, draw.map(callback_identity));
        if !self.state.begin(key.clone()) {
            return self.state.result();
        }

        let result = match self.loader.load(key.source()).await {
            Ok(bytes) => compose(&bytes, draw.map(|draw| &**draw)),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!(source = key.source(), "Composition failed: {e}");
        }
        self.state.finish(&key, result);
        self.state.result()
    }
}
