//! Platform-neutral building blocks for the `ui` crate's hooks.
//!
//! The fetch side is a small state machine ([`FetchState`]) driven by
//! [`run_cycle`], which resolves one URL through a [`Fetcher`], consults an
//! optional per-instance [`RequestCache`], and drops its result if the
//! [`CycleToken`] it was started with has been superseded.
//!
//! The image side is the [`compositor`] module: a one-shot
//! [`CompositionState`] keyed by input identity, and a native
//! [`RasterCanvas`] that produces the same lossless WEBP data URLs the
//! browser canvas does.

pub mod cache;
pub mod compositor;
mod config;
pub mod cycle;
pub mod driver;
mod error;
pub mod fetcher;
pub mod state;

pub use cache::RequestCache;
pub use compositor::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CompositionKey, CompositionState, Compositor,
    ImageResult, RasterCanvas,
};
pub use config::FetchConfig;
pub use cycle::{CycleToken, CycleTracker};
pub use driver::{CycleOutcome, FetchController, run_cycle};
pub use error::{CompositeError, FetchError};
pub use fetcher::{FetchResponse, Fetcher, RequestOptions, ReqwestFetcher};
pub use state::{FetchAction, FetchState, FetchStatus};
