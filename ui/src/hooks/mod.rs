pub mod use_fetch;
pub mod use_wrapped_image;

pub use hooks_core::{
    FetchConfig, FetchError, FetchState, FetchStatus, ImageResult,
    RequestOptions,
};
pub use use_fetch::{use_fetch, use_fetch_with};
pub use use_wrapped_image::{DrawArgs, WrappedImage, use_wrapped_image};
