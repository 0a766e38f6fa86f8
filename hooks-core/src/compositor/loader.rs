use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};

use crate::CompositeError;

/// Fetches the encoded bytes behind an image locator.
#[async_trait(?Send)]
pub trait ImageLoader {
    async fn load(&self, locator: &str) -> Result<Vec<u8>, CompositeError>;
}

/// Loads base64 data URLs and, on native targets, filesystem paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalImageLoader;

#[async_trait(?Send)]
impl ImageLoader for LocalImageLoader {
    async fn load(&self, locator: &str) -> Result<Vec<u8>, CompositeError> {
        if locator.starts_with("data:") {
            return decode_data_url(locator);
        }
        read_path(locator).await
    }
}

/// Extract the payload of a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, CompositeError> {
    let (header, payload) = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| {
            CompositeError::SourceUnavailable("malformed data URL".into())
        })?;
    if !header.ends_with(";base64") {
        return Err(CompositeError::SourceUnavailable(
            "only base64 data URLs are supported".into(),
        ));
    }
    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| CompositeError::Decode(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
async fn read_path(path: &str) -> Result<Vec<u8>, CompositeError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| CompositeError::SourceUnavailable(format!("{path}: {e}")))
}

#[cfg(target_arch = "wasm32")]
async fn read_path(path: &str) -> Result<Vec<u8>, CompositeError> {
    Err(CompositeError::SourceUnavailable(format!(
        "{path}: no filesystem in the browser"
    )))
}
