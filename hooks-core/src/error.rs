use reqwest::StatusCode;

/// Why a fetch cycle ended in the error state.
///
/// Errors are stored in hook state rather than returned to the caller, so
/// every variant owns its message and the type is `Clone + PartialEq`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status. Displays the status
    /// text.
    #[error("{status_text}")]
    Response { status: u16, status_text: String },
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),
    /// The response body could not be decoded into the expected type.
    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Build a response failure from a status code, using its canonical
    /// reason phrase when one exists.
    pub fn from_status(status: StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        FetchError::Response {
            status: status.as_u16(),
            status_text,
        }
    }

    /// True for a non-success HTTP status, false for transport or decode
    /// failures.
    pub fn is_response_failure(&self) -> bool {
        matches!(self, FetchError::Response { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::from_status(status)
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Why an image composition produced no data URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositeError {
    /// The host could not provide a 2D drawing context.
    #[error("2D drawing context is unavailable")]
    ContextUnavailable,
    #[error("Image source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Could not encode image: {0}")]
    Encode(String),
}

impl From<image::ImageError> for CompositeError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Encoding(_) => {
                CompositeError::Encode(e.to_string())
            }
            _ => CompositeError::Decode(e.to_string()),
        }
    }
}
