use std::rc::Rc;

use crate::CompositeError;

/// Locator used when no source is given. It never decodes.
pub const SENTINEL_SOURCE: &str = "undefined";

/// Outcome of composing one input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageResult {
    /// The source has not finished decoding.
    #[default]
    Pending,
    /// A `data:image/webp;base64,...` URL.
    Ready(String),
    Failed(CompositeError),
}

impl ImageResult {
    pub fn data_url(&self) -> Option<&str> {
        match self {
            ImageResult::Ready(url) => Some(url),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CompositeError> {
        match self {
            ImageResult::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageResult::Pending)
    }
}

impl From<Result<String, CompositeError>> for ImageResult {
    fn from(result: Result<String, CompositeError>) -> Self {
        match result {
            Ok(url) => ImageResult::Ready(url),
            Err(e) => ImageResult::Failed(e),
        }
    }
}

/// Identity of a composition input: the source locator and the address of
/// the drawing callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositionKey {
    source: String,
    draw: Option<usize>,
}

impl CompositionKey {
    pub fn new(source: Option<&str>, draw: Option<usize>) -> Self {
        Self {
            source: source.unwrap_or(SENTINEL_SOURCE).to_string(),
            draw,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Address of the value behind an `Rc`, used to tell callbacks apart.
pub fn callback_identity<T: ?Sized>(callback: &Rc<T>) -> usize {
    Rc::as_ptr(callback) as *const () as usize
}

/// One-shot completion flag per input key.
///
/// [`begin`](Self::begin) accepts each distinct key once; repeating the
/// active key is a no-op. [`finish`](Self::finish) only records a result for
/// the active key, so work started for an older key cannot overwrite the
/// current one.
#[derive(Debug)]
pub struct CompositionState<K> {
    key: Option<K>,
    result: ImageResult,
}

impl<K> Default for CompositionState<K> {
    fn default() -> Self {
        Self {
            key: None,
            result: ImageResult::Pending,
        }
    }
}

impl<K: PartialEq> CompositionState<K> {
    /// Arm for `key`. Returns false if `key` is already the active input.
    pub fn begin(&mut self, key: K) -> bool {
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.key = Some(key);
        self.result = ImageResult::Pending;
        true
    }

    /// Record the result for `key`. Returns false and discards the result if
    /// `key` is not the active input or already finished.
    pub fn finish(
        &mut self,
        key: &K,
        result: Result<String, CompositeError>,
    ) -> bool {
        if self.key.as_ref() != Some(key) || !self.result.is_pending() {
            return false;
        }
        self.result = ImageResult::from(result);
        true
    }

    pub fn result(&self) -> &ImageResult {
        &self.result
    }

    /// The input most recently accepted by [`begin`](Self::begin).
    pub fn active_key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.key.as_ref() == Some(key)
    }
}
