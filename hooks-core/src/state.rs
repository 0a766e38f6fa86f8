use derive_more::Display;

use crate::FetchError;

/// Which of the four mutually exclusive phases a fetch is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FetchStatus {
    #[display("idle")]
    Idle,
    #[display("loading")]
    Loading,
    #[display("fetched")]
    Fetched,
    #[display("error")]
    Error,
}

/// State of a single fetch hook.
///
/// Data only exists in `Fetched` and an error only in `Failed`, so the two
/// can never be observed together.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// No URL has been requested yet.
    Idle,
    Loading,
    Fetched(T),
    Failed(FetchError),
}

/// Transitions accepted by [`FetchState::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchAction<T> {
    Loading,
    Fetched(T),
    Failed(FetchError),
    /// Return to idle, e.g. when the URL is cleared.
    Reset,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    /// Apply an action. Every action replaces the whole state, so entering
    /// `Loading` drops any previous data or error.
    pub fn reduce(self, action: FetchAction<T>) -> Self {
        match action {
            FetchAction::Loading => FetchState::Loading,
            FetchAction::Fetched(data) => FetchState::Fetched(data),
            FetchAction::Failed(error) => FetchState::Failed(error),
            FetchAction::Reset => FetchState::Idle,
        }
    }

    pub fn status(&self) -> FetchStatus {
        match self {
            FetchState::Idle => FetchStatus::Idle,
            FetchState::Loading => FetchStatus::Loading,
            FetchState::Fetched(_) => FetchStatus::Fetched,
            FetchState::Failed(_) => FetchStatus::Error,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Fetched(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, FetchState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchState::Fetched(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    /// Consume the state, keeping only fetched data.
    pub fn into_data(self) -> Option<T> {
        match self {
            FetchState::Fetched(data) => Some(data),
            _ => None,
        }
    }
}
