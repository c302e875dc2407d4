use thiserror::Error;

pub const OFFLINE_MESSAGE: &str =
    "You are currently offline. Please check your internet connection and try again.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load news. Please try again later.";
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search news. Please try again later.";

/// Errors that reach the presentation layer.
///
/// An empty result is not an error; it is presented as an empty state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Missing or placeholder credentials. Always critical.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Non-2xx response or network failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Connectivity lost. Never critical.
    #[error("offline")]
    Offline,
}

impl FeedError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
