use std::fmt;

use newsfeed_core::{FeedError, FeedPage, RequestId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FetchCompleted {
        request_id: RequestId,
        result: Result<FeedPage, SourceError>,
    },
    ConnectivityChanged {
        online: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SourceError {
    pub kind: FailureKind,
    pub message: String,
}

impl SourceError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Rejected credentials are a configuration problem; everything else is transport.
impl From<SourceError> for FeedError {
    fn from(err: SourceError) -> Self {
        match err.kind {
            FailureKind::HttpStatus(401 | 403) => FeedError::Configuration(format!(
                "The news service rejected the API key ({err}). Please check your API key."
            )),
            _ => FeedError::Transport(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_key_maps_to_configuration_error() {
        let err = SourceError::new(FailureKind::HttpStatus(401), "401 Unauthorized");
        assert!(matches!(FeedError::from(err), FeedError::Configuration(_)));

        let err = SourceError::new(FailureKind::Timeout, "operation timed out");
        assert_eq!(
            FeedError::from(err),
            FeedError::Transport("timeout: operation timed out".to_string())
        );
    }
}
