use crate::{FeedError, FeedPage, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Application started with the environment's current connectivity.
    Startup { online: bool },
    /// Credentials or settings are unusable; no fetch may follow.
    ConfigurationInvalid(String),
    /// User picked a category.
    CategorySelected(String),
    /// User submitted a search query.
    SearchSubmitted(String),
    /// User scrolled near the end of the feed.
    ScrolledNearEnd,
    /// Environment reported a connectivity state.
    ConnectivityChanged { online: bool },
    /// Feed source settled a dispatched fetch.
    FetchCompleted {
        request_id: RequestId,
        result: Result<FeedPage, FeedError>,
    },
}
