//! Newsfeed engine: feed source IO, fetch execution and connectivity probing.
mod connectivity;
mod engine;
mod source;
mod types;

pub use connectivity::ConnectivityProbe;
pub use engine::EngineHandle;
pub use source::{fetch_context, FeedSource, GNewsSource, SourceSettings};
pub use types::{EngineEvent, FailureKind, SourceError};
