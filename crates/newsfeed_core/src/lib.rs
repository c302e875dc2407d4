//! Newsfeed core: pure fetch/pagination state machine and presentation commands.
mod article;
mod card;
mod connectivity;
mod controller;
mod effect;
mod error;
mod msg;
mod presenter;
mod query;
mod state;
mod update;
mod view_model;

pub use article::{Article, FeedPage};
pub use card::CardRenderer;
pub use connectivity::{Connectivity, ConnectivityMonitor, Transition};
pub use controller::{
    EscalationPolicy, FetchState, FetchTicket, RequestController, RequestId, Settlement,
};
pub use effect::Effect;
pub use error::{FeedError, OFFLINE_MESSAGE, LOAD_FAILED_MESSAGE, SEARCH_FAILED_MESSAGE};
pub use msg::Msg;
pub use presenter::{DisplayCommand, FeedPresenter};
pub use query::{QueryContext, QueryMode, DEFAULT_PAGE_SIZE};
pub use state::AppState;
pub use update::update;
pub use view_model::AppViewModel;
