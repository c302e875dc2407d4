use crate::view_model::AppViewModel;
use crate::{
    ConnectivityMonitor, EscalationPolicy, FeedPresenter, RequestController, DEFAULT_PAGE_SIZE,
};

pub(crate) const DEFAULT_CATEGORY: &str = "general";

/// Owned state for the whole feed: the single controller, presenter and monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) controller: RequestController,
    pub(crate) presenter: FeedPresenter,
    pub(crate) connectivity: ConnectivityMonitor,
    pub(crate) started: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_CATEGORY, DEFAULT_PAGE_SIZE, EscalationPolicy::Always)
    }

    pub fn with_settings(
        default_category: impl Into<String>,
        page_size: u32,
        policy: EscalationPolicy,
    ) -> Self {
        Self {
            controller: RequestController::new(default_category, page_size, policy),
            presenter: FeedPresenter::new(),
            connectivity: ConnectivityMonitor::default(),
            started: false,
            dirty: false,
        }
    }

    pub fn controller(&self) -> &RequestController {
        &self.controller
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub fn view(&self) -> AppViewModel {
        let context = self.controller.context();
        AppViewModel {
            mode: context.mode(),
            query: context.value().to_string(),
            page: context.page(),
            page_size: context.page_size(),
            total_known: context.total_known(),
            has_more: context.has_more(),
            in_flight: self.controller.is_in_flight(),
            online: self.connectivity.is_online(),
            articles_shown: self.presenter.shown(),
            halted: self.controller.is_halted(),
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
