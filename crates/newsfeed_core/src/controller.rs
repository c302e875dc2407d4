use newsfeed_logging::{news_debug, news_info, news_warn};

use crate::error::{LOAD_FAILED_MESSAGE, OFFLINE_MESSAGE, SEARCH_FAILED_MESSAGE};
use crate::{Article, FeedError, FeedPage, QueryContext, QueryMode};

pub type RequestId = u64;

/// Decides whether a transport failure escalates to a full failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscalationPolicy {
    /// Every failed fetch is critical.
    #[default]
    Always,
    /// Only the n-th consecutive failure (and later ones) is critical.
    AfterConsecutive(u32),
}

impl EscalationPolicy {
    pub fn is_critical(self, consecutive_failures: u32) -> bool {
        match self {
            EscalationPolicy::Always => true,
            EscalationPolicy::AfterConsecutive(threshold) => {
                consecutive_failures >= threshold.max(1)
            }
        }
    }
}

/// A dispatched fetch, tagged with the context it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub request_id: RequestId,
    pub context: QueryContext,
    pub append: bool,
}

/// Single-flight bookkeeping. A fetch is in flight exactly while a ticket is held.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchState {
    in_flight: Option<FetchTicket>,
    last_context: Option<QueryContext>,
}

impl FetchState {
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn ticket(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// Snapshot of the context used by the most recent dispatch.
    pub fn last_context(&self) -> Option<&QueryContext> {
        self.last_context.as_ref()
    }

    fn begin(&mut self, ticket: FetchTicket) {
        self.last_context = Some(ticket.context.clone());
        self.in_flight = Some(ticket);
    }

    fn take_matching(&mut self, request_id: RequestId) -> Option<FetchTicket> {
        match &self.in_flight {
            Some(ticket) if ticket.request_id == request_id => self.in_flight.take(),
            _ => None,
        }
    }
}

/// Outcome of a settled fetch, ready for the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    PageReady { articles: Vec<Article>, append: bool },
    Failed { message: String, critical: bool },
}

/// Single authority over what to fetch next and whether fetching is allowed now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestController {
    default_category: String,
    context: QueryContext,
    fetch: FetchState,
    policy: EscalationPolicy,
    next_request_id: RequestId,
    /// Highest page of the current context that was applied successfully.
    loaded_page: u32,
    consecutive_failures: u32,
    halted: bool,
}

impl RequestController {
    pub fn new(
        default_category: impl Into<String>,
        page_size: u32,
        policy: EscalationPolicy,
    ) -> Self {
        let default_category = default_category.into();
        Self {
            context: QueryContext::category(default_category.clone(), page_size),
            default_category,
            fetch: FetchState::default(),
            policy,
            next_request_id: 1,
            loaded_page: 0,
            consecutive_failures: 0,
            halted: false,
        }
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn is_in_flight(&self) -> bool {
        self.fetch.in_flight()
    }

    pub fn loaded_page(&self) -> u32 {
        self.loaded_page
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Stops all future fetches. Used once a configuration error has been shown.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Loads the default category, as on an online start.
    pub fn start(&mut self) -> Option<FetchTicket> {
        let category = self.default_category.clone();
        self.select_category(&category)
    }

    pub fn select_category(&mut self, category_id: &str) -> Option<FetchTicket> {
        let category_id = category_id.trim();
        if category_id.is_empty() {
            news_debug!("Ignoring empty category selection");
            return None;
        }
        if !self.accepts("select_category") {
            return None;
        }
        self.replace_context(QueryContext::category(category_id, self.context.page_size()));
        Some(self.dispatch(false))
    }

    pub fn submit_search(&mut self, text: &str) -> Option<FetchTicket> {
        let query = text.trim();
        if query.is_empty() {
            news_debug!("Ignoring blank search submission");
            return None;
        }
        if !self.accepts("submit_search") {
            return None;
        }
        self.replace_context(QueryContext::search(query, self.context.page_size()));
        Some(self.dispatch(false))
    }

    /// Scroll-near-end intent: fetches the next page when one is believed to exist.
    pub fn request_more(&mut self) -> Option<FetchTicket> {
        if !self.accepts("request_more") {
            return None;
        }
        if !self.context.has_more() {
            news_debug!(
                "No more pages: page={} page_size={} total_known={}",
                self.context.page(),
                self.context.page_size(),
                self.context.total_known()
            );
            return None;
        }
        self.context.advance_page();
        Some(self.dispatch(true))
    }

    /// Re-issues the current context unchanged after connectivity returns.
    ///
    /// Appends only when an earlier page of this context is on screen and the
    /// current page never arrived; otherwise the feed is replaced.
    pub fn retry_after_reconnect(&mut self) -> Option<FetchTicket> {
        if !self.accepts("retry_after_reconnect") {
            return None;
        }
        let append = self.loaded_page > 0 && self.loaded_page < self.context.page();
        Some(self.dispatch(append))
    }

    /// Applies a fetch result. Returns `None` for results that do not belong to
    /// the in-flight request; those leave the in-flight flag untouched.
    pub fn settle(
        &mut self,
        request_id: RequestId,
        result: Result<FeedPage, FeedError>,
    ) -> Option<Settlement> {
        let Some(ticket) = self.fetch.take_matching(request_id) else {
            news_warn!("Ignoring completion for unknown request {}", request_id);
            return None;
        };

        match result {
            Ok(page) => {
                if let Some(total) = page.total_count {
                    self.context.set_total_known(total);
                }
                self.loaded_page = self.loaded_page.max(ticket.context.page());
                self.consecutive_failures = 0;
                news_info!(
                    "Request {} settled: {} articles, total_known={}",
                    request_id,
                    page.articles.len(),
                    self.context.total_known()
                );
                Some(Settlement::PageReady {
                    articles: page.articles,
                    append: ticket.append,
                })
            }
            Err(error) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                news_warn!(
                    "Request {} failed ({} in a row): {}",
                    request_id,
                    self.consecutive_failures,
                    error
                );
                let (message, critical) = match error {
                    FeedError::Configuration(message) => {
                        self.halted = true;
                        (message, true)
                    }
                    FeedError::Offline => (OFFLINE_MESSAGE.to_string(), false),
                    FeedError::Transport(_) => {
                        let message = match ticket.context.mode() {
                            QueryMode::Category => LOAD_FAILED_MESSAGE,
                            QueryMode::FreeText => SEARCH_FAILED_MESSAGE,
                        };
                        (
                            message.to_string(),
                            self.policy.is_critical(self.consecutive_failures),
                        )
                    }
                };
                // A critical failure wipes the feed, so nothing of this context is shown.
                if critical {
                    self.loaded_page = 0;
                }
                Some(Settlement::Failed { message, critical })
            }
        }
    }

    fn accepts(&self, intent: &str) -> bool {
        if self.halted {
            news_debug!("Dropping {} intent: controller halted", intent);
            return false;
        }
        if self.fetch.in_flight() {
            news_debug!("Dropping {} intent: fetch in flight", intent);
            return false;
        }
        true
    }

    fn replace_context(&mut self, context: QueryContext) {
        self.context = context;
        self.loaded_page = 0;
    }

    fn dispatch(&mut self, append: bool) -> FetchTicket {
        let ticket = FetchTicket {
            request_id: self.next_request_id,
            context: self.context.clone(),
            append,
        };
        self.next_request_id += 1;
        news_info!(
            "Dispatching request {}: {:?} {:?} page={} append={}",
            ticket.request_id,
            ticket.context.mode(),
            ticket.context.value(),
            ticket.context.page(),
            append
        );
        self.fetch.begin(ticket.clone());
        ticket
    }
}
