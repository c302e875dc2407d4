use crate::QueryMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub mode: QueryMode,
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub total_known: u32,
    pub has_more: bool,
    pub in_flight: bool,
    pub online: bool,
    pub articles_shown: usize,
    pub halted: bool,
}
