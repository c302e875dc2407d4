/// Number of articles requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Category,
    FreeText,
}

/// The active request descriptor. Exactly one of category or search text is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    mode: QueryMode,
    value: String,
    page: u32,
    page_size: u32,
    total_known: u32,
}

impl QueryContext {
    pub fn category(id: impl Into<String>, page_size: u32) -> Self {
        Self::fresh(QueryMode::Category, id.into(), page_size)
    }

    pub fn search(text: impl Into<String>, page_size: u32) -> Self {
        Self::fresh(QueryMode::FreeText, text.into(), page_size)
    }

    fn fresh(mode: QueryMode, value: String, page_size: u32) -> Self {
        Self {
            mode,
            value,
            page: 1,
            page_size: page_size.max(1),
            total_known: 0,
        }
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Last reported total result count; 0 means unknown.
    pub fn total_known(&self) -> u32 {
        self.total_known
    }

    /// Whether the last reported total suggests another page exists.
    ///
    /// This is an estimate: `total_known` only reflects the last successful fetch.
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < u64::from(self.total_known)
    }

    /// True when both contexts address the same query, ignoring paging.
    pub fn same_query(&self, other: &QueryContext) -> bool {
        self.mode == other.mode && self.value == other.value
    }

    pub(crate) fn advance_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub(crate) fn set_total_known(&mut self, total: u32) {
        self.total_known = total;
    }
}
