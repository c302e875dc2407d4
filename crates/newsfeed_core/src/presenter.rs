use crate::Article;

/// Presentation commands, applied in emission order by the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Full-feed loading state when replacing, trailing affordance when appending.
    ShowLoadingIndicator { append: bool },
    HideLoadingIndicator,
    ReplaceFeed(Vec<Article>),
    AppendToFeed(Vec<Article>),
    ShowEmptyState,
    /// Non-destructive notice; shown content stays visible.
    ShowInlineError(String),
    /// Full failure state replacing the feed.
    ShowCriticalError(String),
}

/// Turns fetch outcomes into display commands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedPresenter {
    pending: Vec<DisplayCommand>,
    shown: usize,
}

impl FeedPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of articles currently on screen.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn on_page_ready(&mut self, articles: Vec<Article>, append: bool) {
        match (articles.is_empty(), append) {
            (true, false) => {
                self.shown = 0;
                self.pending.push(DisplayCommand::ShowEmptyState);
            }
            // Already-shown results remain; nothing to add.
            (true, true) => {}
            (false, false) => {
                self.shown = articles.len();
                self.pending.push(DisplayCommand::ReplaceFeed(articles));
            }
            (false, true) => {
                self.shown += articles.len();
                self.pending.push(DisplayCommand::AppendToFeed(articles));
            }
        }
    }

    pub fn on_error(&mut self, message: impl Into<String>, is_critical: bool) {
        let message = message.into();
        if is_critical {
            self.shown = 0;
            self.pending.push(DisplayCommand::ShowCriticalError(message));
        } else {
            self.pending.push(DisplayCommand::ShowInlineError(message));
        }
    }

    pub fn on_fetch_started(&mut self, append: bool) {
        self.pending.push(DisplayCommand::ShowLoadingIndicator { append });
    }

    pub fn on_fetch_settled(&mut self) {
        self.pending.push(DisplayCommand::HideLoadingIndicator);
    }

    /// Drains the commands emitted since the last call.
    pub fn take_commands(&mut self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.pending)
    }
}
