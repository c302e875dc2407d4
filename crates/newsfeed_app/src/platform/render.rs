use std::io::{self, Write};

use chrono::DateTime;
use newsfeed_core::{AppViewModel, Article, CardRenderer, DisplayCommand, QueryMode};

const NO_IMAGE_PLACEHOLDER: &str = "https://via.placeholder.com/300x200?text=No+Image+Available";
const NO_RESULTS: &str = "No news articles found. Try a different search or category.";

/// Renders an article as a block of plain text.
pub struct TextCardRenderer {
    label: String,
}

impl TextCardRenderer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl CardRenderer for TextCardRenderer {
    type Element = String;

    fn render(&self, article: &Article) -> String {
        let source = article
            .source_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown Source");
        let published = article
            .published_at
            .as_deref()
            .map(format_date)
            .unwrap_or_default();
        let description = article
            .description
            .as_deref()
            .unwrap_or("No description available");
        let image = article.image.as_deref().unwrap_or(NO_IMAGE_PLACEHOLDER);

        format!(
            "{title}\n  [{label}] {source}  {published}\n  {description}\n  Image: {image}\n  Read more: {url}",
            title = article.title,
            label = self.label,
            url = article.url,
        )
    }
}

/// Formats an RFC 3339 timestamp as "May 1, 2024"; unparsable input is shown as-is.
fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn feed_label(view: &AppViewModel) -> String {
    match view.mode {
        QueryMode::Category => capitalize(&view.query),
        QueryMode::FreeText => format!("Search: {}", view.query),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Applies display commands to a line-oriented terminal.
///
/// A terminal cannot take back printed lines, so replacing the feed prints a
/// header and restarts numbering, and hiding the loading indicator is silent.
pub struct TerminalView<W: Write> {
    out: W,
    shown: usize,
    loading: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: 0,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn apply(&mut self, command: DisplayCommand, view: &AppViewModel) -> io::Result<()> {
        match command {
            DisplayCommand::ShowLoadingIndicator { append } => {
                self.loading = true;
                let text = if append {
                    "Loading more news..."
                } else {
                    "Loading news..."
                };
                writeln!(self.out, "{text}")?;
            }
            DisplayCommand::HideLoadingIndicator => {
                self.loading = false;
            }
            DisplayCommand::ReplaceFeed(articles) => {
                self.shown = 0;
                writeln!(self.out, "==== {} ====", feed_label(view))?;
                self.write_cards(&articles, view)?;
            }
            DisplayCommand::AppendToFeed(articles) => {
                self.write_cards(&articles, view)?;
            }
            DisplayCommand::ShowEmptyState => {
                self.shown = 0;
                writeln!(self.out, "{NO_RESULTS}")?;
            }
            DisplayCommand::ShowInlineError(message) => {
                writeln!(self.out, "! {message}")?;
            }
            DisplayCommand::ShowCriticalError(message) => {
                self.shown = 0;
                writeln!(self.out, "==== Error ====")?;
                writeln!(self.out, "{message}")?;
            }
        }
        self.out.flush()
    }

    pub fn status(&mut self, view: &AppViewModel) -> io::Result<()> {
        let total = if view.total_known > 0 {
            view.total_known.to_string()
        } else {
            "?".to_string()
        };
        let mut line = format!(
            "-- {} | page {} | {} of {} shown",
            feed_label(view),
            view.page,
            view.articles_shown,
            total
        );
        if view.has_more && !view.in_flight {
            line.push_str(" | 'more' for the next page");
        }
        if !view.online {
            line.push_str(" | offline");
        }
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn write_cards(&mut self, articles: &[Article], view: &AppViewModel) -> io::Result<()> {
        let renderer = TextCardRenderer::new(feed_label(view));
        for card in renderer.render_all(articles) {
            self.shown += 1;
            writeln!(self.out, "{:>3}. {}", self.shown, card)?;
        }
        Ok(())
    }
}
