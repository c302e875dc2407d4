/// A single news item. The core only relies on `url` as its identity; the
/// remaining fields are carried through untouched for the card renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub source_name: Option<String>,
    /// RFC 3339 timestamp as reported by the source.
    pub published_at: Option<String>,
}

/// One page of results as returned by a feed source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedPage {
    pub articles: Vec<Article>,
    /// Total number of matching articles, when the source reports it.
    pub total_count: Option<u32>,
}

impl FeedPage {
    pub fn new(articles: Vec<Article>, total_count: Option<u32>) -> Self {
        Self {
            articles,
            total_count,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}
