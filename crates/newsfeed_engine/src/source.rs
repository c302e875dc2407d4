use std::time::Duration;

use futures_util::StreamExt;
use newsfeed_core::{Article, FeedPage, QueryContext, QueryMode};
use newsfeed_logging::news_debug;
use serde::Deserialize;
use url::Url;

use crate::{FailureKind, SourceError};

/// Performs one query against a headline or search endpoint.
///
/// Implementations must not retry: a single call is a single network attempt.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_category(
        &self,
        category: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FeedPage, SourceError>;

    async fn fetch_search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FeedPage, SourceError>;
}

/// Routes a query context to the matching endpoint of `source`.
pub async fn fetch_context(
    source: &dyn FeedSource,
    context: &QueryContext,
) -> Result<FeedPage, SourceError> {
    match context.mode() {
        QueryMode::Category => {
            source
                .fetch_category(context.value(), context.page(), context.page_size())
                .await
        }
        QueryMode::FreeText => {
            source
                .fetch_search(context.value(), context.page(), context.page_size())
                .await
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    pub api_key: String,
    pub lang: String,
    pub country: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://gnews.io/api/v4".to_string(),
            api_key: String::new(),
            lang: "en".to_string(),
            country: "us".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// GNews-compatible source: `top-headlines` for categories, `search` for queries.
#[derive(Debug, Clone)]
pub struct GNewsSource {
    settings: SourceSettings,
    client: reqwest::Client,
}

impl GNewsSource {
    pub fn new(settings: SourceSettings) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SourceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &SourceSettings {
        &self.settings
    }

    fn endpoint(
        &self,
        path: &str,
        selector: (&str, &str),
        page: u32,
        page_size: u32,
    ) -> Result<Url, SourceError> {
        let raw = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|err| SourceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair(selector.0, selector.1)
            .append_pair("lang", &self.settings.lang)
            .append_pair("country", &self.settings.country)
            .append_pair("max", &page_size.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("apikey", &self.settings.api_key);
        Ok(url)
    }

    async fn get_page(&self, url: Url) -> Result<FeedPage, SourceError> {
        // The query string carries the credential; log the path only.
        news_debug!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }

        decode_page(&body)
    }
}

#[async_trait::async_trait]
impl FeedSource for GNewsSource {
    async fn fetch_category(
        &self,
        category: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FeedPage, SourceError> {
        let url = self.endpoint("top-headlines", ("category", category), page, page_size)?;
        self.get_page(url).await
    }

    async fn fetch_search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FeedPage, SourceError> {
        let url = self.endpoint("search", ("q", query), page, page_size)?;
        self.get_page(url).await
    }
}

/// Every field is optional: the service sends `null` as readily as it omits a key.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    total_articles: Option<u32>,
    articles: Option<Vec<WireArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<WireSource>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    name: Option<String>,
}

fn decode_page(body: &[u8]) -> Result<FeedPage, SourceError> {
    let wire: WireResponse = serde_json::from_slice(body)
        .map_err(|err| SourceError::new(FailureKind::Decode, err.to_string()))?;
    let articles = wire
        .articles
        .unwrap_or_default()
        .into_iter()
        .map(|article| Article {
            url: article.url.unwrap_or_default(),
            title: article.title.unwrap_or_default(),
            description: article.description.filter(|text| !text.trim().is_empty()),
            image: article.image.filter(|src| !src.trim().is_empty()),
            source_name: article.source.and_then(|source| source.name),
            published_at: article.published_at,
        })
        .collect();
    Ok(FeedPage::new(articles, wire.total_articles))
}

fn too_large(max_bytes: u64, actual: u64) -> SourceError {
    SourceError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SourceError {
    // reqwest errors embed the request URL, which carries the API key.
    let err = err.without_url();
    if err.is_timeout() {
        return SourceError::new(FailureKind::Timeout, err.to_string());
    }
    SourceError::new(FailureKind::Network, err.to_string())
}
