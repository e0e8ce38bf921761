//! DuckDuckGo HTML search

use super::{SearchProvider, SearchResult};
use crate::error::{PipelineError, ProviderError, ProviderKind};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use percent_encoding::percent_decode_str;
use reqwest::Client;
use scraper::{Html, Selector};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Hits kept per search
pub const DEFAULT_MAX_RESULTS: usize = 4;

const DEFAULT_REQUESTS_PER_MINUTE: u32 = 20;

/// HTTP timeout for one search request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Search backed by the DuckDuckGo HTML endpoint
///
/// Hits are serialized as `snippet: ..., title: ..., link: ...` entries
/// joined by `", "`.
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    max_results: usize,
    request_timeout: Duration,
    rate_limiter: SharedRateLimiter,
}

impl DuckDuckGoSearch {
    /// Create a client with default limits
    pub fn new() -> Result<Self, PipelineError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: ENDPOINT.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            rate_limiter: rate_limiter(DEFAULT_REQUESTS_PER_MINUTE),
        })
    }

    /// Keep at most `max_results` hits
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Throttle to `per_minute` requests (minimum 1)
    pub fn with_rate_limit(mut self, per_minute: u32) -> Self {
        self.rate_limiter = rate_limiter(per_minute);
        self
    }

    /// Point at a different HTML endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    #[instrument(skip(self), fields(max_results = self.max_results))]
    async fn search(&self, query: &str) -> Result<SearchResult, ProviderError> {
        const PROVIDER: ProviderKind = ProviderKind::Search;

        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, &e, self.request_timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Authentication { provider: PROVIDER },
                429 => ProviderError::RateLimited {
                    provider: PROVIDER,
                    detail: format!("HTTP {status}"),
                },
                _ => ProviderError::request(PROVIDER, format!("HTTP {status}")),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, &e, self.request_timeout))?;

        let result = parse_results(&body, self.max_results)?;
        debug!(chars = result.raw_text.len(), "DuckDuckGo search complete");
        Ok(result)
    }
}

fn rate_limiter(per_minute: u32) -> SharedRateLimiter {
    let per_minute = NonZeroU32::MIN.saturating_add(per_minute.saturating_sub(1));
    Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)))
}

fn selector(css: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::unexpected(ProviderKind::Search, e))
}

/// Serialize the `.result` blocks of a DuckDuckGo HTML page
///
/// A page with no result blocks yields an empty [`SearchResult`].
pub(crate) fn parse_results(html: &str, max_results: usize) -> Result<SearchResult, ProviderError> {
    let result_sel = selector(".result")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector("a.result__snippet, .result__snippet")?;

    let doc = Html::parse_document(html);
    let mut entries = Vec::new();

    for block in doc.select(&result_sel) {
        if entries.len() == max_results {
            break;
        }

        let Some(anchor) = block.select(&link_sel).next() else {
            continue;
        };

        let title = collapse_whitespace(&anchor.text().collect::<String>());
        if title.is_empty() {
            continue;
        }

        let link = anchor
            .value()
            .attr("href")
            .map(decode_redirect)
            .unwrap_or_default();

        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        entries.push(format!("snippet: {snippet}, title: {title}, link: {link}"));
    }

    Ok(SearchResult::new(entries.join(", ")))
}

/// Result links look like `//duckduckgo.com/l/?uddg=https%3A%2F%2F...&rut=...`
fn decode_redirect(href: &str) -> String {
    let Some(pos) = href.find("uddg=") else {
        return href.to_string();
    };

    let encoded = &href[pos + 5..];
    let encoded = encoded.split('&').next().unwrap_or(encoded);

    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
