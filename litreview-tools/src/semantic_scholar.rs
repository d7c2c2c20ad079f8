//! Semantic Scholar adapter over the Graph API paper search.
//!
//! Results are always restricted to papers from the last seven days; the
//! caller's `since` is ignored. A fixed delay precedes every request to stay
//! under the public rate limit; concurrent callers wait their turn, so
//! requests stay at least one delay apart.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use litreview_core::error::SourceError;
use litreview_core::paper::{PaperRecord, RawPaper, SourceId};
use litreview_core::sources::PaperSource;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

const SOURCE_NAME: &str = "Semantic Scholar";
const SEARCH_FIELDS: &str = "title,abstract,authors,year,publicationDate,url";
const RECENCY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    url: Option<String>,
    year: Option<i32>,
    #[serde(rename = "publicationDate")]
    publication_date: Option<String>,
    #[serde(default)]
    authors: Vec<SearchAuthor>,
}

#[derive(Debug, Deserialize)]
struct SearchAuthor {
    name: Option<String>,
}

impl From<SearchItem> for RawPaper {
    fn from(item: SearchItem) -> Self {
        RawPaper {
            title: item.title,
            summary: item.abstract_text,
            url: item.url,
            year: item.year.map(|y| y.to_string()),
            publication_date: item.publication_date,
            authors: item.authors.into_iter().filter_map(|a| a.name).collect(),
            ..Default::default()
        }
    }
}

/// Parse a `/paper/search` JSON body into normalized records.
pub fn parse_search_response(body: &str) -> Result<Vec<PaperRecord>, SourceError> {
    let parsed: SearchResponse = serde_json::from_str(body).map_err(|e| SourceError::Parse {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })?;
    Ok(parsed
        .data
        .into_iter()
        .map(|item| RawPaper::from(item).normalize(SourceId::SemanticScholar))
        .collect())
}

/// The `publicationDateOrYear` filter: an open range starting seven days
/// before `today`.
pub fn recency_filter(today: NaiveDate) -> String {
    let since = today - ChronoDuration::days(RECENCY_WINDOW_DAYS);
    format!("{}:", since.format("%Y-%m-%d"))
}

/// HTTP client for the Semantic Scholar Graph API.
pub struct SemanticScholarClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    delay: Duration,
    pacing: Mutex<()>,
}

impl SemanticScholarClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            delay: Duration::from_millis(1100),
            pacing: Mutex::new(()),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Delay applied before every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sleep for the fixed delay while holding the pacing lock.
    async fn rate_limit(&self) {
        if self.delay.is_zero() {
            return;
        }
        let _turn = self.pacing.lock().await;
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl PaperSource for SemanticScholarClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &str,
        max_results: usize,
        _since: Option<NaiveDate>,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        self.rate_limit().await;

        let url = format!("{}/paper/search", self.base_url);
        let params = [
            ("query", query.to_string()),
            ("limit", max_results.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
            ("publicationDateOrYear", recency_filter(Local::now().date_naive())),
        ];
        debug!(url = %url, query, "Semantic Scholar search");

        let mut request = self.client.get(&url).query(&params);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| SourceError::Http {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                source_name: SOURCE_NAME.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;
        parse_search_response(&body)
    }
}
