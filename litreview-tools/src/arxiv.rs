//! arXiv adapter over the Atom search API.
//!
//! Keyword search across all fields. With a `since` date the query gains a
//! `submittedDate` range and results come newest first; without one they
//! come in relevance order.

use crate::xml::{extract_attribute, extract_blocks, extract_tag_text, extract_text};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use litreview_core::error::SourceError;
use litreview_core::paper::{PaperRecord, RawPaper, SourceId};
use litreview_core::sources::PaperSource;
use tracing::debug;

const SOURCE_NAME: &str = "arXiv";

/// Sort criterion accepted by the arXiv API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArxivSortBy {
    Relevance,
    SubmittedDate,
}

impl ArxivSortBy {
    pub fn as_api_str(&self) -> &str {
        match self {
            Self::Relevance => "relevance",
            Self::SubmittedDate => "submittedDate",
        }
    }
}

/// Build the `search_query` expression.
///
/// `since` adds `submittedDate:[<since>0000 TO <today>0000]`.
pub fn build_search_query(query: &str, since: Option<NaiveDate>, today: NaiveDate) -> String {
    let mut search_query = format!("all:{query}");
    if let Some(since) = since {
        search_query = format!(
            "{search_query} AND submittedDate:[{}0000 TO {}0000]",
            since.format("%Y%m%d"),
            today.format("%Y%m%d"),
        );
    }
    search_query
}

/// Build the full request URL for a search.
pub fn build_search_url(
    base_url: &str,
    query: &str,
    max_results: usize,
    since: Option<NaiveDate>,
    today: NaiveDate,
) -> String {
    let sort_by = if since.is_some() {
        ArxivSortBy::SubmittedDate
    } else {
        ArxivSortBy::Relevance
    };
    format!(
        "{}?search_query={}&start=0&max_results={}&sortBy={}&sortOrder=descending",
        base_url,
        urlencoding::encode(&build_search_query(query, since, today)),
        max_results,
        sort_by.as_api_str(),
    )
}

/// Parse an Atom feed into normalized records, one per `<entry>`.
pub fn parse_atom_feed(xml: &str) -> Vec<PaperRecord> {
    extract_blocks(xml, "entry")
        .into_iter()
        .map(|entry| parse_entry(entry).normalize(SourceId::Arxiv))
        .collect()
}

fn parse_entry(entry: &str) -> RawPaper {
    let authors = extract_blocks(entry, "author")
        .into_iter()
        .filter_map(|block| extract_text(block, "name"))
        .collect();

    RawPaper {
        title: extract_text(entry, "title"),
        summary: extract_text(entry, "summary"),
        url: extract_tag_text(entry, "id"),
        link: alternate_link(entry),
        published: extract_tag_text(entry, "published"),
        authors,
        ..Default::default()
    }
}

/// The `rel="alternate"` link, used when an entry lacks an `<id>`.
fn alternate_link(entry: &str) -> Option<String> {
    let mut search = 0;
    while let Some(pos) = entry[search..].find("<link") {
        let start = search + pos;
        let end = entry[start..].find('>').map(|e| start + e + 1)?;
        let tag = &entry[start..end];
        if extract_attribute(tag, "rel").as_deref() == Some("alternate") {
            return extract_attribute(tag, "href");
        }
        search = end;
    }
    None
}

/// HTTP client for the arXiv API.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &str,
        max_results: usize,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        let today = Local::now().date_naive();
        let url = build_search_url(&self.base_url, query, max_results, since, today);
        debug!(url = %url, "arXiv search");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Http {
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

        let mut papers = parse_atom_feed(&body);
        papers.truncate(max_results);
        Ok(papers)
    }
}
