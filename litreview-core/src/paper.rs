//! Paper records and source identifiers.
//!
//! Every adapter converts its upstream payload into a [`RawPaper`] and calls
//! [`RawPaper::normalize`] exactly once, so downstream stages only ever see a
//! fully-populated [`PaperRecord`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

pub const UNTITLED: &str = "Untitled";
pub const NO_SUMMARY: &str = "No summary available.";
pub const UNKNOWN_YEAR: &str = "unknown";

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year pattern is valid"));

/// A bibliographic source identifier.
///
/// Parsed case-insensitively from the lowercase wire identifiers used in the
/// category table and in persisted metadata. Identifiers with no known
/// meaning become [`SourceId::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceId {
    Arxiv,
    Pubmed,
    SemanticScholar,
    Biorxiv,
    Ssrn,
    Nber,
    Repec,
    ScienceDirect,
    SpringerLink,
    IeeeXplore,
    Unsupported(String),
}

impl SourceId {
    /// Every identifier with a known meaning, in declaration order.
    pub const KNOWN: [SourceId; 10] = [
        SourceId::Arxiv,
        SourceId::Pubmed,
        SourceId::SemanticScholar,
        SourceId::Biorxiv,
        SourceId::Ssrn,
        SourceId::Nber,
        SourceId::Repec,
        SourceId::ScienceDirect,
        SourceId::SpringerLink,
        SourceId::IeeeXplore,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "arxiv" => SourceId::Arxiv,
            "pubmed" => SourceId::Pubmed,
            "semantic_scholar" => SourceId::SemanticScholar,
            "biorxiv" => SourceId::Biorxiv,
            "ssrn" => SourceId::Ssrn,
            "nber" => SourceId::Nber,
            "repec" => SourceId::Repec,
            "sciencedirect" => SourceId::ScienceDirect,
            "springerlink" => SourceId::SpringerLink,
            "ieee_xplore" => SourceId::IeeeXplore,
            other => SourceId::Unsupported(other.to_string()),
        }
    }

    /// Wire identifier.
    pub fn as_str(&self) -> &str {
        match self {
            SourceId::Arxiv => "arxiv",
            SourceId::Pubmed => "pubmed",
            SourceId::SemanticScholar => "semantic_scholar",
            SourceId::Biorxiv => "biorxiv",
            SourceId::Ssrn => "ssrn",
            SourceId::Nber => "nber",
            SourceId::Repec => "repec",
            SourceId::ScienceDirect => "sciencedirect",
            SourceId::SpringerLink => "springerlink",
            SourceId::IeeeXplore => "ieee_xplore",
            SourceId::Unsupported(raw) => raw,
        }
    }

    /// Human-readable name for logs and rendered output.
    pub fn display_name(&self) -> &str {
        match self {
            SourceId::Arxiv => "arXiv",
            SourceId::Pubmed => "PubMed",
            SourceId::SemanticScholar => "Semantic Scholar",
            SourceId::Biorxiv => "bioRxiv",
            SourceId::Ssrn => "SSRN",
            SourceId::Nber => "NBER",
            SourceId::Repec => "RePEc",
            SourceId::ScienceDirect => "ScienceDirect",
            SourceId::SpringerLink => "SpringerLink",
            SourceId::IeeeXplore => "IEEE Xplore",
            SourceId::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for SourceId {
    fn from(raw: String) -> Self {
        SourceId::parse(&raw)
    }
}

impl From<&str> for SourceId {
    fn from(raw: &str) -> Self {
        SourceId::parse(raw)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.as_str().to_string()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized paper as returned by every source adapter.
///
/// Field order matches the persisted metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub summary: String,
    pub source: SourceId,
    pub authors: Vec<String>,
    /// Four-digit year or `"unknown"`.
    pub year: String,
    pub url: String,
}

impl PaperRecord {
    /// A record with placeholder values for everything but the title and source.
    pub fn new(title: impl Into<String>, source: SourceId) -> Self {
        Self {
            title: title.into(),
            summary: NO_SUMMARY.to_string(),
            source,
            authors: Vec::new(),
            year: UNKNOWN_YEAR.to_string(),
            url: String::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Lowercased alphanumeric title, used for cross-source duplicate detection.
    pub fn title_key(&self) -> String {
        self.title
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// The title key, or `None` when the title carries no identity: the
    /// placeholder for a missing title, or one with no alphanumerics.
    pub fn dedupe_key(&self) -> Option<String> {
        if self.title == UNTITLED {
            return None;
        }
        let key = self.title_key();
        (!key.is_empty()).then_some(key)
    }
}

/// An upstream paper before normalization.
///
/// Carries every optional field an adapter may see, including the alternative
/// summary and date fields some APIs use.
#[derive(Debug, Clone, Default)]
pub struct RawPaper {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub snippet: Option<String>,
    pub url: Option<String>,
    pub link: Option<String>,
    pub year: Option<String>,
    pub published: Option<String>,
    pub publication_date: Option<String>,
    pub date: Option<String>,
    pub authors: Vec<String>,
}

impl RawPaper {
    /// First 19xx/20xx year found in `year`, `published`, `publication_date`, then `date`.
    pub fn extract_year(&self) -> String {
        [
            &self.year,
            &self.published,
            &self.publication_date,
            &self.date,
        ]
        .into_iter()
        .flatten()
        .find_map(|raw| year_in(raw))
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
    }

    /// Apply every fallback once and produce the canonical record.
    pub fn normalize(self, source: SourceId) -> PaperRecord {
        let year = self.extract_year();
        let title = self
            .title
            .filter(|t| !is_placeholder(t))
            .unwrap_or_else(|| UNTITLED.to_string());
        let summary = self
            .summary
            .filter(|s| !is_placeholder(s))
            .or(self.snippet.filter(|s| !is_placeholder(s)))
            .unwrap_or_else(|| NO_SUMMARY.to_string());
        let url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .or(self.link)
            .unwrap_or_default();
        let authors = self
            .authors
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        PaperRecord {
            title,
            summary,
            source,
            authors,
            year,
            url,
        }
    }
}

/// Extract a 19xx/20xx year from free text.
pub fn year_in(text: &str) -> Option<String> {
    YEAR_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// Upstream APIs use `None`, `"None"` and blank strings interchangeably for missing text.
fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none")
}
