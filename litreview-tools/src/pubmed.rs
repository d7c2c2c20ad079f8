//! PubMed adapter over NCBI E-utilities.
//!
//! Two requests per search: `esearch` returns matching PMIDs, then `efetch`
//! retrieves the abstracts for that id batch as XML.

use crate::xml::{extract_blocks, extract_tag_text, extract_text};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use litreview_core::error::SourceError;
use litreview_core::paper::{PaperRecord, RawPaper, SourceId, UNKNOWN_YEAR};
use litreview_core::sources::PaperSource;
use serde::Deserialize;
use tracing::{debug, warn};

const SOURCE_NAME: &str = "PubMed";
const ARTICLE_URL_BASE: &str = "https://pubmed.ncbi.nlm.nih.gov";

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Parse the JSON `esearch` body into a PMID list.
pub fn parse_esearch(body: &str) -> Result<Vec<String>, SourceError> {
    let parsed: EsearchResponse = serde_json::from_str(body).map_err(|e| SourceError::Parse {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })?;
    Ok(parsed.esearchresult.idlist)
}

/// Parse an `efetch` XML body.
///
/// `ids` is the requested batch; an article without its own `<PMID>` takes
/// the id at the same position. Articles lacking a title or an abstract are
/// skipped.
pub fn parse_efetch(xml: &str, ids: &[String]) -> Vec<PaperRecord> {
    extract_blocks(xml, "PubmedArticle")
        .into_iter()
        .enumerate()
        .filter_map(|(i, article)| {
            let paper = parse_article(article, ids.get(i).map(String::as_str));
            if paper.is_none() {
                debug!(index = i, "Skipping PubMed article without title or abstract");
            }
            paper
        })
        .collect()
}

fn parse_article(article: &str, fallback_id: Option<&str>) -> Option<PaperRecord> {
    let title = extract_text(article, "ArticleTitle")?;
    let abstract_block = extract_tag_text(article, "Abstract")?;
    let summary = extract_text(&abstract_block, "AbstractText")?;

    let pmid = extract_tag_text(article, "PMID").or_else(|| fallback_id.map(str::to_string));
    let url = pmid.map(|id| format!("{ARTICLE_URL_BASE}/{id}"));

    let year = extract_tag_text(article, "PubDate")
        .and_then(|pub_date| extract_tag_text(&pub_date, "Year"))
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string());

    let raw = RawPaper {
        title: Some(title),
        summary: Some(summary),
        url,
        year: Some(year),
        authors: parse_authors(article),
        ..Default::default()
    };
    Some(raw.normalize(SourceId::Pubmed))
}

/// `"LastName, Initials"` per author; authors missing either part are
/// skipped, and an empty result becomes `["Unknown"]`.
pub fn parse_authors(article: &str) -> Vec<String> {
    let authors: Vec<String> = extract_tag_text(article, "AuthorList")
        .map(|list| {
            extract_blocks(&list, "Author")
                .into_iter()
                .filter_map(|author| {
                    let last = extract_text(author, "LastName")?;
                    let initials = extract_text(author, "Initials")?;
                    Some(format!("{last}, {initials}"))
                })
                .collect()
        })
        .unwrap_or_default();

    if authors.is_empty() {
        vec!["Unknown".to_string()]
    } else {
        authors
    }
}

/// Optional E-utilities identification parameters.
#[derive(Debug, Clone, Default)]
pub struct EntrezCredentials {
    pub email: Option<String>,
    pub api_key: Option<String>,
}

/// HTTP client for PubMed E-utilities.
pub struct PubmedClient {
    client: reqwest::Client,
    base_url: String,
    credentials: EntrezCredentials,
}

impl PubmedClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: EntrezCredentials::default(),
        }
    }

    pub fn with_credentials(mut self, credentials: EntrezCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    fn identity_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(email) = &self.credentials.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = &self.credentials.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    async fn get_text(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, SourceError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "PubMed request");

        let response = self
            .client
            .get(&url)
            .query(params)
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

        response.text().await.map_err(|e| SourceError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })
    }

    async fn search_ids(
        &self,
        query: &str,
        max_results: usize,
        since: Option<NaiveDate>,
    ) -> Result<Vec<String>, SourceError> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", max_results.to_string()),
            ("retmode", "json".to_string()),
        ];
        if let Some(since) = since {
            params.push(("mindate", since.format("%Y/%m/%d").to_string()));
            params.push(("maxdate", Local::now().date_naive().format("%Y/%m/%d").to_string()));
            params.push(("datetype", "pdat".to_string()));
        }
        params.extend(self.identity_params());

        let body = self.get_text("esearch.fcgi", &params).await?;
        parse_esearch(&body)
    }

    async fn fetch_abstracts(&self, ids: &[String]) -> Result<Vec<PaperRecord>, SourceError> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("rettype", "abstract".to_string()),
            ("retmode", "xml".to_string()),
        ];
        params.extend(self.identity_params());

        let body = self.get_text("efetch.fcgi", &params).await?;
        Ok(parse_efetch(&body, ids))
    }
}

#[async_trait]
impl PaperSource for PubmedClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &str,
        max_results: usize,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        if self.credentials.email.is_none() {
            warn!("No Entrez email configured; NCBI may throttle anonymous requests");
        }

        let ids = self.search_ids(query, max_results, since).await?;
        if ids.is_empty() {
            debug!(query, "PubMed search returned no ids");
            return Ok(Vec::new());
        }
        self.fetch_abstracts(&ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_EFETCH: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
<PubmedArticle>
  <MedlineCitation Status="MEDLINE" Owner="NLM">
    <PMID Version="1">38000001</PMID>
    <Article PubModel="Print">
      <Journal>
        <JournalIssue CitedMedium="Internet">
          <PubDate><Year>2023</Year><Month>Nov</Month></PubDate>
        </JournalIssue>
      </Journal>
      <ArticleTitle>CRISPR screens in <i>vivo</i>.</ArticleTitle>
      <Abstract>
        <AbstractText Label="BACKGROUND">Genome-wide screens.</AbstractText>
        <AbstractText Label="RESULTS">Second paragraph.</AbstractText>
      </Abstract>
      <AuthorList CompleteYN="Y">
        <Author ValidYN="Y"><LastName>Doudna</LastName><ForeName>Jennifer</ForeName><Initials>JA</Initials></Author>
        <Author ValidYN="Y"><CollectiveName>CRISPR Consortium</CollectiveName></Author>
        <Author ValidYN="Y"><LastName>Zhang</LastName><Initials>F</Initials></Author>
      </AuthorList>
    </Article>
  </MedlineCitation>
</PubmedArticle>
<PubmedArticle>
  <MedlineCitation>
    <Article>
      <ArticleTitle>No abstract here</ArticleTitle>
    </Article>
  </MedlineCitation>
</PubmedArticle>
<PubmedArticle>
  <MedlineCitation>
    <Article>
      <Journal><JournalIssue><PubDate><MedlineDate>2021 Winter</MedlineDate></PubDate></JournalIssue></Journal>
      <ArticleTitle>Anonymous work</ArticleTitle>
      <Abstract><AbstractText>Body.</AbstractText></Abstract>
    </Article>
  </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

    fn ids() -> Vec<String> {
        vec!["38000001".into(), "38000002".into(), "38000003".into()]
    }

    #[test]
    fn test_parse_esearch() {
        let body = r#"{"header":{"type":"esearch"},"esearchresult":{"count":"2","idlist":["1","2"]}}"#;
        assert_eq!(parse_esearch(body).unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_parse_esearch_empty_and_invalid() {
        let body = r#"{"esearchresult":{"count":"0"}}"#;
        assert!(parse_esearch(body).unwrap().is_empty());
        assert!(matches!(parse_esearch("<html>"), Err(SourceError::Parse { .. })));
    }

    #[test]
    fn test_parse_efetch_article() {
        let papers = parse_efetch(SAMPLE_EFETCH, &ids());
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.title, "CRISPR screens in vivo.");
        assert_eq!(first.summary, "Genome-wide screens.");
        assert_eq!(first.url, "https://pubmed.ncbi.nlm.nih.gov/38000001");
        assert_eq!(first.year, "2023");
        assert_eq!(first.authors, vec!["Doudna, JA", "Zhang, F"]);
        assert_eq!(first.source, SourceId::Pubmed);
    }

    #[test]
    fn test_parse_efetch_fallbacks() {
        let papers = parse_efetch(SAMPLE_EFETCH, &ids());
        let anonymous = &papers[1];
        assert_eq!(anonymous.title, "Anonymous work");
        assert_eq!(anonymous.authors, vec!["Unknown"]);
        // No PMID in the record, so the positional id is used.
        assert_eq!(anonymous.url, "https://pubmed.ncbi.nlm.nih.gov/38000003");
        assert_eq!(anonymous.year, "unknown");
    }

    #[test]
    fn test_article_set_is_not_an_article() {
        let xml = "<PubmedArticleSet></PubmedArticleSet>";
        assert!(parse_efetch(xml, &[]).is_empty());
    }
}
