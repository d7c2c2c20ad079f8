//! Source registry: builds the HTTP adapters from configuration and wires
//! them into a [`SourceRouter`].

use crate::arxiv::ArxivClient;
use crate::pubmed::{EntrezCredentials, PubmedClient};
use crate::semantic_scholar::SemanticScholarClient;
use litreview_core::config::{SourcesConfig, env_secret};
use litreview_core::error::SourceError;
use litreview_core::sources::{AdapterKind, SourceRouter};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const USER_AGENT: &str = concat!("litreview/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used by every adapter.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SourceError::ClientBuild {
            message: e.to_string(),
        })
}

/// Build a router with the arXiv, PubMed and Semantic Scholar adapters
/// registered, reading optional credentials from the configured env vars.
pub fn build_router(config: &SourcesConfig) -> Result<SourceRouter, SourceError> {
    let client = http_client(config.request_timeout_secs)?;

    let arxiv = ArxivClient::new(client.clone(), config.arxiv_base_url.clone());

    let pubmed = PubmedClient::new(client.clone(), config.pubmed_base_url.clone()).with_credentials(
        EntrezCredentials {
            email: env_secret(&config.entrez_email_env),
            api_key: env_secret(&config.entrez_api_key_env),
        },
    );

    let semantic_scholar = SemanticScholarClient::new(client, config.semantic_scholar_base_url.clone())
        .with_api_key(env_secret(&config.semantic_scholar_api_key_env))
        .with_delay(Duration::from_millis(config.semantic_scholar_delay_ms));

    info!(
        max_results = config.max_results,
        parallel = config.parallel_fetch,
        dedupe = config.dedupe_by_title,
        "Source adapters registered"
    );

    Ok(SourceRouter::new(config.max_results)
        .with_adapter(AdapterKind::Arxiv, Arc::new(arxiv))
        .with_adapter(AdapterKind::Pubmed, Arc::new(pubmed))
        .with_adapter(AdapterKind::SemanticScholar, Arc::new(semantic_scholar))
        .with_parallel(config.parallel_fetch)
        .with_dedupe_by_title(config.dedupe_by_title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("litreview/"));
    }

    #[test]
    fn test_build_router_uses_config() {
        let config = SourcesConfig {
            max_results: 4,
            ..Default::default()
        };
        let router = build_router(&config).unwrap();
        assert_eq!(router.max_results(), 4);
    }
}
