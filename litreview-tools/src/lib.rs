//! # litreview tools
//!
//! Bibliographic source adapters for litreview.
//! Each adapter implements [`litreview_core::sources::PaperSource`] over one
//! external search API and returns normalized paper records.

pub mod arxiv;
pub mod pubmed;
pub mod registry;
pub mod semantic_scholar;
pub mod xml;

pub use arxiv::ArxivClient;
pub use pubmed::{EntrezCredentials, PubmedClient};
pub use registry::{build_router, http_client};
pub use semantic_scholar::SemanticScholarClient;
