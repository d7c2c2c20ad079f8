//! Bibliographic source abstraction and the router that fans a query out
//! across the sources selected for a topic.
//!
//! Concrete adapters (arXiv, PubMed, Semantic Scholar) live in
//! `litreview-tools`; this module only knows the [`PaperSource`] seam and the
//! static routing rules from [`SourceId`] to adapter.

use crate::error::SourceError;
use crate::paper::{PaperRecord, SourceId};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// A bibliographic search API returning normalized paper records.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Human-readable adapter name for logs.
    fn name(&self) -> &str;

    /// Search for up to `max_results` papers. `since` restricts results to
    /// papers published on or after that date, where the API supports it.
    async fn fetch(
        &self,
        query: &str,
        max_results: usize,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PaperRecord>, SourceError>;
}

/// The concrete adapters a [`SourceId`] can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Arxiv,
    Pubmed,
    SemanticScholar,
}

/// How a source identifier is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A dedicated adapter.
    Direct(AdapterKind),
    /// Served by another adapter. `unimplemented` sources get a warning on every use.
    Fallback {
        adapter: AdapterKind,
        unimplemented: bool,
    },
    /// Nothing can serve this identifier.
    Unsupported,
}

impl Route {
    pub fn adapter(&self) -> Option<AdapterKind> {
        match self {
            Route::Direct(kind) => Some(*kind),
            Route::Fallback { adapter, .. } => Some(*adapter),
            Route::Unsupported => None,
        }
    }
}

/// Static routing from source identifier to adapter.
pub fn route(id: &SourceId) -> Route {
    match id {
        SourceId::Arxiv => Route::Direct(AdapterKind::Arxiv),
        SourceId::Pubmed => Route::Direct(AdapterKind::Pubmed),
        SourceId::SemanticScholar => Route::Direct(AdapterKind::SemanticScholar),
        SourceId::Biorxiv | SourceId::Ssrn | SourceId::Nber | SourceId::Repec => Route::Fallback {
            adapter: AdapterKind::SemanticScholar,
            unimplemented: true,
        },
        SourceId::ScienceDirect | SourceId::SpringerLink | SourceId::IeeeXplore => {
            Route::Fallback {
                adapter: AdapterKind::SemanticScholar,
                unimplemented: false,
            }
        }
        SourceId::Unsupported(_) => Route::Unsupported,
    }
}

/// Dispatches fetches for a list of selected sources and concatenates the
/// results in selection order.
///
/// Adapter failures never escape: they are logged and count as zero results.
pub struct SourceRouter {
    adapters: HashMap<AdapterKind, Arc<dyn PaperSource>>,
    max_results: usize,
    parallel: bool,
    dedupe_by_title: bool,
}

impl SourceRouter {
    pub fn new(max_results: usize) -> Self {
        Self {
            adapters: HashMap::new(),
            max_results,
            parallel: false,
            dedupe_by_title: false,
        }
    }

    pub fn with_adapter(mut self, kind: AdapterKind, source: Arc<dyn PaperSource>) -> Self {
        self.adapters.insert(kind, source);
        self
    }

    /// Run adapters concurrently. The concatenated output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_dedupe_by_title(mut self, dedupe: bool) -> Self {
        self.dedupe_by_title = dedupe;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Fetch from every source in order and concatenate.
    pub async fn fetch_all(
        &self,
        query: &str,
        sources: &[SourceId],
        since: Option<NaiveDate>,
    ) -> Vec<PaperRecord> {
        let batches: Vec<Vec<PaperRecord>> = if self.parallel {
            futures::future::join_all(sources.iter().map(|id| self.fetch_one(id, query, since)))
                .await
        } else {
            let mut batches = Vec::with_capacity(sources.len());
            for id in sources {
                batches.push(self.fetch_one(id, query, since).await);
            }
            batches
        };

        let mut papers: Vec<PaperRecord> = batches.into_iter().flatten().collect();
        if self.dedupe_by_title {
            let before = papers.len();
            let mut seen = HashSet::new();
            // Papers without a usable title are never treated as duplicates.
            papers.retain(|p| p.dedupe_key().is_none_or(|key| seen.insert(key)));
            debug!(dropped = before - papers.len(), "Removed duplicate titles");
        }
        info!(total = papers.len(), sources = sources.len(), "Fetched candidate papers");
        papers
    }

    /// Fetch from a single source, absorbing errors.
    pub async fn fetch_one(
        &self,
        id: &SourceId,
        query: &str,
        since: Option<NaiveDate>,
    ) -> Vec<PaperRecord> {
        let route = route(id);
        let kind = match &route {
            Route::Direct(kind) => *kind,
            Route::Fallback {
                adapter,
                unimplemented,
            } => {
                if *unimplemented {
                    warn!(
                        source = %id.display_name(),
                        "Source not yet implemented; falling back to Semantic Scholar"
                    );
                }
                *adapter
            }
            Route::Unsupported => {
                warn!(source = %id, "Source is not supported; skipping");
                return Vec::new();
            }
        };

        let Some(adapter) = self.adapters.get(&kind) else {
            warn!(source = %id, adapter = ?kind, "No adapter registered; skipping");
            return Vec::new();
        };

        // PubMed is always queried without a date window.
        let since = if kind == AdapterKind::Pubmed { None } else { since };

        info!(source = %id, adapter = adapter.name(), "Fetching papers");
        match adapter.fetch(query, self.max_results, since).await {
            Ok(papers) => {
                debug!(source = %id, count = papers.len(), "Source returned papers");
                papers
            }
            Err(e) => {
                warn!(source = %id, error = %e, "Source fetch failed; continuing with zero results");
                Vec::new()
            }
        }
    }
}

/// A canned [`PaperSource`] for tests and offline runs.
///
/// Returns the same papers (or the same error) on every call and records the
/// arguments it was called with.
pub struct StaticSource {
    name: String,
    papers: Vec<PaperRecord>,
    fail_with: Option<String>,
    calls: AtomicUsize,
    last_since: std::sync::Mutex<Option<Option<NaiveDate>>>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, papers: Vec<PaperRecord>) -> Self {
        Self {
            name: name.into(),
            papers,
            fail_with: None,
            calls: AtomicUsize::new(0),
            last_since: std::sync::Mutex::new(None),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// A source whose every fetch fails with `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::empty(name)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `since` argument of the most recent call, if any call was made.
    pub fn last_since(&self) -> Option<Option<NaiveDate>> {
        self.last_since.lock().ok().and_then(|s| *s)
    }
}

#[async_trait]
impl PaperSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(
        &self,
        _query: &str,
        max_results: usize,
        since: Option<NaiveDate>,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_since.lock() {
            *last = Some(since);
        }
        if let Some(message) = &self.fail_with {
            return Err(SourceError::Http {
                source_name: self.name.clone(),
                message: message.clone(),
            });
        }
        Ok(self.papers.iter().take(max_results).cloned().collect())
    }
}
