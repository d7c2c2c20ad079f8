//! Pipeline orchestrator: classify, select, fetch, filter, summarize, persist.

use super::artifacts::write_metadata;
use super::classifier::DomainClassifier;
use super::filter::RelevanceFilter;
use super::selector::{TopicClassification, select_sources};
use super::summarizer::Summarizer;
use crate::brain::Brain;
use crate::config::AppConfig;
use crate::error::LitReviewError;
use crate::sources::SourceRouter;
use crate::types::{Mode, ReviewNotice, ReviewResult};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const NO_SOURCES_MESSAGE: &str = "⚠️ No sources found for this topic. Try changing your query.";
pub const NO_RELEVANT_MESSAGE: &str =
    "⚠️ No sufficiently relevant sources found. Try rephrasing your query.";
pub const NO_RELEVANT_DIGEST_MESSAGE: &str =
    "⚠️ No new relevant papers found on this topic this week.";

/// Progress reporting for a pipeline run.
pub trait PipelineCallback: Send + Sync {
    /// Called once the topic has been classified and its sources chosen.
    fn on_classified(&self, selection: &TopicClassification);
    /// Called after all sources have been queried.
    fn on_fetched(&self, total: usize);
    /// Called after relevance filtering.
    fn on_filtered(&self, kept: usize, total: usize);
    /// Called when a run surfaces an advisory.
    fn on_notice(&self, notice: &ReviewNotice);
    /// Called right before the summary is requested.
    fn on_summarizing(&self);
}

/// No-op callback.
pub struct NoOpPipelineCallback;

impl PipelineCallback for NoOpPipelineCallback {
    fn on_classified(&self, _selection: &TopicClassification) {}
    fn on_fetched(&self, _total: usize) {}
    fn on_filtered(&self, _kept: usize, _total: usize) {}
    fn on_notice(&self, _notice: &ReviewNotice) {}
    fn on_summarizing(&self) {}
}

pub struct ResearchPipeline {
    classifier: DomainClassifier,
    router: Arc<SourceRouter>,
    filter: RelevanceFilter,
    summarizer: Summarizer,
    metadata_dir: PathBuf,
    thin_result_threshold: usize,
    callback: Arc<dyn PipelineCallback>,
}

impl ResearchPipeline {
    pub fn new(brain: Brain, router: Arc<SourceRouter>, config: &AppConfig) -> Self {
        Self {
            classifier: DomainClassifier::new(brain.clone()),
            router,
            filter: RelevanceFilter::new(brain.clone()),
            summarizer: Summarizer::new(brain),
            metadata_dir: config.output.metadata_path(),
            thin_result_threshold: config.pipeline.thin_result_threshold,
            callback: Arc::new(NoOpPipelineCallback),
        }
    }

    pub fn with_callback(mut self, callback: Arc<dyn PipelineCallback>) -> Self {
        self.callback = callback;
        self
    }

    pub fn classifier(&self) -> &DomainClassifier {
        &self.classifier
    }

    /// Run one topic end to end.
    ///
    /// `since` is only forwarded to the sources in digest mode. Empty fetches
    /// and fully filtered results return a sentinel message without calling
    /// later stages. Metadata is written only after a successful summary.
    pub async fn run(
        &self,
        topic: &str,
        mode: Mode,
        since: Option<NaiveDate>,
    ) -> Result<ReviewResult, LitReviewError> {
        info!(topic = %topic, %mode, "Starting research pipeline");

        let selection = select_sources(&self.classifier, topic).await?;
        info!(
            category = %selection.category,
            sources = ?selection.sources.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "Selected sources"
        );
        self.callback.on_classified(&selection);

        let since = match mode {
            Mode::Digest => since,
            Mode::Interactive => None,
        };
        let papers = self.router.fetch_all(topic, &selection.sources, since).await;
        let total = papers.len();
        self.callback.on_fetched(total);
        if papers.is_empty() {
            warn!(topic = %topic, "No papers returned by any source");
            return Ok(ReviewResult::empty(NO_SOURCES_MESSAGE));
        }

        let relevant = self.filter.filter(papers, topic, mode).await;
        self.callback.on_filtered(relevant.len(), total);
        if relevant.is_empty() {
            let message = match mode {
                Mode::Digest => NO_RELEVANT_DIGEST_MESSAGE,
                Mode::Interactive => NO_RELEVANT_MESSAGE,
            };
            return Ok(ReviewResult::empty(message));
        }

        let notice = (mode == Mode::Interactive && relevant.len() < self.thin_result_threshold)
            .then_some(ReviewNotice::ThinResults {
                kept: relevant.len(),
                threshold: self.thin_result_threshold,
            });
        if let Some(notice) = &notice {
            warn!(kept = relevant.len(), "{notice}");
            self.callback.on_notice(notice);
        }

        self.callback.on_summarizing();
        let summary = self.summarizer.summarize(topic, &relevant, mode).await?;

        write_metadata(
            &self.metadata_dir,
            topic,
            &relevant,
            Local::now().date_naive(),
        )?;

        Ok(ReviewResult {
            summary,
            sources: relevant,
            notice,
        })
    }
}
