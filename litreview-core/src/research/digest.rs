//! Weekly digest over a list of standing topics.

use super::artifacts::write_digest;
use super::pipeline::ResearchPipeline;
use crate::config::AppConfig;
use crate::error::LitReviewError;
use crate::types::{Mode, ReviewResult};
use chrono::{Duration, Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-topic results of one digest run, in topic order.
#[derive(Debug, Clone)]
pub struct DigestResult {
    pub date: NaiveDate,
    pub sections: Vec<(String, ReviewResult)>,
    pub path: PathBuf,
}

impl DigestResult {
    pub fn get(&self, topic: &str) -> Option<&ReviewResult> {
        self.sections
            .iter()
            .find(|(t, _)| t == topic)
            .map(|(_, result)| result)
    }
}

pub struct DigestScheduler {
    pipeline: Arc<ResearchPipeline>,
    digests_dir: PathBuf,
    prefix: String,
    lookback_days: i64,
}

impl DigestScheduler {
    pub fn new(pipeline: Arc<ResearchPipeline>, config: &AppConfig) -> Self {
        Self {
            pipeline,
            digests_dir: config.output.digests_path(),
            prefix: config.pipeline.artifact_prefix.clone(),
            lookback_days: config.digest.lookback_days,
        }
    }

    /// Run every topic in digest mode and write the aggregated file.
    pub async fn run_all(&self, topics: &[String]) -> Result<DigestResult, LitReviewError> {
        self.run_all_on(topics, Local::now().date_naive()).await
    }

    /// Same as [`run_all`](Self::run_all) with an explicit "today".
    ///
    /// The digest file is rewritten after every finished topic, so when a
    /// topic fails the run aborts with the header and the completed sections
    /// already on disk.
    pub async fn run_all_on(
        &self,
        topics: &[String],
        today: NaiveDate,
    ) -> Result<DigestResult, LitReviewError> {
        let since = today - Duration::days(self.lookback_days);
        info!(topics = topics.len(), since = %since, "Generating weekly digest");

        let mut sections = Vec::with_capacity(topics.len());
        let mut path = write_digest(&self.digests_dir, &self.prefix, &sections, today)?;
        for topic in topics {
            info!(topic = %topic, "Researching digest topic");
            let result = match self.pipeline.run(topic, Mode::Digest, Some(since)).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        topic = %topic,
                        completed = sections.len(),
                        path = %path.display(),
                        "Digest aborted, keeping completed sections"
                    );
                    return Err(e);
                }
            };
            info!(topic = %topic, studies = result.sources.len(), "Finished digest topic");
            sections.push((topic.clone(), result));
            path = write_digest(&self.digests_dir, &self.prefix, &sections, today)?;
        }

        info!(path = %path.display(), topics = sections.len(), "Saved weekly digest");
        Ok(DigestResult {
            date: today,
            sections,
            path,
        })
    }
}
