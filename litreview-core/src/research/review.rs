//! Single-question literature review: refine, run, write a transcript.

use super::artifacts::write_transcript;
use super::pipeline::ResearchPipeline;
use super::refine::QueryRefiner;
use crate::brain::Brain;
use crate::config::AppConfig;
use crate::error::LitReviewError;
use crate::types::{Mode, ReviewResult};
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// The query actually searched for.
    pub refined_query: String,
    pub result: ReviewResult,
    pub transcript: PathBuf,
}

pub struct ReviewRunner {
    pipeline: Arc<ResearchPipeline>,
    refiner: Option<QueryRefiner>,
    transcripts_dir: PathBuf,
    prefix: String,
}

impl ReviewRunner {
    pub fn new(pipeline: Arc<ResearchPipeline>, brain: Brain, config: &AppConfig) -> Self {
        Self {
            pipeline,
            refiner: config
                .pipeline
                .refine_query
                .then(|| QueryRefiner::new(brain)),
            transcripts_dir: config.output.transcripts_path(),
            prefix: config.pipeline.artifact_prefix.clone(),
        }
    }

    /// Skip query refinement and search the raw question.
    pub fn without_refinement(mut self) -> Self {
        self.refiner = None;
        self
    }

    pub async fn run_review(&self, question: &str) -> Result<ReviewOutcome, LitReviewError> {
        self.run_review_at(question, Local::now().naive_local()).await
    }

    pub async fn run_review_at(
        &self,
        question: &str,
        at: NaiveDateTime,
    ) -> Result<ReviewOutcome, LitReviewError> {
        let refined_query = match &self.refiner {
            Some(refiner) => refiner.refine(question).await?,
            None => question.trim().to_string(),
        };
        let result = self
            .pipeline
            .run(&refined_query, Mode::Interactive, None)
            .await?;
        let transcript =
            write_transcript(&self.transcripts_dir, &self.prefix, &refined_query, &result, at)?;
        Ok(ReviewOutcome {
            refined_query,
            result,
            transcript,
        })
    }
}
