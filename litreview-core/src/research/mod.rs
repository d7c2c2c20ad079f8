//! Literature-review pipeline.
//!
//! Stages, leaves first:
//! 1. **Classify** the question into a scientific [`Category`]
//! 2. **Select** sources for the category from a static table
//! 3. **Fetch** candidate papers through the [`SourceRouter`](crate::sources::SourceRouter)
//! 4. **Filter** papers by LLM relevance score
//! 5. **Summarize** the survivors into a cited narrative
//!
//! [`ResearchPipeline`] sequences the stages for one topic; [`ReviewRunner`]
//! and [`DigestScheduler`] wrap it for single questions and weekly digests.

pub mod artifacts;
pub mod classifier;
pub mod digest;
pub mod filter;
pub mod followup;
pub mod pipeline;
pub mod refine;
pub mod review;
pub mod selector;
pub mod summarizer;

pub use classifier::{Category, DomainClassifier};
pub use digest::{DigestResult, DigestScheduler};
pub use filter::RelevanceFilter;
pub use followup::{FollowUp, is_exit_word};
pub use pipeline::{
    NO_RELEVANT_DIGEST_MESSAGE, NO_RELEVANT_MESSAGE, NO_SOURCES_MESSAGE, NoOpPipelineCallback,
    PipelineCallback, ResearchPipeline,
};
pub use refine::QueryRefiner;
pub use review::{ReviewOutcome, ReviewRunner};
pub use selector::{TopicClassification, select, select_sources};
pub use summarizer::Summarizer;
