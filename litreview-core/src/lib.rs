//! # litreview core
//!
//! Core library for automated literature reviews.
//! Provides the LLM interface (brain), paper model, source routing, the
//! classify → fetch → filter → summarize pipeline, configuration, and
//! artifact persistence.

pub mod brain;
pub mod citation;
pub mod config;
pub mod error;
pub mod paper;
pub mod persistence;
pub mod providers;
pub mod research;
pub mod sources;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{Brain, LlmProvider, MockLlmProvider};
pub use config::AppConfig;
pub use error::{LitReviewError, Result};
pub use paper::{PaperRecord, RawPaper, SourceId};
pub use research::{
    Category, DigestResult, DigestScheduler, ResearchPipeline, ReviewOutcome, ReviewRunner,
    TopicClassification,
};
pub use sources::{AdapterKind, PaperSource, SourceRouter};
pub use types::{CompletionRequest, CompletionResponse, Message, Mode, ReviewNotice, ReviewResult, Role, TokenUsage};
