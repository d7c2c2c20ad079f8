//! Core type definitions for litreview.
//!
//! Defines the chat message structures exchanged with the language model and
//! the run-level result types produced by the research pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::paper::PaperRecord;

/// Represents a participant role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// Token usage statistics from an LLM call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// A request to the LLM for completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub model: Option<String>,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            model: None,
        }
    }
}

impl CompletionRequest {
    /// The system prompt, if the first message carries one.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// Content of the last user message.
    pub fn last_user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// A response from the LLM.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: Message,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: Option<String>,
}

/// Which pipeline variant is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// A single ad hoc question, held to a stricter relevance bar.
    Interactive,
    /// A standing topic restricted to a recency window, with a lower relevance bar.
    Digest,
}

impl Mode {
    /// Minimum 1-5 relevance score a paper needs to be kept.
    pub fn min_relevance(&self) -> u8 {
        match self {
            Mode::Interactive => 4,
            Mode::Digest => 3,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Interactive => write!(f, "interactive"),
            Mode::Digest => write!(f, "digest"),
        }
    }
}

/// Advisory surfaced alongside an otherwise successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewNotice {
    /// Fewer relevant papers than the configured threshold survived filtering.
    ThinResults { kept: usize, threshold: usize },
}

impl fmt::Display for ReviewNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewNotice::ThinResults { .. } => write!(
                f,
                "Very few relevant papers found. The topic may be underexplored, or the query may need rephrasing."
            ),
        }
    }
}

/// Terminal artifact of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub summary: String,
    pub sources: Vec<PaperRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<ReviewNotice>,
}

impl ReviewResult {
    /// A result carrying only a sentinel message and no papers.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            summary: message.into(),
            sources: Vec::new(),
            notice: None,
        }
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("You classify queries.");
        assert_eq!(msg.role, Role::System);
        assert_eq!(msg.content, "You classify queries.");
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(Message::assistant("hello").role, Role::Assistant);
    }

    #[test]
    fn test_request_prompt_accessors() {
        let request = CompletionRequest {
            messages: vec![
                Message::system("sys"),
                Message::user("first"),
                Message::assistant("reply"),
                Message::user("second"),
            ],
            ..Default::default()
        };
        assert_eq!(request.system_prompt(), Some("sys"));
        assert_eq!(request.last_user_prompt(), Some("second"));
    }

    #[test]
    fn test_request_without_system_prompt() {
        let request = CompletionRequest {
            messages: vec![Message::user("only user")],
            ..Default::default()
        };
        assert_eq!(request.system_prompt(), None);
    }

    #[test]
    fn test_mode_thresholds() {
        assert_eq!(Mode::Interactive.min_relevance(), 4);
        assert_eq!(Mode::Digest.min_relevance(), 3);
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_empty_review_result() {
        let result = ReviewResult::empty("nothing here");
        assert!(!result.has_sources());
        assert!(result.notice.is_none());
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            input_tokens: 120,
            output_tokens: 30,
        };
        assert_eq!(usage.total(), 150);
    }
}
