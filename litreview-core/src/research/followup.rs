//! Follow-up questions answered with a finished review in context.

use crate::brain::Brain;
use crate::citation::citation;
use crate::error::LlmError;
use crate::types::{Message, ReviewResult};

/// Words that end a follow-up session.
pub const EXIT_WORDS: [&str; 3] = ["exit", "quit", "stop"];

pub fn is_exit_word(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_WORDS.contains(&input.as_str())
}

/// A running conversation seeded with a review.
pub struct FollowUp {
    brain: Brain,
    history: Vec<Message>,
}

impl FollowUp {
    pub fn new(brain: Brain, topic: &str, review: &ReviewResult) -> Self {
        let mut context = format!(
            "You are a research assistant. You just wrote the literature review below on \"{topic}\". \
             Answer follow-up questions using it and the listed studies; say so when the studies \
             do not cover a question.\n\nReview:\n{}\n\nStudies:\n",
            review.summary
        );
        for paper in &review.sources {
            context.push_str(&format!(
                "- \"{}\" ({}) {}\n",
                paper.title,
                citation(paper),
                paper.url
            ));
        }
        Self {
            brain,
            history: vec![Message::system(context)],
        }
    }

    /// Ask one question; both turns are appended to the history on success.
    pub async fn ask(&mut self, question: &str) -> Result<String, LlmError> {
        let mut messages = self.history.clone();
        messages.push(Message::user(question));
        let reply = self.brain.complete_messages(messages).await?;
        self.history.push(Message::user(question));
        self.history.push(Message::assistant(reply.clone()));
        Ok(reply)
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }
}
