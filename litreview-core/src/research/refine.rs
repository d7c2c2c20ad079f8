//! Rewrites conversational questions into keyword search queries.

use crate::brain::Brain;
use crate::error::LlmError;
use tracing::info;

const SYSTEM_PROMPT: &str =
    "You are an assistant that reformulates user questions into concise scientific search queries.";

pub struct QueryRefiner {
    brain: Brain,
}

impl QueryRefiner {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }

    fn user_prompt(question: &str) -> String {
        format!(
            "The user has asked a research question: \"{question}\"\n\n\
             Rewrite it into a concise, keyword-style search query that a researcher would enter into \
             Google Scholar, PubMed, or arXiv. Include specific concepts and terms, but avoid full \
             sentences, and don't add additional terms unless very relevant. Do not include \
             explanations, punctuation, or bullet points. Output only the query string.\n\n\
             Search query:"
        )
    }

    /// One LLM call. An empty reply falls back to the original question.
    pub async fn refine(&self, question: &str) -> Result<String, LlmError> {
        let reply = self
            .brain
            .complete_text(SYSTEM_PROMPT, &Self::user_prompt(question))
            .await?;
        let refined = reply.trim().trim_matches('"').trim();
        if refined.is_empty() {
            return Ok(question.trim().to_string());
        }
        info!(original = %question, refined = %refined, "Refined query");
        Ok(refined.to_string())
    }
}
