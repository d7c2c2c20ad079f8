//! Narrative summaries with inline citations.

use crate::brain::Brain;
use crate::citation::numbered_entry;
use crate::error::LlmError;
use crate::paper::PaperRecord;
use crate::types::Mode;
use tracing::info;

const PERSONA: &str =
    "You are a research assistant that writes structured and engaging research summaries. ";

const DIGEST_INSTRUCTIONS: &str = "\
Your goal is to write a clear, structured weekly digest of new scientific findings on the topic below. \
All studies provided were published in the past 7 days.

For each study, include a 🔗 [Read More](URL) link using the link provided after the summary.

Structure your summary as follows:
1. A 1-2 sentence introduction on why this topic matters this week
2. Key new findings, grouped logically if possible, with citations like 'In \"Paper Title\" by Smith et al., 2025...'
3. A short conclusion with emerging questions, patterns, or potential next steps

Keep it concise, insightful, and professional, like a briefing for a busy researcher.";

const INTERACTIVE_INSTRUCTIONS: &str = "\
Your goal is to help scientists and advanced students quickly understand the current state of knowledge on a topic.

Given the list of studies below, write a summary with the following structure:
1. A brief introduction on the topic and why it matters
2. A detailed exploration of main findings across studies, highlighting important scientific details like methods, results, and participants if available.
3. For each key point, mention the study title and authors (e.g., 'As shown in \"Hybrid CNN-SNN Corticomorphic Network\" by Wang et al., 2023...')
4. A concluding paragraph that summarizes the direction of research and any open questions

Write in clear, vivid language that flows like a narrative, but preserve technical accuracy.";

/// Composes the final summary from the filtered papers.
pub struct Summarizer {
    brain: Brain,
}

impl Summarizer {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }

    pub fn system_prompt(mode: Mode) -> String {
        let instructions = match mode {
            Mode::Digest => DIGEST_INSTRUCTIONS,
            Mode::Interactive => INTERACTIVE_INSTRUCTIONS,
        };
        format!("{PERSONA}{instructions}")
    }

    /// `Research topic: ...` followed by one numbered citation entry per paper.
    pub fn research_text(topic: &str, papers: &[PaperRecord]) -> String {
        let mut text = format!("Research topic: {topic}\n\n");
        for (i, paper) in papers.iter().enumerate() {
            text.push_str(&numbered_entry(i + 1, paper));
        }
        text
    }

    pub async fn summarize(
        &self,
        topic: &str,
        papers: &[PaperRecord],
        mode: Mode,
    ) -> Result<String, LlmError> {
        info!(papers = papers.len(), %mode, "Summarizing findings");
        let user = format!(
            "Summarize the following papers:\n\n{}",
            Self::research_text(topic, papers)
        );
        self.brain
            .complete_text(&Self::system_prompt(mode), &user)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::MockLlmProvider;
    use crate::paper::SourceId;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn sample() -> Vec<PaperRecord> {
        vec![
            PaperRecord::new("Paper One", SourceId::Arxiv)
                .with_summary("First.")
                .with_authors(["Smith, J", "Doe, A"])
                .with_year("2024")
                .with_url("https://arxiv.org/abs/1"),
            PaperRecord::new("Paper Two", SourceId::SemanticScholar)
                .with_summary("none")
                .with_year("2023"),
        ]
    }

    #[test]
    fn test_research_text_layout() {
        let text = Summarizer::research_text("sleep spindles", &sample());
        assert_eq!(
            text,
            "Research topic: sleep spindles\n\n\
             1. \"Paper One\" (Smith and Doe, 2024) — First.\n   🔗 https://arxiv.org/abs/1\n\n\
             2. \"Paper Two\" (Unknown, 2023) — No summary available.\n   🔗 \n\n"
        );
    }

    #[test]
    fn test_templates_differ_by_mode() {
        let digest = Summarizer::system_prompt(Mode::Digest);
        let interactive = Summarizer::system_prompt(Mode::Interactive);
        assert!(digest.contains("weekly digest"));
        assert!(digest.contains("[Read More](URL)"));
        assert!(interactive.contains("concluding paragraph"));
        assert_ne!(digest, interactive);
    }

    #[tokio::test]
    async fn test_summarize_returns_model_text() {
        let mock = Arc::new(MockLlmProvider::with_response("FIXED SUMMARY"));
        let summarizer = Summarizer::new(Brain::new(mock.clone()));
        let summary = summarizer
            .summarize("sleep spindles", &sample(), Mode::Interactive)
            .await
            .unwrap();
        assert_eq!(summary, "FIXED SUMMARY");
        let user = mock.requests()[0].last_user_prompt().unwrap().to_string();
        assert!(user.starts_with("Summarize the following papers:\n\nResearch topic: sleep spindles"));
    }

    #[tokio::test]
    async fn test_summarize_propagates_errors() {
        let mock = Arc::new(MockLlmProvider::new());
        mock.queue_error(LlmError::ApiRequest {
            message: "boom".into(),
        });
        let summarizer = Summarizer::new(Brain::new(mock));
        assert!(summarizer
            .summarize("t", &sample(), Mode::Digest)
            .await
            .is_err());
    }
}
