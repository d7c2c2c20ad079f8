//! Per-paper relevance scoring.

use crate::brain::Brain;
use crate::paper::PaperRecord;
use crate::types::Mode;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that scores scientific relevance.";

/// Keeps papers the model scores at or above the mode's threshold.
pub struct RelevanceFilter {
    brain: Brain,
}

impl RelevanceFilter {
    pub fn new(brain: Brain) -> Self {
        Self { brain }
    }

    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn user_prompt(query: &str, paper: &PaperRecord) -> String {
        format!(
            "Rate how relevant the following paper is to the research question:\n\
             \"{query}\"\n\n\
             Title: {}\nAbstract: {}\n\n\
             Score the relevance from 1 (not relevant) to 5 (very relevant). Only respond with the number.",
            paper.title, paper.summary
        )
    }

    /// Score each paper in order; keep those meeting [`Mode::min_relevance`].
    ///
    /// A reply that is not an integer, or a failed call, drops the paper.
    pub async fn filter(
        &self,
        papers: Vec<PaperRecord>,
        query: &str,
        mode: Mode,
    ) -> Vec<PaperRecord> {
        let threshold = mode.min_relevance();
        let total = papers.len();
        let mut kept = Vec::with_capacity(total);

        for paper in papers {
            let reply = match self
                .brain
                .complete_text(SYSTEM_PROMPT, &Self::user_prompt(query, &paper))
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(title = %paper.title, error = %e, "Skipping paper due to scoring error");
                    continue;
                }
            };

            match parse_score(&reply) {
                Some(score) if score >= threshold => {
                    debug!(title = %paper.title, score, "Paper kept");
                    kept.push(paper);
                }
                Some(score) => debug!(title = %paper.title, score, "Paper below threshold"),
                None => {
                    warn!(title = %paper.title, reply = %reply.trim(), "Unparseable relevance score")
                }
            }
        }

        info!(kept = kept.len(), total, threshold, %mode, "Relevance filtering done");
        kept
    }
}

fn parse_score(reply: &str) -> Option<u8> {
    reply.trim().parse::<u8>().ok()
}
