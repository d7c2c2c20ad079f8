//! Console progress output and the follow-up question loop.

use litreview_core::research::{FollowUp, PipelineCallback, is_exit_word};
use litreview_core::types::ReviewNotice;
use litreview_core::{Brain, ReviewOutcome, TopicClassification};
use std::io::{self, BufRead, Write};

/// A pipeline callback that prints stage progress to stdout.
pub(crate) struct ConsoleCallback;

impl PipelineCallback for ConsoleCallback {
    fn on_classified(&self, selection: &TopicClassification) {
        let sources = selection
            .sources
            .iter()
            .map(|s| s.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "\x1b[36m🧭 Category:\x1b[0m {} \x1b[2m({})\x1b[0m",
            selection.category, sources
        );
    }

    fn on_fetched(&self, total: usize) {
        println!("\x1b[36m📥 Fetched\x1b[0m {} candidate papers", total);
    }

    fn on_filtered(&self, kept: usize, total: usize) {
        println!("\x1b[36m🔬 Relevant:\x1b[0m {}/{}", kept, total);
    }

    fn on_notice(&self, notice: &ReviewNotice) {
        println!("\x1b[33m⚠️ {}\x1b[0m", notice);
    }

    fn on_summarizing(&self) {
        println!("\x1b[36m✍️  Summarizing...\x1b[0m");
    }
}

/// Answer follow-up questions about a finished review until the user types
/// an exit word or closes stdin.
pub async fn run_follow_up(brain: Brain, outcome: &ReviewOutcome) -> anyhow::Result<()> {
    let mut chat = FollowUp::new(brain, &outcome.refined_query, &outcome.result);
    println!("\nAsk follow-up questions about this review (type 'exit' to finish).\n");

    let stdin = io::stdin();
    loop {
        print!("\x1b[1;34m> \x1b[0m");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input).is_err() || input.is_empty() {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_word(input) {
            println!("Goodbye!");
            break;
        }

        match chat.ask(input).await {
            Ok(reply) => println!("\n{}\n", reply),
            Err(e) => {
                tracing::warn!(error = %e, "Follow-up question failed");
                eprintln!("\x1b[31mError:\x1b[0m {}", e);
            }
        }
    }
    Ok(())
}
