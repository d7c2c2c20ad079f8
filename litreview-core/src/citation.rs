//! Citation formatting shared by the summarizer, transcripts, digests and
//! study-detail rendering.

use crate::paper::{NO_SUMMARY, PaperRecord};

/// Short author attribution for an inline citation.
///
/// `[]` gives `Unknown`, one author gives their surname, two give
/// `A and B`, and three or more give `A et al.`. The surname is the text
/// before the first comma, so `"Smith, J"` becomes `Smith` and a bare
/// `"Jane Smith"` is kept whole.
pub fn format_citation_authors<S: AsRef<str>>(authors: &[S]) -> String {
    match authors {
        [] => "Unknown".to_string(),
        [only] => surname(only.as_ref()).to_string(),
        [first, second] => format!(
            "{} and {}",
            surname(first.as_ref()),
            surname(second.as_ref())
        ),
        [first, ..] => format!("{} et al.", surname(first.as_ref())),
    }
}

/// `Authors, Year` as used inside parenthesised citations.
pub fn citation(paper: &PaperRecord) -> String {
    format!(
        "{}, {}",
        format_citation_authors(&paper.authors),
        paper.year
    )
}

/// Summary text with upstream placeholders replaced.
pub fn display_summary(summary: &str) -> &str {
    match summary.trim() {
        "" | "None" | "none" => NO_SUMMARY,
        _ => summary,
    }
}

/// One numbered entry of the summarizer's input listing.
pub fn numbered_entry(index: usize, paper: &PaperRecord) -> String {
    format!(
        "{index}. \"{}\" ({}) — {}\n   🔗 {}\n\n",
        paper.title,
        citation(paper),
        display_summary(&paper.summary),
        paper.url
    )
}

/// Markdown block describing one study in detail.
pub fn render_study_detail(paper: &PaperRecord) -> String {
    let url = if paper.url.is_empty() {
        "#"
    } else {
        paper.url.as_str()
    };
    format!(
        "**{}** ({})\n\n*Source: {}*\n\n{}\n\n[🔗 View Full Study]({})\n\n---\n",
        paper.title,
        citation(paper),
        capitalize(paper.source.as_str()),
        display_summary(&paper.summary),
        url
    )
}

fn surname(author: &str) -> &str {
    author.split(',').next().unwrap_or(author).trim()
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
