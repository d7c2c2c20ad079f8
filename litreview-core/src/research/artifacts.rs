//! Date-stamped artifact files: per-topic metadata, review transcripts and
//! weekly digests.
//!
//! Rendering is separated from writing so the exact text layout can be
//! tested without touching the filesystem. Timestamps are always passed in.

use crate::paper::PaperRecord;
use crate::persistence::{atomic_write, atomic_write_json, normalize_filename};
use crate::types::ReviewResult;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const HEAVY_RULE_WIDTH: usize = 60;

/// `<dir>/<normalized_topic>_<YYYY-MM-DD>.json`
pub fn metadata_path(dir: &Path, topic: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!(
        "{}_{}.json",
        normalize_filename(topic),
        date.format("%Y-%m-%d")
    ))
}

/// Persist the filtered paper set for `topic`. Same topic on the same day overwrites.
pub fn write_metadata(
    dir: &Path,
    topic: &str,
    papers: &[PaperRecord],
    date: NaiveDate,
) -> io::Result<PathBuf> {
    let path = metadata_path(dir, topic, date);
    atomic_write_json(&path, &papers)?;
    info!(path = %path.display(), papers = papers.len(), "Saved study metadata");
    Ok(path)
}

pub fn transcript_path(dir: &Path, prefix: &str, at: NaiveDateTime) -> PathBuf {
    dir.join(format!(
        "{prefix}_lit_review_{}.txt",
        at.format("%Y-%m-%d_%H-%M")
    ))
}

pub fn render_transcript(refined_topic: &str, result: &ReviewResult, at: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "📚 Literature Review — {}",
        at.format("%Y-%m-%d_%H-%M")
    );
    let _ = writeln!(out, "{}\n", "=".repeat(HEAVY_RULE_WIDTH));
    let _ = writeln!(out, "🔍 Topic: {refined_topic}\n");
    let _ = writeln!(out, "{}\n", result.summary);
    let _ = writeln!(out, "📖 Sources:");
    for paper in &result.sources {
        let _ = writeln!(out, "- {} ({})", paper.title, paper.year);
        let _ = writeln!(out, "  {}\n", paper.url);
    }
    out
}

pub fn write_transcript(
    dir: &Path,
    prefix: &str,
    refined_topic: &str,
    result: &ReviewResult,
    at: NaiveDateTime,
) -> io::Result<PathBuf> {
    let path = transcript_path(dir, prefix, at);
    atomic_write(&path, render_transcript(refined_topic, result, at).as_bytes())?;
    info!(path = %path.display(), "Saved review transcript");
    Ok(path)
}

pub fn digest_path(dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!(
        "{prefix}_weekly_digest_{}.txt",
        date.format("%Y-%m-%d")
    ))
}

/// Header, then one section per topic in the given order.
pub fn render_digest(sections: &[(String, ReviewResult)], date: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🧠 Weekly Digest — {}", date.format("%Y-%m-%d"));
    let _ = writeln!(out, "{}\n", "=".repeat(HEAVY_RULE_WIDTH));
    for (topic, result) in sections {
        let _ = writeln!(out, "🔹 Topic: {topic}\n\n{}", result.summary);
        let _ = writeln!(out, "{}\n", "-".repeat(HEAVY_RULE_WIDTH));
    }
    out
}

pub fn write_digest(
    dir: &Path,
    prefix: &str,
    sections: &[(String, ReviewResult)],
    date: NaiveDate,
) -> io::Result<PathBuf> {
    let path = digest_path(dir, prefix, date);
    atomic_write(&path, render_digest(sections, date).as_bytes())?;
    debug!(path = %path.display(), topics = sections.len(), "Wrote weekly digest");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::SourceId;
    use crate::persistence::load_json;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn at() -> NaiveDateTime {
        date().and_hms_opt(9, 5, 0).unwrap()
    }

    #[test]
    fn test_metadata_path() {
        assert_eq!(
            metadata_path(Path::new("out"), "Transformer attention mechanisms", date()),
            PathBuf::from("out/transformer_attention_mechanisms_2025-03-14.json")
        );
    }

    #[test]
    fn test_write_metadata_roundtrip() {
        let dir = TempDir::new().unwrap();
        let papers = vec![PaperRecord::new("A", SourceId::Arxiv).with_year("2024")];
        let path = write_metadata(dir.path(), "topic", &papers, date()).unwrap();
        let loaded: Vec<PaperRecord> = load_json(&path).unwrap().unwrap();
        assert_eq!(loaded, papers);
    }

    #[test]
    fn test_render_transcript() {
        let result = ReviewResult {
            summary: "Summary body.".into(),
            sources: vec![
                PaperRecord::new("Paper A", SourceId::Arxiv)
                    .with_year("2024")
                    .with_url("https://arxiv.org/abs/1"),
            ],
            notice: None,
        };
        let rendered = render_transcript("attention", &result, at());
        let expected = format!(
            "📚 Literature Review — 2025-03-14_09-05\n{}\n\n🔍 Topic: attention\n\nSummary body.\n\n📖 Sources:\n- Paper A (2024)\n  https://arxiv.org/abs/1\n\n",
            "=".repeat(60)
        );
        assert_eq!(rendered, expected);
        assert_eq!(
            transcript_path(Path::new("lit_reviews"), "litreview", at()),
            PathBuf::from("lit_reviews/litreview_lit_review_2025-03-14_09-05.txt")
        );
    }

    #[test]
    fn test_render_digest_sections_in_order() {
        let sections = vec![
            ("A".to_string(), ReviewResult::empty("Summary A")),
            ("B".to_string(), ReviewResult::empty("Summary B")),
        ];
        let rendered = render_digest(&sections, date());
        let rule = "-".repeat(60);
        let expected = format!(
            "🧠 Weekly Digest — 2025-03-14\n{}\n\n🔹 Topic: A\n\nSummary A\n{rule}\n\n🔹 Topic: B\n\nSummary B\n{rule}\n\n",
            "=".repeat(60)
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_write_digest_path() {
        let dir = TempDir::new().unwrap();
        let path = write_digest(dir.path(), "litreview", &[], date()).unwrap();
        assert!(path.ends_with("litreview_weekly_digest_2025-03-14.txt"));
        assert!(path.exists());
    }
}
