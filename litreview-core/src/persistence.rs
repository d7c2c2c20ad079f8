//! Atomic file writes for run artifacts.
//!
//! Every artifact (metadata JSON, transcripts, digests) is written to a `.tmp`
//! sibling first and renamed into place, so a crash never leaves a
//! half-written file under its final name.

use regex::Regex;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]+").expect("filename pattern is valid"));

/// Atomically write pretty-printed JSON to `path`, creating parent directories.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
    atomic_write(path, json.as_bytes())
}

/// Atomically write raw bytes to `path`, creating parent directories.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Load and deserialize JSON from a file.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    let value =
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(value))
}

/// Lowercase, trim, and collapse every run of non `[a-zA-Z0-9_]` characters to `_`.
pub fn normalize_filename(raw: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(&raw.trim().to_lowercase(), "_")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::{PaperRecord, SourceId};
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_json_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("papers.json");
        let papers = vec![PaperRecord::new("Attention", SourceId::Arxiv).with_year("2017")];

        atomic_write_json(&path, &papers).unwrap();
        let loaded: Option<Vec<PaperRecord>> = load_json(&path).unwrap();
        assert_eq!(loaded, Some(papers));
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary_sources").join("nested").join("x.json");
        atomic_write_json(&path, &Vec::<PaperRecord>::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_json_nonexistent() {
        let result: io::Result<Option<Vec<PaperRecord>>> =
            load_json(Path::new("/nonexistent/file.json"));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_atomic_write_no_tmp_leftover() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("digest.txt");
        atomic_write(&path, "🔹 Topic".as_bytes()).unwrap();
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "🔹 Topic");
    }

    #[test]
    fn test_normalize_filename() {
        assert_eq!(
            normalize_filename("  Transformer Attention: Mechanisms! "),
            "transformer_attention_mechanisms_"
        );
        assert_eq!(normalize_filename("CRISPR/Cas9 off-target"), "crispr_cas9_off_target");
        assert_eq!(normalize_filename("snake_case_ok"), "snake_case_ok");
    }
}
