//! Discovery and reading of tag collection files.
//!
//! A `.json` file holds one collection; a `.jsonl` file holds one per line.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::error::TagpruneError;

/// Discovers tag collection files in directories.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

/// One raw collection read from disk, not yet validated.
#[derive(Debug)]
pub struct SourcedCollection {
    /// "path" for `.json` files, "path:line" for `.jsonl` lines
    pub source: String,
    /// Parsed JSON, or the parse error for this record
    pub value: Result<serde_json::Value, serde_json::Error>,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Discover all supported files at a path.
    ///
    /// A file is returned as-is if supported; a directory is walked
    /// recursively. Results are sorted by path.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_file() {
            return if self.is_supported(path) {
                vec![path.to_path_buf()]
            } else {
                vec![]
            };
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|entry| entry.into_path())
            .filter(|p| p.is_file() && self.is_supported(p))
            .collect();

        files.sort();
        files
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Read the collections stored in one file.
///
/// I/O failures fail the whole file; JSON errors are reported per record.
pub fn read_collections(path: &Path) -> Result<Vec<SourcedCollection>, TagpruneError> {
    let content = std::fs::read_to_string(path)?;
    let is_lines = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));

    if !is_lines {
        return Ok(vec![SourcedCollection {
            source: path.display().to_string(),
            value: serde_json::from_str(&content),
        }]);
    }

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| SourcedCollection {
            source: format!("{}:{}", path.display(), i + 1),
            value: serde_json::from_str(line),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        let discovery = FileDiscovery::new(ProcessingConfig::default());

        assert!(discovery.is_supported(Path::new("tags.json")));
        assert!(discovery.is_supported(Path::new("tags.JSON")));
        assert!(discovery.is_supported(Path::new("batch.jsonl")));
        assert!(!discovery.is_supported(Path::new("image.png")));
        assert!(!discovery.is_supported(Path::new("README")));
    }

    #[test]
    fn test_discover_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a.jsonl"), "").unwrap();
        std::fs::write(dir.path().join("nested/c.json"), "{}").unwrap();
        std::fs::write(dir.path().join("skip.png"), "").unwrap();

        let files = FileDiscovery::new(ProcessingConfig::default()).discover(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jsonl", "b.json", "nested/c.json"]);
    }

    #[test]
    fn test_discover_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.txt");
        std::fs::write(&path, "[]").unwrap();
        assert!(FileDiscovery::new(ProcessingConfig::default())
            .discover(&path)
            .is_empty());
    }

    #[test]
    fn test_read_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.json");
        std::fs::write(&path, r#"{"solo": 0.9}"#).unwrap();

        let records = read_collections(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].source.ends_with("one.json"));
        assert!(records[0].value.as_ref().unwrap().is_object());
    }

    #[test]
    fn test_read_jsonl_reports_bad_lines_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("many.jsonl");
        std::fs::write(&path, "[\"a\"]\n\nnot json\n{\"b\": 1}\n").unwrap();

        let records = read_collections(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].source.ends_with("many.jsonl:1"));
        assert!(records[1].value.is_err());
        assert!(records[1].source.ends_with("many.jsonl:3"));
        assert!(records[2].value.is_ok());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_collections(&dir.path().join("gone.json")),
            Err(TagpruneError::Io(_))
        ));
    }
}
