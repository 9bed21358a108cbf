//! Core data types shared by the resolver and its callers.

use serde::{Deserialize, Serialize};

/// A classifier tag with its confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// The tag identifier (e.g., "very_long_hair", "red_hair")
    pub name: String,

    /// Confidence score, carried through untouched
    pub confidence: f32,

    /// Optional category ("general", "character", "rating", etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Tag {
    /// Create a new tag with the given name and confidence.
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
            category: None,
        }
    }

    /// Create a new tag with category.
    pub fn with_category(
        name: impl Into<String>,
        confidence: f32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            confidence,
            category: Some(category.into()),
        }
    }
}

/// One resolved tag collection, as emitted by batch runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRecord {
    /// Where the collection came from ("-", a file path, or "path:line")
    pub source: String,

    /// Surviving tags, in the same shape as the input
    pub tags: serde_json::Value,

    /// Number of tags removed as redundant
    pub dropped: usize,
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolveStats {
    /// Collections resolved successfully
    pub resolved: usize,

    /// Collections rejected or unreadable
    pub failed: usize,

    /// Total tags removed across all collections
    pub tags_dropped: usize,

    /// Total run time in seconds
    pub total_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_serde_without_category() {
        let tag = Tag::new("red_hair", 0.92);
        let json = serde_json::to_string(&tag).unwrap();
        assert!(!json.contains("category"));
        let parsed: Tag = serde_json::from_str(&json).unwrap();
        assert!(parsed.category.is_none());
    }

    #[test]
    fn test_tag_with_category() {
        let tag = Tag::with_category("hatsune_miku", 0.99, "character");
        let json = serde_json::to_string(&tag).unwrap();
        assert!(json.contains("\"category\":\"character\""));
    }

    #[test]
    fn test_resolved_record_shape() {
        let record = ResolvedRecord {
            source: "tags/001.json".to_string(),
            tags: serde_json::json!(["1girl", "very_long_hair"]),
            dropped: 1,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"source":"tags/001.json","tags":["1girl","very_long_hair"],"dropped":1}"#
        );
    }

    #[test]
    fn test_resolve_stats_default() {
        let stats = ResolveStats::default();
        assert_eq!(stats.resolved, 0);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.tags_dropped, 0);
    }
}
