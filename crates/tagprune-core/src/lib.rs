//! tagprune core - drop image tags made redundant by more specific tags.
//!
//! Given tags produced by an image classifier, removes every tag that another
//! present tag already implies (`very_long_hair` makes `long_hair` redundant),
//! keeping the caller's collection shape, order and scores.
//!
//! # Architecture
//!
//! ```text
//! tags → validate shape → closure per present tag → mark redundant → filter → tags
//! ```
//!
//! # Usage
//!
//! ```rust
//! use tagprune_core::{OverlapResolver, TagInput};
//!
//! let input = TagInput::from(vec!["1girl", "long_hair", "very_long_hair"]);
//! let output = OverlapResolver::global().resolve(&input);
//! assert_eq!(output, TagInput::from(vec!["1girl", "very_long_hair"]));
//! ```

// Module declarations
pub mod config;
pub mod discovery;
pub mod error;
pub mod output;
pub mod tagging;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use discovery::{read_collections, FileDiscovery, SourcedCollection};
pub use error::{ConfigError, RelationsError, ResolveError, Result, TagpruneError};
pub use output::{OutputFormat, OutputWriter};
pub use tagging::{drop_overlap_tags, OverlapResolver, RelationTable, TagInput};
pub use types::{ResolveStats, ResolvedRecord, Tag};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Make the dataset named by `config` the process-wide relation table.
///
/// Without a configured path the bundled dataset is used. A configured path
/// must be installed before anything reads [`RelationTable::global`];
/// otherwise this fails with [`RelationsError::AlreadyInstalled`].
pub fn init_global_relations(config: &Config) -> Result<&'static RelationTable> {
    if let Some(path) = config.relations_path() {
        let table = RelationTable::load(&path)?;
        if RelationTable::install_global(table).is_err() {
            return Err(RelationsError::AlreadyInstalled { path }.into());
        }
        tracing::info!("Using relations from {:?}", path);
    }
    Ok(RelationTable::global())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_init_global_relations_default() {
        let table = init_global_relations(&Config::default()).unwrap();
        assert!(table.implies("very_long_hair", "long_hair"));
    }

    #[test]
    fn test_init_global_relations_missing_file() {
        let mut config = Config::default();
        config.relations.path = Some("/definitely/not/here.json".to_string());
        assert!(matches!(
            init_global_relations(&config),
            Err(TagpruneError::Relations(RelationsError::Read { .. }))
        ));
    }

    #[test]
    fn test_init_global_relations_refuses_late_dataset() {
        // Make sure the global table is already in place.
        let _ = RelationTable::global();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.tsv");
        std::fs::write(&path, "a\tb\n").unwrap();

        let mut config = Config::default();
        config.relations.path = Some(path.to_string_lossy().into_owned());
        assert!(matches!(
            init_global_relations(&config),
            Err(TagpruneError::Relations(RelationsError::AlreadyInstalled { .. }))
        ));
    }
}
