//! Tag relationship table.
//!
//! Stores directed `specific -> general` implication edges between tag
//! identifiers and answers transitive closure queries. Closures are computed
//! on first request and memoized per tag for the lifetime of the table.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Deserialize;

use crate::error::RelationsError;

/// Overlap dataset compiled into the library.
const BUNDLED_DATASET: &str = include_str!("../../data/overlap_tags.json");

static GLOBAL_TABLE: OnceLock<RelationTable> = OnceLock::new();

/// One entry of the overlap dataset: `query` is made redundant by any tag
/// listed in `has_overlap`.
#[derive(Debug, Deserialize)]
struct OverlapEntry {
    query: String,
    has_overlap: Vec<String>,
}

/// Immutable implication graph with a memoized transitive closure per tag.
pub struct RelationTable {
    /// specific -> directly implied general tags
    edges: HashMap<String, BTreeSet<String>>,
    edge_count: usize,
    tag_count: usize,
    closures: RwLock<HashMap<String, Arc<HashSet<String>>>>,
    empty: Arc<HashSet<String>>,
}

impl Default for RelationTable {
    fn default() -> Self {
        Self::from_edges(std::iter::empty::<(String, String)>())
    }
}

impl std::fmt::Debug for RelationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationTable")
            .field("edges", &self.edge_count)
            .field("tags", &self.tag_count)
            .finish()
    }
}

impl RelationTable {
    /// Build a table from `(specific, general)` pairs.
    ///
    /// Self-edges are ignored and duplicate edges collapse into one.
    pub fn from_edges<I, S, G>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, G)>,
        S: Into<String>,
        G: Into<String>,
    {
        let mut edges: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut tags: HashSet<String> = HashSet::new();
        let mut edge_count = 0;

        for (specific, general) in pairs {
            let specific = specific.into();
            let general = general.into();
            if specific == general {
                continue;
            }
            tags.insert(specific.clone());
            tags.insert(general.clone());
            if edges.entry(specific).or_default().insert(general) {
                edge_count += 1;
            }
        }

        tracing::debug!(
            "Built relation table: {} edges over {} tags",
            edge_count,
            tags.len()
        );

        Self {
            edges,
            edge_count,
            tag_count: tags.len(),
            closures: RwLock::new(HashMap::new()),
            empty: Arc::new(HashSet::new()),
        }
    }

    /// Parse an overlap dataset: a JSON array of `{"query", "has_overlap"}` entries.
    pub fn from_overlap_json(content: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<OverlapEntry> = serde_json::from_str(content)?;
        Ok(Self::from_edges(entries.into_iter().flat_map(|entry| {
            let general = entry.query;
            entry
                .has_overlap
                .into_iter()
                .map(move |specific| (specific, general.clone()))
        })))
    }

    /// Parse tab-separated `specific<TAB>general` lines.
    ///
    /// Blank lines and `#` comments are skipped; malformed lines are logged and skipped.
    pub fn from_tsv(content: &str) -> Self {
        let mut pairs = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
                pairs.push((parts[0].to_string(), parts[1].to_string()));
            } else {
                tracing::warn!("Skipping malformed relation on line {}: {:?}", lineno + 1, line);
            }
        }
        Self::from_edges(pairs)
    }

    /// Load a dataset from disk.
    ///
    /// `.json` files are read as overlap datasets; anything else as TSV edges.
    pub fn load(path: &Path) -> Result<Self, RelationsError> {
        let content = std::fs::read_to_string(path).map_err(|e| RelationsError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let table = if is_json {
            Self::from_overlap_json(&content).map_err(|e| RelationsError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            Self::from_tsv(&content)
        };

        tracing::info!(
            "Loaded relations from {:?}: {} edges over {} tags",
            path,
            table.edge_count,
            table.tag_count
        );
        Ok(table)
    }

    /// Parse the dataset compiled into the library.
    pub fn bundled() -> Result<Self, RelationsError> {
        Self::from_overlap_json(BUNDLED_DATASET).map_err(|e| RelationsError::Parse {
            path: PathBuf::from("<bundled overlap_tags.json>"),
            message: e.to_string(),
        })
    }

    /// Install `table` as the process-wide table.
    ///
    /// Must run before the first call to [`RelationTable::global`]. Returns the
    /// table back if a global table is already in place.
    pub fn install_global(table: RelationTable) -> Result<(), RelationTable> {
        GLOBAL_TABLE.set(table)
    }

    /// The process-wide table, initialized from the bundled dataset on first use.
    pub fn global() -> &'static RelationTable {
        GLOBAL_TABLE.get_or_init(|| {
            Self::bundled().unwrap_or_else(|e| {
                tracing::error!("Bundled relations unusable, continuing without: {e}");
                Self::default()
            })
        })
    }

    /// Every tag made redundant by `tag`, following implication chains of any length.
    ///
    /// Unknown tags yield an empty set. The result never contains `tag` itself.
    pub fn implied_by(&self, tag: &str) -> Arc<HashSet<String>> {
        if !self.edges.contains_key(tag) {
            return Arc::clone(&self.empty);
        }

        let cached = self
            .closures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned();
        if let Some(closure) = cached {
            return closure;
        }

        let closure = Arc::new(self.compute_closure(tag));
        let mut cache = self.closures.write().unwrap_or_else(PoisonError::into_inner);
        // Concurrent fills compute identical sets; keep whichever landed first.
        Arc::clone(cache.entry(tag.to_string()).or_insert(closure))
    }

    /// Tags directly implied by `tag`, sorted.
    pub fn direct_implications(&self, tag: &str) -> Vec<&str> {
        self.edges
            .get(tag)
            .map(|generals| generals.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether `specific` implies `general`, directly or transitively.
    pub fn implies(&self, specific: &str, general: &str) -> bool {
        self.implied_by(specific).contains(general)
    }

    /// Number of distinct implication edges.
    pub fn len(&self) -> usize {
        self.edge_count
    }

    /// Whether the table holds no edges.
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    /// Number of distinct tags appearing on either side of an edge.
    pub fn tag_count(&self) -> usize {
        self.tag_count
    }

    /// Number of tags whose closure has been memoized so far.
    pub fn cached_closures(&self) -> usize {
        self.closures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn compute_closure(&self, tag: &str) -> HashSet<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut stack: Vec<&str> = vec![tag];

        while let Some(current) = stack.pop() {
            let Some(generals) = self.edges.get(current) else {
                continue;
            };
            for general in generals {
                if general != tag && seen.insert(general.clone()) {
                    stack.push(general);
                }
            }
        }

        tracing::debug!("Computed closure for {:?}: {} tags", tag, seen.len());
        seen
    }
}
