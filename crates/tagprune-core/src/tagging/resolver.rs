//! Overlap resolution: drop tags made redundant by a more specific tag.
//!
//! For each pair of present tags (S, G): if S implies G through the relation
//! table, G is redundant and removed. The decision set is computed from the
//! full input before anything is removed, so the result does not depend on
//! input order. Tags on a cycle in the table imply each other, so when
//! several members of one cycle are present, all of them are dropped.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::ResolveError;
use crate::types::Tag;

use super::input::TagInput;
use super::relations::RelationTable;

/// Removes redundant tags using a shared [`RelationTable`].
#[derive(Debug, Clone, Copy)]
pub struct OverlapResolver<'a> {
    table: &'a RelationTable,
}

impl OverlapResolver<'static> {
    /// Resolver backed by the process-wide table.
    pub fn global() -> Self {
        Self::new(RelationTable::global())
    }
}

impl<'a> OverlapResolver<'a> {
    /// Create a resolver over `table`.
    pub fn new(table: &'a RelationTable) -> Self {
        Self { table }
    }

    /// The table this resolver reads from.
    pub fn table(&self) -> &'a RelationTable {
        self.table
    }

    /// Compute which of `tags` are implied by another present tag.
    pub fn redundant_tags<'t, I>(&self, tags: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'t str>,
    {
        let present: HashSet<&str> = tags.into_iter().collect();
        let mut redundant = HashSet::new();

        for &specific in &present {
            let implied = self.table.implied_by(specific);
            if implied.is_empty() {
                continue;
            }

            let hits: Vec<&str> = if implied.len() <= present.len() {
                implied
                    .iter()
                    .map(String::as_str)
                    .filter(|general| present.contains(general))
                    .collect()
            } else {
                present
                    .iter()
                    .copied()
                    .filter(|general| implied.contains(*general))
                    .collect()
            };

            redundant.extend(hits.into_iter().map(str::to_string));
        }

        redundant
    }

    /// Drop redundant tags, returning a new collection of the same shape.
    ///
    /// Sequence order and mapping scores of surviving tags are unchanged.
    /// Every occurrence of a duplicated tag shares the same fate.
    pub fn resolve(&self, input: &TagInput) -> TagInput {
        let redundant = self.redundant_tags(input.tag_names());
        if redundant.is_empty() {
            return input.clone();
        }

        let output = input.filtered(|tag| !redundant.contains(tag));
        tracing::debug!(
            "Dropped {} redundant tag(s): {} -> {}",
            input.len() - output.len(),
            input.len(),
            output.len()
        );
        output
    }

    /// Validate an untyped JSON collection and drop its redundant entries.
    ///
    /// Fails with [`ResolveError::InvalidInputType`] before any resolution work
    /// if `value` is neither a list of strings nor a string -> number mapping.
    /// Surviving entries are copied from `value` untouched, so scores keep
    /// their exact JSON number form.
    pub fn resolve_value(&self, value: &Value) -> Result<Value, ResolveError> {
        let input = TagInput::from_value(value)?;
        let redundant = self.redundant_tags(input.tag_names());

        Ok(match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .filter(|item| item.as_str().is_some_and(|tag| !redundant.contains(tag)))
                    .cloned()
                    .collect(),
            ),
            Value::Object(scores) => Value::Object(
                scores
                    .iter()
                    .filter(|(tag, _)| !redundant.contains(tag.as_str()))
                    .map(|(tag, score)| (tag.clone(), score.clone()))
                    .collect(),
            ),
            other => other.clone(),
        })
    }

    /// Apply the same rule to scored classifier tags, keeping survivors in order.
    pub fn resolve_tags(&self, tags: &[Tag]) -> Vec<Tag> {
        let redundant = self.redundant_tags(tags.iter().map(|t| t.name.as_str()));
        tags.iter()
            .filter(|tag| !redundant.contains(&tag.name))
            .cloned()
            .collect()
    }
}

/// Drop overlapping tags using the process-wide relation table.
pub fn drop_overlap_tags(input: &TagInput) -> TagInput {
    OverlapResolver::global().resolve(input)
}
