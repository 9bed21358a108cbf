//! Tag collection shapes accepted by the resolver.
//!
//! A collection is either an ordered list of tag names or a tag -> score
//! mapping. Untyped JSON is checked against these two shapes before any
//! resolution work happens.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::error::ResolveError;

/// A caller-supplied tag collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagInput {
    /// Ordered tag names. Order and duplicates are kept as given.
    Sequence(Vec<String>),
    /// Tag name -> confidence score, in insertion order. Scores are opaque.
    Weighted(IndexMap<String, f64>),
}

impl TagInput {
    /// Check an untyped JSON value against the accepted shapes.
    ///
    /// Arrays must hold only strings; objects must map every key to a number.
    /// Everything else is rejected with [`ResolveError::InvalidInputType`].
    pub fn from_value(value: &Value) -> Result<Self, ResolveError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(tag) => Ok(tag.clone()),
                    other => Err(invalid(format!("list containing {}", kind(other)))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(TagInput::Sequence),
            Value::Object(map) => map
                .iter()
                .map(|(tag, score)| match score.as_f64() {
                    Some(score) => Ok((tag.clone(), score)),
                    None => Err(invalid(format!(
                        "mapping with {} value for {:?}",
                        kind(score),
                        tag
                    ))),
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(TagInput::Weighted),
            other => Err(invalid(kind(other).to_string())),
        }
    }

    /// Convert back to JSON, keeping the collection's shape and order.
    ///
    /// Non-finite scores have no JSON form and become `null`.
    pub fn to_value(&self) -> Value {
        match self {
            TagInput::Sequence(tags) => {
                Value::Array(tags.iter().cloned().map(Value::String).collect())
            }
            TagInput::Weighted(scores) => Value::Object(
                scores
                    .iter()
                    .map(|(tag, score)| {
                        let score = Number::from_f64(*score)
                            .map(Value::Number)
                            .unwrap_or(Value::Null);
                        (tag.clone(), score)
                    })
                    .collect(),
            ),
        }
    }

    /// Tag names in collection order.
    pub fn tag_names(&self) -> Vec<&str> {
        match self {
            TagInput::Sequence(tags) => tags.iter().map(String::as_str).collect(),
            TagInput::Weighted(scores) => scores.keys().map(String::as_str).collect(),
        }
    }

    /// A new collection of the same shape holding only the tags `keep` accepts.
    pub fn filtered<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        match self {
            TagInput::Sequence(tags) => {
                TagInput::Sequence(tags.iter().filter(|t| keep(t.as_str())).cloned().collect())
            }
            TagInput::Weighted(scores) => TagInput::Weighted(
                scores
                    .iter()
                    .filter(|(t, _)| keep(t.as_str()))
                    .map(|(t, s)| (t.clone(), *s))
                    .collect(),
            ),
        }
    }

    /// Number of entries (duplicates in a sequence count separately).
    pub fn len(&self) -> usize {
        match self {
            TagInput::Sequence(tags) => tags.len(),
            TagInput::Weighted(scores) => scores.len(),
        }
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is the weighted (mapping) shape.
    pub fn is_weighted(&self) -> bool {
        matches!(self, TagInput::Weighted(_))
    }
}

impl<'de> Deserialize<'de> for TagInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        TagInput::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Value> for TagInput {
    type Error = ResolveError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        TagInput::from_value(&value)
    }
}

impl From<Vec<String>> for TagInput {
    fn from(tags: Vec<String>) -> Self {
        TagInput::Sequence(tags)
    }
}

impl From<Vec<&str>> for TagInput {
    fn from(tags: Vec<&str>) -> Self {
        TagInput::Sequence(tags.into_iter().map(str::to_string).collect())
    }
}

impl From<IndexMap<String, f64>> for TagInput {
    fn from(scores: IndexMap<String, f64>) -> Self {
        TagInput::Weighted(scores)
    }
}

fn invalid(found: String) -> ResolveError {
    ResolveError::InvalidInputType { found }
}

/// Human-readable JSON kind for error messages.
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
