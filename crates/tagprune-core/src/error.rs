//! Error types for tagprune.
//!
//! Errors are split by concern: loading configuration, loading a relationship
//! dataset, and validating a caller-supplied tag collection.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tagprune operations.
#[derive(Error, Debug)]
pub enum TagpruneError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Relationship dataset errors
    #[error("Relations error: {0}")]
    Relations(#[from] RelationsError),

    /// Tag collection rejected by the resolver
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while loading a tag relationship dataset.
#[derive(Error, Debug)]
pub enum RelationsError {
    /// Dataset file could not be read
    #[error("Failed to read relations from {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Dataset contents are malformed
    #[error("Failed to parse relations from {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A different table is already serving the process
    #[error("Relation table already initialized; cannot switch to {path}")]
    AlreadyInstalled { path: PathBuf },
}

/// Errors raised by the overlap resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Input is neither a sequence of tag strings nor a tag -> score mapping
    #[error("Invalid input type: expected a list of tags or a tag -> score mapping, got {found}")]
    InvalidInputType { found: String },
}

/// Convenience type alias for tagprune results.
pub type Result<T> = std::result::Result<T, TagpruneError>;
