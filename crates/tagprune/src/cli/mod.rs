//! Subcommand implementations.

pub mod config;
pub mod relations;
pub mod resolve;
