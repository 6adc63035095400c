//! Taglens - tag-driven context curation for codebases
//!
//! Source files carry hierarchical tag annotations
//! (`// @tags: #dev{feature[shield(render)]}`). This library lets a caller:
//!
//! - **select** files by tag level or path ([`selection`])
//! - **expand** the selection along symbol-usage edges a bounded number of
//!   hops ([`expand`])
//! - **resolve** the sorted export list and its statistics ([`output`])
//! - **edit** tags across a file set and write them back with a minimal,
//!   idempotent diff ([`editor`], [`commit`])
//!
//! The index and per-file dependency analysis sit behind the
//! [`index::Indexer`] and [`index::DependencyAnalyzer`] traits; a
//! line-oriented implementation for Go modules ships in [`index`].

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod commit;
pub mod config;
pub mod editor;
pub mod expand;
pub mod index;
pub mod output;
pub mod selection;
pub mod tags;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum LensError {
    /// Tag annotation or level spec failed to parse
    #[error("Tag syntax error: {0}")]
    Parse(#[from] tags::ParseError),
    /// Index could not be built
    #[error("Index error: {0}")]
    Index(#[from] index::IndexError),
    /// Expansion depth out of range
    #[error("Expansion error: {0}")]
    Depth(#[from] expand::DepthError),
    /// Selection list could not be loaded
    #[error("Selection error: {0}")]
    Selection(#[from] selection::SelectionError),
    /// A file could not be rewritten
    #[error("Commit error: {0}")]
    Commit(#[from] commit::CommitError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// JSON output could not be produced
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
