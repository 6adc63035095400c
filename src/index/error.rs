//! Index-specific error types
//!
//! - **`IndexError`**: failures while building an index from disk
//! - **`AnalysisError`**: a single file's dependency analysis failed; callers
//!   treat it as "this file contributes nothing further"

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building an index
#[derive(Debug, Error)]
pub enum IndexError {
    /// Reading a file or directory failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The traversal glob could not be built
    #[error("Invalid scan pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A syntax regex failed to compile
    #[error("Invalid syntax pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The module file exists but declares no module path
    #[error("No module declaration in {0}")]
    ModuleFile(PathBuf),
}

/// Errors raised while analyzing one file's dependencies
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The file is not part of the index
    #[error("File not indexed: {0}")]
    UnknownFile(String),

    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
