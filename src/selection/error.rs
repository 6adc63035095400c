use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a selection list
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The list file could not be read
    #[error("Failed to read selection list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line holds a glob that does not compile
    #[error("Invalid pattern '{pattern}' on line {line}: {reason}")]
    InvalidPattern {
        line: usize,
        pattern: String,
        reason: String,
    },
}

impl SelectionError {
    #[must_use]
    pub fn invalid_pattern(line: usize, pattern: &str, reason: &str) -> Self {
        Self::InvalidPattern {
            line,
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}
