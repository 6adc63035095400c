use thiserror::Error;

/// Errors produced while parsing tag annotations or level specs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input contained no tag clause at all
    #[error("No tag expression found")]
    Empty,

    /// A specific token was required but something else was found
    #[error("Expected {expected} at offset {offset}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    /// A category, group, module or label name was missing
    #[error("Missing name at offset {offset}")]
    MissingName { offset: usize },

    /// A `()` label list held no labels
    #[error("Empty label list at offset {offset}")]
    EmptyLabels { offset: usize },

    /// A `category:group:module:label` spec could not be interpreted
    #[error("Invalid level spec '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },
}

impl ParseError {
    pub(crate) fn unexpected(expected: &'static str, found: Option<char>, offset: usize) -> Self {
        Self::Unexpected {
            expected,
            found: found.map_or_else(|| "end of input".to_string(), |c| format!("'{c}'")),
            offset,
        }
    }

    pub(crate) fn invalid_spec(spec: &str, reason: &str) -> Self {
        Self::InvalidSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }
}
