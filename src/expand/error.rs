use thiserror::Error;

/// Errors for expansion settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepthError {
    /// Depth outside the supported range
    #[error("Expansion depth {depth} out of range ({min}..={max})")]
    OutOfRange { depth: u8, min: u8, max: u8 },

    /// Depth string is not a number
    #[error("Invalid expansion depth '{0}'")]
    NotANumber(String),
}
