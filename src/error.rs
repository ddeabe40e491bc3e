use thiserror::Error;

/// Errors produced while resolving selectors or importing documents
#[derive(Debug, Error)]
pub enum RankerError {
    /// A selector pattern could not be parsed
    #[error("Invalid pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// A document snapshot could not be parsed
    #[error("Snapshot parse failed: {0}")]
    SnapshotParse(String),
}

impl RankerError {
    /// Construct a pattern-syntax error
    pub fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RankerError>;
