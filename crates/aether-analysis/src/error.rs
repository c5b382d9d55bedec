//! Error types for the analysis crate.

use thiserror::Error;

/// Errors produced by the security analysis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// A rate or probability outside `[0, 1]`.
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Security parameter outside `(0, 1)`.
    #[error("Security parameter must lie in (0, 1), got {0}")]
    InvalidSecurityParameter(f64),

    /// Error-correction efficiency below the Shannon limit.
    #[error("Error-correction efficiency must be at least 1.0, got {0}")]
    InvalidEfficiency(f64),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
