//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced by state evolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Noise probability outside `[0, 1]`.
    #[error("Noise probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// The state and the circuit act on different registers.
    #[error("State has {state} qubits but the circuit acts on {circuit}")]
    WidthMismatch {
        /// State width.
        state: usize,
        /// Circuit width.
        circuit: usize,
    },

    /// Operator construction or application failed.
    #[error("IR error: {0}")]
    Ir(#[from] aether_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
