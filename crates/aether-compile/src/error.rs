//! Error types for the compile crate.

use thiserror::Error;

/// Errors produced while generating or routing locking circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A locking circuit needs at least two qubits.
    #[error("Locking circuit needs at least 2 qubits, got {0}")]
    TooFewQubits(usize),

    /// Interpolation probability outside `[0, 1]`.
    #[error("Long-range probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Circuit is wider than the chain.
    #[error("Circuit has {circuit} qubits but the device only has {device}")]
    DeviceTooSmall {
        /// Circuit width.
        circuit: usize,
        /// Device width.
        device: usize,
    },

    /// A two-qubit gate names the same qubit twice.
    #[error("Routing failed: gate acts on qubits {qubit1} and {qubit2}")]
    RoutingFailed {
        /// First qubit.
        qubit1: usize,
        /// Second qubit.
        qubit2: usize,
    },

    /// Gate or circuit construction error.
    #[error("IR error: {0}")]
    Ir(#[from] aether_ir::IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
