//! Error types for the protocol crate.

use thiserror::Error;

/// Errors produced while configuring or running a key exchange.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// A probability-valued parameter outside `[0, 1]`.
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A classical bit other than 0 or 1.
    #[error("Bit must be 0 or 1, got {0}")]
    InvalidBit(u8),

    /// Block size does not divide the number of signals.
    #[error("Block size {block_size} does not divide {total_signals} signals")]
    BlockSizeMismatch {
        /// Requested number of signals.
        total_signals: usize,
        /// Requested block size.
        block_size: usize,
    },

    /// Any other invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Measurement requested on a multi-qubit state.
    #[error("Expected a single-qubit state, got {0} qubits")]
    NotSingleQubit(usize),

    /// State construction error.
    #[error("IR error: {0}")]
    Ir(#[from] aether_ir::IrError),

    /// Locking-circuit generation or routing error.
    #[error("Compile error: {0}")]
    Compile(#[from] aether_compile::CompileError),

    /// Evolution error.
    #[error("Simulation error: {0}")]
    Sim(#[from] aether_sim::SimError),

    /// Security analysis error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] aether_analysis::AnalysisError),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Check that `value` is a probability.
pub(crate) fn check_probability(name: &'static str, value: f64) -> ProtocolResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ProtocolError::InvalidProbability { name, value });
    }
    Ok(())
}
