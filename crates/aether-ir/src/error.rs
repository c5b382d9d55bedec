//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur when building or applying quantum operators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate matrix does not match the number of target qubits.
    #[error("Gate of dimension {rows}x{cols} cannot act on {targets} target qubit(s)")]
    GateDimensionMismatch {
        /// Row count of the supplied gate.
        rows: usize,
        /// Column count of the supplied gate.
        cols: usize,
        /// Number of target qubits requested.
        targets: usize,
    },

    /// Unsupported gate arity.
    #[error("Gates must act on 1 or 2 qubits, got {0}")]
    UnsupportedArity(usize),

    /// Qubit index is outside the register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// The same qubit appears twice in a target list.
    #[error("Duplicate target qubit {0}")]
    DuplicateQubit(usize),

    /// A compiled gate touches qubits that are not neighbours.
    #[error("Compiled gate on q[{0}], q[{1}] is not nearest-neighbour")]
    NotAdjacent(usize, usize),

    /// Operator and state dimensions disagree.
    #[error("Dimension mismatch: operator is {operator}, state is {state}")]
    DimensionMismatch {
        /// Operator dimension.
        operator: usize,
        /// State dimension.
        state: usize,
    },

    /// Amplitude vector length is not a power of two, or is empty.
    #[error("Invalid state length {0}: must be a non-zero power of two")]
    InvalidStateLength(usize),

    /// Register is too wide to be represented densely.
    #[error("Register of {0} qubits exceeds the dense simulation limit")]
    RegisterTooLarge(usize),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
