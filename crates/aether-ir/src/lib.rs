//! `aether-ir` — quantum operators and states for the AETHER simulator.
//!
//! This crate holds the numerical building blocks shared by the compiler,
//! the evolution engine and the protocol layer:
//!
//! - [`Unitary2x2`] single-qubit rotations, including Haar-random draws
//! - [`AbstractGate`] / [`CompiledGate`] records and the entangling primitive
//! - [`embed_gate`] for placing 1- and 2-qubit gates into an n-qubit register
//! - [`Statevector`] dense pure states
//!
//! # Example
//!
//! ```rust
//! use aether_ir::{Statevector, Unitary2x2, embed_gate, gate::cnot_matrix};
//!
//! let plus = Statevector::from_rotation(&Unitary2x2::h());
//! let zero = Statevector::zero(1).unwrap();
//! let input = plus.tensor(&zero).unwrap();
//!
//! let cx = embed_gate(2, &cnot_matrix(), &[0, 1]).unwrap();
//! let bell = input.apply(&cx).unwrap();
//! assert!((bell.probabilities()[0b11] - 0.5).abs() < 1e-12);
//! ```

pub mod circuit;
pub mod embed;
pub mod error;
pub mod gate;
pub mod state;
pub mod unitary;

/// A dense complex matrix.
pub type Operator = ndarray::Array2<num_complex::Complex64>;

pub use circuit::{AbstractCircuit, CompiledCircuit};
pub use embed::{embed_gate, embed_single};
pub use error::{IrError, IrResult};
pub use gate::{AbstractGate, CompiledGate, GateKind};
pub use state::Statevector;
pub use unitary::Unitary2x2;
