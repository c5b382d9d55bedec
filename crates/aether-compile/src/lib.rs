//! `aether-compile` — locking-circuit generation and routing.
//!
//! A locking circuit is produced in two stages:
//!
//! 1. A [`CircuitGenerator`] draws an [`AbstractCircuit`] of entangling
//!    gates between arbitrary qubit pairs.
//! 2. The [`LinearChainRouter`] rewrites it for nearest-neighbour hardware
//!    by wrapping long-range gates in SWAP chains.
//!
//! ```rust
//! use aether_compile::{AdaptiveBraidGenerator, CircuitGenerator, compile_circuit};
//!
//! let generator = AdaptiveBraidGenerator::new();
//! let lock = generator.generate(4, 8, 42).unwrap();
//! let compiled = compile_circuit(&lock).unwrap();
//! assert!(compiled.depth() >= lock.len());
//! assert_eq!(compiled.entangle_count(), 8);
//! ```
//!
//! [`AbstractCircuit`]: aether_ir::AbstractCircuit

pub mod error;
pub mod generator;
pub mod routing;

pub use error::{CompileError, CompileResult};
pub use generator::{AdaptiveBraidGenerator, CircuitGenerator, UniformRandomGenerator};
pub use routing::{LinearChainRouter, chain_path, compile_circuit};
