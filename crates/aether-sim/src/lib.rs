//! `aether-sim` — noisy state-vector evolution.
//!
//! Evolves dense state vectors through compiled locking circuits under a
//! configurable [`GateNoise`] model and builds the ideal unitary (and its
//! inverse) used to unlock a block.
//!
//! # Quick start
//!
//! ```rust
//! use aether_compile::{AdaptiveBraidGenerator, CircuitGenerator, compile_circuit};
//! use aether_ir::Statevector;
//! use aether_sim::{NoisyEvolution, unlocking_unitary};
//! use rand::SeedableRng;
//!
//! let lock = compile_circuit(&AdaptiveBraidGenerator::new().generate(3, 4, 1).unwrap()).unwrap();
//! let psi = Statevector::basis(3, 0b101).unwrap();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let locked = NoisyEvolution::noiseless().evolve(&psi, &lock, &mut rng).unwrap();
//! let unlocked = locked.apply(&unlocking_unitary(&lock).unwrap()).unwrap();
//! assert!((unlocked.fidelity(&psi).unwrap() - 1.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod evolution;
pub mod noise;

pub use error::{SimError, SimResult};
pub use evolution::{
    NoisyEvolution, evolve_noisily, gate_unitary, ideal_unitary, unlocking_unitary,
};
pub use noise::GateNoise;
