//! Gate-level hardware noise.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use aether_ir::Unitary2x2;

use crate::error::{SimError, SimResult};

/// Noise applied after each two-qubit gate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum GateNoise {
    /// Ideal gates.
    #[default]
    None,

    /// Two-qubit Pauli twirl: with probability `p`, each touched qubit
    /// independently receives a uniformly random X, Y or Z.
    PauliTwirl {
        /// Error probability per gate (0.0 to 1.0).
        p: f64,
    },
}

impl GateNoise {
    /// Pauli twirl with probability `p`, or [`GateNoise::None`] for `p == 0`.
    pub fn pauli_twirl(p: f64) -> SimResult<Self> {
        if !(0.0..=1.0).contains(&p) || p.is_nan() {
            return Err(SimError::InvalidProbability(p));
        }
        Ok(if p == 0.0 {
            Self::None
        } else {
            Self::PauliTwirl { p }
        })
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::PauliTwirl { .. } => "pauli_twirl",
        }
    }

    /// Error probability per gate.
    pub fn probability(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::PauliTwirl { p } => *p,
        }
    }

    /// Sample the error after one gate.
    ///
    /// Returns the Paulis for the gate's two qubits, or `None` when no error
    /// occurs. [`GateNoise::None`] never touches `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(Unitary2x2, Unitary2x2)> {
        let p = self.probability();
        if p <= 0.0 || rng.r#gen::<f64>() >= p {
            return None;
        }
        let first = Unitary2x2::pauli(rng.gen_range(1..=3));
        let second = Unitary2x2::pauli(rng.gen_range(1..=3));
        Some((first, second))
    }
}

impl fmt::Display for GateNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::PauliTwirl { p } => write!(f, "pauli_twirl(p={p})"),
        }
    }
}
