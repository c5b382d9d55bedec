//! BB84 state preparation.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use aether_ir::{Statevector, Unitary2x2};

use crate::error::{ProtocolError, ProtocolResult};

/// Preparation / measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Computational basis {|0⟩, |1⟩}.
    Z,
    /// Hadamard basis {|+⟩, |−⟩}.
    X,
}

impl Basis {
    /// Draw a uniformly random basis.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_range(0..=1u8) == 0 {
            Self::Z
        } else {
            Self::X
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Z => write!(f, "Z"),
            Self::X => write!(f, "X"),
        }
    }
}

/// Draw a uniformly random key bit.
pub fn random_bit<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(0..=1)
}

/// Check that `bit` is 0 or 1.
pub fn check_bit(bit: u8) -> ProtocolResult<u8> {
    if bit > 1 {
        return Err(ProtocolError::InvalidBit(bit));
    }
    Ok(bit)
}

/// Prepare the single-qubit state encoding `bit` in `basis`.
///
/// | bit | Z    | X    |
/// |-----|------|------|
/// | 0   | \|0⟩ | \|+⟩ |
/// | 1   | \|1⟩ | \|−⟩ |
pub fn prepare_state(bit: u8, basis: Basis) -> ProtocolResult<Statevector> {
    let flip = if check_bit(bit)? == 1 {
        Unitary2x2::x()
    } else {
        Unitary2x2::identity()
    };
    let rotation = match basis {
        Basis::Z => flip,
        Basis::X => Unitary2x2::h().mul(&flip),
    };
    Ok(Statevector::from_rotation(&rotation))
}
