//! The untrusted Bell-state measurement relay.
//!
//! Alice and Bob both send photons to a central relay that announces either
//! a Bell outcome or a failure. The relay never learns the bits; Bob turns
//! the public outcome into his copy of Alice's bit with [`recover_bit`].
//!
//! The relay models here are classical: the outcome distribution is a
//! function of the transmitted bits and bases, which is all the downstream
//! sifting needs.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use aether_ir::Statevector;

use crate::error::{ProtocolResult, check_probability};
use crate::source::Basis;

/// Announced Bell outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BellState {
    /// |Φ+⟩
    PhiPlus,
    /// |Φ−⟩
    PhiMinus,
    /// |Ψ+⟩
    PsiPlus,
    /// |Ψ−⟩
    PsiMinus,
}

impl BellState {
    /// Whether Bob inverts his bit on this outcome.
    pub fn requires_flip(self) -> bool {
        matches!(self, Self::PhiMinus | Self::PsiMinus)
    }
}

impl fmt::Display for BellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhiPlus => write!(f, "Φ+"),
            Self::PhiMinus => write!(f, "Φ−"),
            Self::PsiPlus => write!(f, "Ψ+"),
            Self::PsiMinus => write!(f, "Ψ−"),
        }
    }
}

/// Bob's recovered key bit given his own bit and the announced outcome.
pub fn recover_bit(bob_bit: u8, outcome: BellState) -> u8 {
    bob_bit ^ u8::from(outcome.requires_flip())
}

/// What physically reaches the relay in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayInput {
    /// Bit encoded in Alice's photon.
    pub alice_bit: u8,
    /// Alice's preparation basis.
    pub alice_basis: Basis,
    /// Bit encoded in Bob's photon.
    pub bob_bit: u8,
    /// Bob's preparation basis.
    pub bob_basis: Basis,
}

impl RelayInput {
    fn parity_differs(&self) -> bool {
        self.alice_bit != self.bob_bit
    }
}

/// A Bell-state measurement.
pub trait RelayModel {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Measure one round. `None` photons were lost in their channel.
    ///
    /// Returns `None` on failure. Lost photons always fail without
    /// consuming randomness.
    fn measure(
        &self,
        alice: Option<&Statevector>,
        bob: Option<&Statevector>,
        input: &RelayInput,
        rng: &mut dyn RngCore,
    ) -> Option<BellState>;
}

/// Ideal relay: succeeds whenever both photons arrive, in either basis.
///
/// Equal bits announce Φ+ or Ψ+ with equal probability; differing bits
/// announce Φ− or Ψ−.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerfectBellRelay;

impl RelayModel for PerfectBellRelay {
    fn name(&self) -> &str {
        "perfect"
    }

    fn measure(
        &self,
        alice: Option<&Statevector>,
        bob: Option<&Statevector>,
        input: &RelayInput,
        rng: &mut dyn RngCore,
    ) -> Option<BellState> {
        if alice.is_none() || bob.is_none() {
            return None;
        }
        let phi = rng.gen_bool(0.5);
        Some(match (input.parity_differs(), phi) {
            (false, true) => BellState::PhiPlus,
            (false, false) => BellState::PsiPlus,
            (true, true) => BellState::PhiMinus,
            (true, false) => BellState::PsiMinus,
        })
    }
}

/// Linear-optics relay: only Ψ± are distinguishable, only on matched bases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialBellRelay {
    success_probability: f64,
}

impl PartialBellRelay {
    /// Success probability used for controller diagnostics.
    pub const DIAGNOSTIC: f64 = 0.25;
    /// Success probability of the standard MDI baseline.
    pub const STANDARD: f64 = 0.5;

    /// Create a relay with the given per-round success probability.
    ///
    /// # Errors
    ///
    /// Returns an error if the probability is outside `[0, 1]`.
    pub fn new(success_probability: f64) -> ProtocolResult<Self> {
        check_probability("relay success probability", success_probability)?;
        Ok(Self {
            success_probability,
        })
    }

    /// The pessimistic relay used by controller diagnostics.
    pub fn diagnostic() -> Self {
        Self {
            success_probability: Self::DIAGNOSTIC,
        }
    }

    /// Per-round success probability.
    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }
}

impl Default for PartialBellRelay {
    fn default() -> Self {
        Self {
            success_probability: Self::STANDARD,
        }
    }
}

impl RelayModel for PartialBellRelay {
    fn name(&self) -> &str {
        "partial"
    }

    fn measure(
        &self,
        alice: Option<&Statevector>,
        bob: Option<&Statevector>,
        input: &RelayInput,
        rng: &mut dyn RngCore,
    ) -> Option<BellState> {
        if alice.is_none() || bob.is_none() || input.alice_basis != input.bob_basis {
            return None;
        }
        if rng.r#gen::<f64>() >= self.success_probability {
            return None;
        }
        Some(if input.parity_differs() {
            BellState::PsiMinus
        } else {
            BellState::PsiPlus
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::prepare_state;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn input(a: u8, ab: Basis, b: u8, bb: Basis) -> RelayInput {
        RelayInput {
            alice_bit: a,
            alice_basis: ab,
            bob_bit: b,
            bob_basis: bb,
        }
    }

    #[test]
    fn test_lost_photon_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        let psi = prepare_state(0, Basis::Z).unwrap();
        let i = input(0, Basis::Z, 0, Basis::Z);
        assert_eq!(PerfectBellRelay.measure(Some(&psi), None, &i, &mut rng), None);
        assert_eq!(PerfectBellRelay.measure(None, Some(&psi), &i, &mut rng), None);
    }

    #[test]
    fn test_perfect_relay_recovery_matches_alice() {
        let mut rng = StdRng::seed_from_u64(1);
        let psi = prepare_state(0, Basis::Z).unwrap();
        for a in 0..=1 {
            for b in 0..=1 {
                for (ab, bb) in [(Basis::Z, Basis::Z), (Basis::Z, Basis::X), (Basis::X, Basis::X)] {
                    let i = input(a, ab, b, bb);
                    let outcome = PerfectBellRelay
                        .measure(Some(&psi), Some(&psi), &i, &mut rng)
                        .unwrap();
                    assert_eq!(recover_bit(b, outcome), a);
                }
            }
        }
    }

    #[test]
    fn test_partial_relay_rejects_mismatched_bases() {
        let mut rng = StdRng::seed_from_u64(2);
        let relay = PartialBellRelay::new(1.0).unwrap();
        let psi = prepare_state(0, Basis::Z).unwrap();
        let i = input(0, Basis::Z, 1, Basis::X);
        assert_eq!(relay.measure(Some(&psi), Some(&psi), &i, &mut rng), None);
        let i = input(0, Basis::X, 1, Basis::X);
        assert_eq!(
            relay.measure(Some(&psi), Some(&psi), &i, &mut rng),
            Some(BellState::PsiMinus)
        );
    }

    #[test]
    fn test_partial_relay_success_rate() {
        let mut rng = StdRng::seed_from_u64(3);
        let relay = PartialBellRelay::new(PartialBellRelay::DIAGNOSTIC).unwrap();
        let psi = prepare_state(0, Basis::Z).unwrap();
        let i = input(1, Basis::Z, 1, Basis::Z);
        let hits = (0..4000)
            .filter(|_| relay.measure(Some(&psi), Some(&psi), &i, &mut rng).is_some())
            .count();
        assert!((850..1150).contains(&hits));
    }

    #[test]
    fn test_invalid_success_probability() {
        assert!(PartialBellRelay::new(1.5).is_err());
    }
}
