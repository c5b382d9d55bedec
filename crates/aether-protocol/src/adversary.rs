//! Source-leakage adversaries.
//!
//! An adversary with access to Alice's source learns side-channel
//! information about each emitted bit while the source is exposed. The
//! locking transform scrambles the block before it leaves the device, so the
//! orchestrator only invokes [`AdversaryCapability::attack`] in
//! [`OperatingMode::NoLock`].

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use aether_analysis::OperatingMode;

use crate::error::{ProtocolResult, check_probability};

/// Result of one source attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceAttack {
    /// Bit actually emitted by the source.
    pub bit: u8,
    /// Information leaked about this bit, in bits.
    pub leakage: f64,
}

/// An adversary acting on Alice's source.
pub trait AdversaryCapability {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Attack one emitted bit.
    fn attack(&mut self, bit: u8, rng: &mut dyn RngCore) -> SourceAttack;

    /// Called once per run after the controller decides.
    fn on_mode_chosen(&mut self, _mode: OperatingMode) {}

    /// Expected leakage per signal before any mode is chosen.
    fn nominal_leakage(&self) -> f64;
}

/// An honest source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoAdversary;

impl AdversaryCapability for NoAdversary {
    fn name(&self) -> &str {
        "none"
    }

    fn attack(&mut self, bit: u8, _rng: &mut dyn RngCore) -> SourceAttack {
        SourceAttack { bit, leakage: 0.0 }
    }

    fn nominal_leakage(&self) -> f64 {
        0.0
    }
}

/// Leaks a fixed fraction of a bit on every signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLeakage {
    rate: f64,
}

impl FixedLeakage {
    /// Create with a per-signal leakage rate.
    pub fn new(rate: f64) -> ProtocolResult<Self> {
        check_probability("leakage rate", rate)?;
        Ok(Self { rate })
    }
}

impl AdversaryCapability for FixedLeakage {
    fn name(&self) -> &str {
        "fixed"
    }

    fn attack(&mut self, bit: u8, _rng: &mut dyn RngCore) -> SourceAttack {
        SourceAttack {
            bit,
            leakage: self.rate,
        }
    }

    fn nominal_leakage(&self) -> f64 {
        self.rate
    }
}

/// Learns each bit completely with probability `strength`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceLeakageAdversary {
    strength: f64,
}

impl SourceLeakageAdversary {
    /// Create with a per-signal success probability.
    pub fn new(strength: f64) -> ProtocolResult<Self> {
        check_probability("adversary strength", strength)?;
        Ok(Self { strength })
    }
}

fn coin_attack(bit: u8, strength: f64, rng: &mut dyn RngCore) -> SourceAttack {
    let leakage = if rng.r#gen::<f64>() < strength { 1.0 } else { 0.0 };
    SourceAttack { bit, leakage }
}

impl AdversaryCapability for SourceLeakageAdversary {
    fn name(&self) -> &str {
        "static"
    }

    fn attack(&mut self, bit: u8, rng: &mut dyn RngCore) -> SourceAttack {
        coin_attack(bit, self.strength, rng)
    }

    fn nominal_leakage(&self) -> f64 {
        self.strength
    }
}

/// Strength level of an [`AdaptiveAdversary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackState {
    /// Attacking at the base strength.
    Base,
    /// Attacking at twice the base strength.
    Elevated,
}

/// An adversary that escalates when it sees the source left unprotected.
///
/// Starts in [`AttackState::Base`] and moves to [`AttackState::Elevated`]
/// when the controller chooses [`OperatingMode::NoLock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveAdversary {
    base_strength: f64,
    state: AttackState,
}

impl AdaptiveAdversary {
    /// Create with a base per-signal success probability.
    pub fn new(base_strength: f64) -> ProtocolResult<Self> {
        check_probability("adversary strength", base_strength)?;
        Ok(Self {
            base_strength,
            state: AttackState::Base,
        })
    }

    /// Current state.
    pub fn state(&self) -> AttackState {
        self.state
    }

    /// Strength in the current state.
    pub fn current_strength(&self) -> f64 {
        match self.state {
            AttackState::Base => self.base_strength,
            AttackState::Elevated => (2.0 * self.base_strength).min(1.0),
        }
    }
}

impl AdversaryCapability for AdaptiveAdversary {
    fn name(&self) -> &str {
        "adaptive"
    }

    fn attack(&mut self, bit: u8, rng: &mut dyn RngCore) -> SourceAttack {
        coin_attack(bit, self.current_strength(), rng)
    }

    fn on_mode_chosen(&mut self, mode: OperatingMode) {
        self.state = match mode {
            OperatingMode::NoLock => AttackState::Elevated,
            OperatingMode::Lock => AttackState::Base,
        };
        debug!(state = ?self.state, strength = self.current_strength(), "adversary adapted");
    }

    fn nominal_leakage(&self) -> f64 {
        self.base_strength
    }
}

/// Configured source of leakage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeakageSource {
    /// Honest source.
    #[default]
    None,
    /// Deterministic per-signal leakage.
    Fixed {
        /// Bits leaked per signal.
        rate: f64,
    },
    /// Biased-coin leakage at a fixed strength.
    Static {
        /// Probability of learning a bit.
        strength: f64,
    },
    /// Biased-coin leakage that doubles when the source is left unlocked.
    Adaptive {
        /// Base probability of learning a bit.
        base: f64,
    },
}

impl LeakageSource {
    /// Check the parameter range.
    pub fn validate(&self) -> ProtocolResult<()> {
        match *self {
            Self::None => Ok(()),
            Self::Fixed { rate } => check_probability("leakage rate", rate),
            Self::Static { strength } => check_probability("adversary strength", strength),
            Self::Adaptive { base } => check_probability("adversary strength", base),
        }
    }

    /// Build a fresh adversary for one run.
    pub fn build(&self) -> ProtocolResult<Box<dyn AdversaryCapability>> {
        Ok(match *self {
            Self::None => Box::new(NoAdversary),
            Self::Fixed { rate } => Box::new(FixedLeakage::new(rate)?),
            Self::Static { strength } => Box::new(SourceLeakageAdversary::new(strength)?),
            Self::Adaptive { base } => Box::new(AdaptiveAdversary::new(base)?),
        })
    }
}
