//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::adversary::LeakageSource;
use crate::error::{ProtocolError, ProtocolResult, check_probability};

/// Widest block the locking stage will simulate.
pub const MAX_BLOCK_QUBITS: usize = 10;

/// Default number of signals per run.
pub const DEFAULT_TOTAL_SIGNALS: usize = 20_000;
/// Default locking block width.
pub const DEFAULT_BLOCK_SIZE: usize = 4;
/// Default QBER threshold of the adaptive controller.
pub const DEFAULT_QBER_THRESHOLD: f64 = 0.03;
/// Default leakage threshold of the adaptive controller.
pub const DEFAULT_LEAKAGE_THRESHOLD: f64 = 0.015;

/// Parameters of one simulated key exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of signals sent by each party.
    pub total_signals: usize,
    /// Signals per locking block.
    pub block_size: usize,
    /// Photon loss probability on Alice's channel.
    pub channel_loss_a: f64,
    /// Photon loss probability on Bob's channel.
    pub channel_loss_b: f64,
    /// Hardware bit-flip probability per signal and Pauli-twirl
    /// probability per locking gate.
    pub hardware_noise: f64,
    /// Source-leakage adversary.
    pub leakage: LeakageSource,
    /// Seed of the run's random generator.
    pub rng_seed: u64,
    /// Upper QBER bound below which the source may stay unlocked.
    pub qber_threshold: f64,
    /// Upper leakage bound below which the source may stay unlocked.
    pub leakage_threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_signals: DEFAULT_TOTAL_SIGNALS,
            block_size: DEFAULT_BLOCK_SIZE,
            channel_loss_a: 0.02,
            channel_loss_b: 0.02,
            hardware_noise: 0.001,
            leakage: LeakageSource::None,
            rng_seed: 1,
            qber_threshold: DEFAULT_QBER_THRESHOLD,
            leakage_threshold: DEFAULT_LEAKAGE_THRESHOLD,
        }
    }
}

impl RunConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of signals.
    #[must_use]
    pub fn with_total_signals(mut self, total_signals: usize) -> Self {
        self.total_signals = total_signals;
        self
    }

    /// Set the locking block width.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the same loss on both channels.
    #[must_use]
    pub fn with_loss(mut self, loss: f64) -> Self {
        self.channel_loss_a = loss;
        self.channel_loss_b = loss;
        self
    }

    /// Set per-channel losses.
    #[must_use]
    pub fn with_losses(mut self, loss_a: f64, loss_b: f64) -> Self {
        self.channel_loss_a = loss_a;
        self.channel_loss_b = loss_b;
        self
    }

    /// Set the hardware noise probability.
    #[must_use]
    pub fn with_hardware_noise(mut self, noise: f64) -> Self {
        self.hardware_noise = noise;
        self
    }

    /// Set the leakage source.
    #[must_use]
    pub fn with_leakage(mut self, leakage: LeakageSource) -> Self {
        self.leakage = leakage;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Set both controller thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, qber: f64, leakage: f64) -> Self {
        self.qber_threshold = qber;
        self.leakage_threshold = leakage;
        self
    }

    /// Check ranges that do not depend on the operating mode.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidProbability`] for out-of-range
    /// probabilities and [`ProtocolError::InvalidConfig`] for a zero block.
    pub fn validate(&self) -> ProtocolResult<()> {
        check_probability("channel_loss_a", self.channel_loss_a)?;
        check_probability("channel_loss_b", self.channel_loss_b)?;
        check_probability("hardware_noise", self.hardware_noise)?;
        check_probability("qber_threshold", self.qber_threshold)?;
        check_probability("leakage_threshold", self.leakage_threshold)?;
        self.leakage.validate()?;
        if self.block_size == 0 {
            return Err(ProtocolError::InvalidConfig(
                "block_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Additional checks for runs that may engage the lock.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::BlockSizeMismatch`] if the block size does
    /// not divide the number of signals, and
    /// [`ProtocolError::InvalidConfig`] for blocks narrower than two or wider
    /// than [`MAX_BLOCK_QUBITS`] qubits.
    pub fn validate_lockable(&self) -> ProtocolResult<()> {
        self.validate()?;
        if self.block_size < 2 {
            return Err(ProtocolError::InvalidConfig(
                "locking needs block_size of at least 2".into(),
            ));
        }
        if self.block_size > MAX_BLOCK_QUBITS {
            return Err(ProtocolError::InvalidConfig(format!(
                "block_size {} exceeds the maximum of {MAX_BLOCK_QUBITS}",
                self.block_size
            )));
        }
        if self.total_signals % self.block_size != 0 {
            return Err(ProtocolError::BlockSizeMismatch {
                total_signals: self.total_signals,
                block_size: self.block_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let c = RunConfig::default();
        assert!(c.validate_lockable().is_ok());
        assert_eq!(c.qber_threshold, 0.03);
        assert_eq!(c.leakage_threshold, 0.015);
    }

    #[test]
    fn test_block_size_must_divide() {
        let c = RunConfig::new().with_total_signals(10).with_block_size(4);
        assert!(c.validate().is_ok());
        assert!(matches!(
            c.validate_lockable(),
            Err(ProtocolError::BlockSizeMismatch {
                total_signals: 10,
                block_size: 4
            })
        ));
    }

    #[test]
    fn test_block_size_bounds() {
        assert!(RunConfig::new().with_block_size(0).validate().is_err());
        let wide = RunConfig::new()
            .with_total_signals(110)
            .with_block_size(MAX_BLOCK_QUBITS + 1);
        assert!(wide.validate().is_ok());
        assert!(matches!(
            wide.validate_lockable(),
            Err(ProtocolError::InvalidConfig(_))
        ));
        let single = RunConfig::new().with_block_size(1);
        assert!(single.validate().is_ok());
        assert!(single.validate_lockable().is_err());
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        assert!(RunConfig::new().with_loss(1.5).validate().is_err());
        assert!(RunConfig::new().with_hardware_noise(-0.1).validate().is_err());
        let bad = RunConfig::new().with_leakage(LeakageSource::Adaptive { base: 2.0 });
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "total_signals: 400\nleakage:\n  kind: fixed\n  rate: 0.03\n";
        let c: RunConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(c.total_signals, 400);
        assert_eq!(c.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(c.leakage, LeakageSource::Fixed { rate: 0.03 });
    }
}
