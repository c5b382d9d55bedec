//! Operating-mode controllers.
//!
//! Before a run the [`AdaptiveController`] probes the environment with a
//! short diagnostic exchange through a pessimistic relay. If the
//! upper confidence bounds on both the error rate and the source leakage are
//! below their thresholds the source is left unlocked; otherwise every block
//! is scrambled by a locking circuit.

use rand::RngCore;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use aether_analysis::OperatingMode;

use crate::channel::apply_loss;
use crate::config::RunConfig;
use crate::error::{ProtocolError, ProtocolResult};
use crate::relay::{PartialBellRelay, RelayInput, RelayModel, recover_bit};
use crate::source::{Basis, prepare_state, random_bit};

/// Default number of diagnostic rounds.
pub const DEFAULT_DIAGNOSTIC_ROUNDS: usize = 2000;
/// Default depth of the locking circuit.
pub const DEFAULT_LOCKING_DEPTH: usize = 8;
/// Fewer diagnostic samples than this yield the fail-safe statistics.
pub const MIN_DIAGNOSTIC_SAMPLES: usize = 30;
/// Two-sided 95% normal quantile.
pub const CONFIDENCE_Z: f64 = 1.96;
/// Standard deviation of the leakage side-channel estimate.
pub const LEAKAGE_ESTIMATE_SIGMA: f64 = 0.005;

/// Statistics gathered by the diagnostic exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticStats {
    /// Observed error rate.
    pub qber_mean: f64,
    /// Upper 95% bound on the error rate.
    pub qber_upper_bound: f64,
    /// Upper 95% bound on the source leakage.
    pub leakage_upper_bound: f64,
    /// Sifted diagnostic samples.
    pub sifted_samples: usize,
}

impl DiagnosticStats {
    /// Worst-case statistics used when the diagnostics are inconclusive.
    pub fn fail_safe() -> Self {
        Self {
            qber_mean: 0.5,
            qber_upper_bound: 1.0,
            leakage_upper_bound: 1.0,
            sifted_samples: 0,
        }
    }
}

/// The controller's decision for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Operating mode.
    pub mode: OperatingMode,
    /// Locking-circuit depth (0 when unlocked).
    pub locking_depth: usize,
}

impl Decision {
    /// Unlocked operation.
    pub fn no_lock() -> Self {
        Self {
            mode: OperatingMode::NoLock,
            locking_depth: 0,
        }
    }

    /// Locked operation at `depth`.
    pub fn lock(depth: usize) -> Self {
        Self {
            mode: OperatingMode::Lock,
            locking_depth: depth,
        }
    }
}

/// Decides the operating mode of a run.
pub trait Controller {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Whether this controller can ever choose [`OperatingMode::Lock`].
    fn can_lock(&self) -> bool;

    /// Decide the mode for a run of `config`.
    ///
    /// `nominal_leakage` is the adversary's leakage as seen by the
    /// side-channel monitor. Returns the diagnostics, if any were taken.
    fn decide(
        &self,
        config: &RunConfig,
        nominal_leakage: f64,
        rng: &mut dyn RngCore,
    ) -> ProtocolResult<(Option<DiagnosticStats>, Decision)>;
}

/// Diagnostic-driven controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveController {
    /// Diagnostic rounds per run.
    pub diagnostic_rounds: usize,
    /// Depth used when locking.
    pub locking_depth: usize,
    relay: PartialBellRelay,
}

impl Default for AdaptiveController {
    fn default() -> Self {
        Self {
            diagnostic_rounds: DEFAULT_DIAGNOSTIC_ROUNDS,
            locking_depth: DEFAULT_LOCKING_DEPTH,
            relay: PartialBellRelay::diagnostic(),
        }
    }
}

impl AdaptiveController {
    /// Create with default rounds and depth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of diagnostic rounds.
    #[must_use]
    pub fn with_diagnostic_rounds(mut self, rounds: usize) -> Self {
        self.diagnostic_rounds = rounds;
        self
    }

    /// Set the locking depth.
    #[must_use]
    pub fn with_locking_depth(mut self, depth: usize) -> Self {
        self.locking_depth = depth;
        self
    }

    /// Run `n_test` diagnostic rounds with the same loss on both channels.
    pub fn run_diagnostics(
        &self,
        n_test: usize,
        loss: f64,
        true_leakage: f64,
        rng: &mut dyn RngCore,
    ) -> ProtocolResult<DiagnosticStats> {
        self.run_diagnostics_asymmetric(n_test, loss, loss, true_leakage, rng)
    }

    /// Run `n_test` diagnostic rounds with per-channel losses.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range losses.
    pub fn run_diagnostics_asymmetric(
        &self,
        n_test: usize,
        loss_a: f64,
        loss_b: f64,
        true_leakage: f64,
        rng: &mut dyn RngCore,
    ) -> ProtocolResult<DiagnosticStats> {
        let mut samples = 0usize;
        let mut errors = 0usize;
        for _ in 0..n_test {
            let alice_bit = random_bit(rng);
            let alice_basis = Basis::random(rng);
            let bob_bit = random_bit(rng);
            let bob_basis = Basis::random(rng);

            let qa = apply_loss(Some(prepare_state(alice_bit, alice_basis)?), loss_a, rng)?;
            let qb = apply_loss(Some(prepare_state(bob_bit, bob_basis)?), loss_b, rng)?;
            let input = RelayInput {
                alice_bit,
                alice_basis,
                bob_bit,
                bob_basis,
            };
            if let Some(outcome) = self.relay.measure(qa.as_ref(), qb.as_ref(), &input, rng) {
                samples += 1;
                if recover_bit(bob_bit, outcome) != alice_bit {
                    errors += 1;
                }
            }
        }

        if samples < MIN_DIAGNOSTIC_SAMPLES {
            warn!(samples, "too few diagnostic samples, assuming worst case");
            return Ok(DiagnosticStats::fail_safe());
        }

        let n = samples as f64;
        let qber_mean = errors as f64 / n;
        let qber_upper_bound =
            (qber_mean + CONFIDENCE_Z * (qber_mean * (1.0 - qber_mean) / n).sqrt()).max(0.0);

        let monitor = Normal::new(0.0, LEAKAGE_ESTIMATE_SIGMA)
            .map_err(|e| ProtocolError::InvalidConfig(e.to_string()))?;
        let leakage_mean = (true_leakage + monitor.sample(&mut *rng)).clamp(0.0, 1.0);
        let std_err =
            (leakage_mean * (1.0 - leakage_mean) / n_test as f64).sqrt() + 0.001;
        let leakage_upper_bound = (leakage_mean + CONFIDENCE_Z * std_err).max(0.0);

        let stats = DiagnosticStats {
            qber_mean,
            qber_upper_bound,
            leakage_upper_bound,
            sifted_samples: samples,
        };
        debug!(
            samples,
            errors,
            qber_upper = qber_upper_bound,
            leakage_upper = leakage_upper_bound,
            "diagnostics complete"
        );
        Ok(stats)
    }

    /// Map diagnostics to a decision.
    ///
    /// The source stays unlocked only if both upper bounds are strictly
    /// below their thresholds.
    pub fn make_adaptive_decision(
        &self,
        stats: &DiagnosticStats,
        qber_threshold: f64,
        leakage_threshold: f64,
    ) -> Decision {
        if stats.qber_upper_bound < qber_threshold && stats.leakage_upper_bound < leakage_threshold
        {
            Decision::no_lock()
        } else {
            Decision::lock(self.locking_depth)
        }
    }
}

impl Controller for AdaptiveController {
    fn name(&self) -> &str {
        "adaptive"
    }

    fn can_lock(&self) -> bool {
        true
    }

    fn decide(
        &self,
        config: &RunConfig,
        nominal_leakage: f64,
        rng: &mut dyn RngCore,
    ) -> ProtocolResult<(Option<DiagnosticStats>, Decision)> {
        let stats = self.run_diagnostics_asymmetric(
            self.diagnostic_rounds,
            config.channel_loss_a,
            config.channel_loss_b,
            nominal_leakage,
            rng,
        )?;
        let decision =
            self.make_adaptive_decision(&stats, config.qber_threshold, config.leakage_threshold);
        info!(
            mode = %decision.mode,
            depth = decision.locking_depth,
            "controller decision"
        );
        Ok((Some(stats), decision))
    }
}

/// Always returns the configured decision without diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedController {
    decision: Decision,
}

impl FixedController {
    /// Create from a decision.
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }

    /// Always unlocked.
    pub fn no_lock() -> Self {
        Self::new(Decision::no_lock())
    }

    /// Always locked at `depth`.
    pub fn lock(depth: usize) -> Self {
        Self::new(Decision::lock(depth))
    }
}

impl Controller for FixedController {
    fn name(&self) -> &str {
        "fixed"
    }

    fn can_lock(&self) -> bool {
        self.decision.mode.is_locked()
    }

    fn decide(
        &self,
        _config: &RunConfig,
        _nominal_leakage: f64,
        _rng: &mut dyn RngCore,
    ) -> ProtocolResult<(Option<DiagnosticStats>, Decision)> {
        Ok((None, self.decision))
    }
}
