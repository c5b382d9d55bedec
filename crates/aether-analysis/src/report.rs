//! The security report produced at the end of a run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::finite_key::KeyRateEstimate;
use crate::postprocess::{error_correction_cost, privacy_amplified_length};

/// Operating mode chosen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingMode {
    /// Plain MDI exchange, no locking transform.
    NoLock,
    /// Blocks are scrambled by the locking circuit before transmission.
    Lock,
}

impl OperatingMode {
    /// Returns `true` for [`OperatingMode::Lock`].
    pub fn is_locked(self) -> bool {
        self == Self::Lock
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLock => write!(f, "NoLock"),
            Self::Lock => write!(f, "Lock"),
        }
    }
}

/// Outcome of a security analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityReport {
    /// Name of the analysis model.
    pub analysis: String,
    /// Error rate charged for error correction.
    pub qber_observed: f64,
    /// Finite-sample upper bound on the channel error rate.
    pub qber_bound: Option<f64>,
    /// Secure bits per transmitted signal.
    pub secure_key_rate: f64,
    /// Length of the key-producing stream.
    pub sifted_length: usize,
    /// Signals transmitted in the run.
    pub total_signals: usize,
    /// Source leakage rate charged to the key.
    pub leakage_rate: f64,
    /// Estimated final key length after post-processing.
    pub final_key_bits: u64,
    /// Mode chosen by the controller, if the run had one.
    pub mode_chosen: Option<OperatingMode>,
}

impl SecurityReport {
    /// Assemble a report from a key-rate estimate.
    pub fn from_estimate(
        analysis: impl Into<String>,
        estimate: KeyRateEstimate,
        sifted_length: usize,
        total_signals: usize,
        leakage_rate: f64,
        ec_efficiency: f64,
    ) -> Self {
        let ec = error_correction_cost(sifted_length, estimate.qber_observed, ec_efficiency);
        let channel = estimate.qber_bound.unwrap_or(estimate.qber_observed);
        let final_key_bits = if estimate.secure_key_rate > 0.0 {
            privacy_amplified_length(sifted_length, channel, leakage_rate, ec)
        } else {
            0
        };
        Self {
            analysis: analysis.into(),
            qber_observed: estimate.qber_observed,
            qber_bound: estimate.qber_bound,
            secure_key_rate: estimate.secure_key_rate,
            sifted_length,
            total_signals,
            leakage_rate,
            final_key_bits,
            mode_chosen: None,
        }
    }

    /// Attach the controller's mode.
    #[must_use]
    pub fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode_chosen = Some(mode);
        self
    }

    /// Returns `true` if any secure key can be extracted.
    pub fn is_secure(&self) -> bool {
        self.secure_key_rate > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_estimate_has_no_key() {
        let r = SecurityReport::from_estimate("finite_key", KeyRateEstimate::zero(), 0, 100, 0.0, 1.1);
        assert!(!r.is_secure());
        assert_eq!(r.final_key_bits, 0);
        assert_eq!(r.mode_chosen, None);
    }

    #[test]
    fn test_mode_roundtrips_through_json() {
        let r = SecurityReport::from_estimate("dual_stream", KeyRateEstimate::zero(), 0, 0, 0.0, 1.1)
            .with_mode(OperatingMode::Lock);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"mode_chosen\":\"Lock\""));
        let back: SecurityReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
