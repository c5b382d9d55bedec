//! Finite-key secure-key-rate estimation.
//!
//! The observed error rate of a finite sample is not trusted directly.
//! Eve's channel information is charged at the Chernoff–Hoeffding upper
//! bound
//!
//! ```text
//! q_bound = min(1, e/n + sqrt(ln(1/ε) / 2n))
//! ```
//!
//! which holds except with probability `ε`, while error correction is
//! charged at the observed rate times the reconciliation efficiency:
//!
//! ```text
//! rate = (n / N) · (1 − h(q_bound) − h(leak) − f·h(e/n))
//! ```
//!
//! clipped at zero.

use serde::{Deserialize, Serialize};

use crate::entropy::binary_entropy;
use crate::error::{AnalysisError, AnalysisResult};

/// Default error-correction efficiency `f`.
pub const DEFAULT_EC_EFFICIENCY: f64 = 1.1;
/// Default failure probability `ε` of the parameter estimate.
pub const DEFAULT_SECURITY_PARAMETER: f64 = 1e-9;

/// Parameters of the finite-key analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiniteKeyParams {
    /// Reconciliation efficiency (≥ 1).
    pub ec_efficiency: f64,
    /// Failure probability of the error-rate bound.
    pub security_parameter: f64,
}

impl Default for FiniteKeyParams {
    fn default() -> Self {
        Self {
            ec_efficiency: DEFAULT_EC_EFFICIENCY,
            security_parameter: DEFAULT_SECURITY_PARAMETER,
        }
    }
}

impl FiniteKeyParams {
    /// Check parameter ranges.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.security_parameter > 0.0 && self.security_parameter < 1.0) {
            return Err(AnalysisError::InvalidSecurityParameter(
                self.security_parameter,
            ));
        }
        if !(self.ec_efficiency >= 1.0) {
            return Err(AnalysisError::InvalidEfficiency(self.ec_efficiency));
        }
        Ok(())
    }
}

/// Result of a single key-rate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyRateEstimate {
    /// Secure bits per transmitted signal.
    pub secure_key_rate: f64,
    /// Error rate charged for error correction.
    pub qber_observed: f64,
    /// Upper bound charged for Eve's channel information, if any data existed.
    pub qber_bound: Option<f64>,
}

impl KeyRateEstimate {
    /// The estimate for an empty key.
    pub fn zero() -> Self {
        Self {
            secure_key_rate: 0.0,
            qber_observed: 0.0,
            qber_bound: None,
        }
    }
}

/// Upper bound on the true error rate given `errors` in `samples`.
///
/// Returns `1.0` when there are no samples.
pub fn chernoff_hoeffding_bound(errors: usize, samples: usize, security_parameter: f64) -> f64 {
    if samples == 0 {
        return 1.0;
    }
    let n = samples as f64;
    let observed = errors as f64 / n;
    let delta = ((1.0 / security_parameter).ln() / (2.0 * n)).sqrt();
    (observed + delta).min(1.0)
}

/// Secure key rate of a sifted key of `sifted_length` bits with
/// `error_count` errors, out of `total_signals` transmitted signals.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidProbability`] if `leakage_rate` is outside
/// `[0, 1]`, or a parameter error from [`FiniteKeyParams::validate`].
pub fn secure_key_rate(
    sifted_length: usize,
    error_count: usize,
    total_signals: usize,
    leakage_rate: f64,
    params: &FiniteKeyParams,
) -> AnalysisResult<KeyRateEstimate> {
    params.validate()?;
    check_leakage(leakage_rate)?;
    if sifted_length == 0 || total_signals == 0 {
        return Ok(KeyRateEstimate::zero());
    }

    let qber_observed = error_count as f64 / sifted_length as f64;
    let qber_bound =
        chernoff_hoeffding_bound(error_count, sifted_length, params.security_parameter);
    let sifting_efficiency = sifted_length as f64 / total_signals as f64;

    Ok(KeyRateEstimate {
        secure_key_rate: rate_formula(
            sifting_efficiency,
            qber_bound,
            leakage_rate,
            qber_observed,
            params.ec_efficiency,
        ),
        qber_observed,
        qber_bound: Some(qber_bound),
    })
}

/// `η · (1 − h(q_bound) − h(leak) − f·h(q_obs))`, clipped at zero.
pub(crate) fn rate_formula(
    sifting_efficiency: f64,
    qber_bound: f64,
    leakage_rate: f64,
    qber_observed: f64,
    ec_efficiency: f64,
) -> f64 {
    let eve_channel = binary_entropy(qber_bound);
    let eve_source = binary_entropy(leakage_rate);
    let correction = ec_efficiency * binary_entropy(qber_observed);
    (sifting_efficiency * (1.0 - eve_channel - eve_source - correction)).max(0.0)
}

pub(crate) fn check_leakage(leakage_rate: f64) -> AnalysisResult<()> {
    if !(0.0..=1.0).contains(&leakage_rate) {
        return Err(AnalysisError::InvalidProbability {
            name: "leakage rate",
            value: leakage_rate,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_without_samples() {
        assert_eq!(chernoff_hoeffding_bound(0, 0, 1e-9), 1.0);
    }

    #[test]
    fn test_bound_value() {
        // ln(1e9) / 20000 = 0.0010362; sqrt = 0.032190
        let b = chernoff_hoeffding_bound(100, 10_000, 1e-9);
        assert!((b - (0.01 + 0.032_190)).abs() < 1e-5);
    }

    #[test]
    fn test_bound_clipped() {
        assert_eq!(chernoff_hoeffding_bound(9, 10, 1e-9), 1.0);
    }

    #[test]
    fn test_zero_sifted_is_zero_rate() {
        let r = secure_key_rate(0, 0, 1000, 0.0, &FiniteKeyParams::default()).unwrap();
        assert_eq!(r, KeyRateEstimate::zero());
        let r = secure_key_rate(10, 0, 0, 0.0, &FiniteKeyParams::default()).unwrap();
        assert_eq!(r.secure_key_rate, 0.0);
    }

    #[test]
    fn test_clean_large_key_has_positive_rate() {
        let r = secure_key_rate(50_000, 0, 100_000, 0.0, &FiniteKeyParams::default()).unwrap();
        assert!(r.secure_key_rate > 0.3);
        assert!(r.secure_key_rate < 0.5);
        assert_eq!(r.qber_observed, 0.0);
    }

    #[test]
    fn test_high_error_rate_clips_to_zero() {
        let r = secure_key_rate(10_000, 1_500, 20_000, 0.0, &FiniteKeyParams::default()).unwrap();
        assert_eq!(r.secure_key_rate, 0.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let p = FiniteKeyParams::default();
        assert!(matches!(
            secure_key_rate(10, 0, 10, 1.5, &p),
            Err(AnalysisError::InvalidProbability { .. })
        ));
        let bad = FiniteKeyParams {
            security_parameter: 0.0,
            ..p
        };
        assert!(matches!(
            secure_key_rate(10, 0, 10, 0.0, &bad),
            Err(AnalysisError::InvalidSecurityParameter(_))
        ));
        let bad = FiniteKeyParams {
            ec_efficiency: 0.9,
            ..p
        };
        assert!(bad.validate().is_err());
    }
}
