//! Pluggable analysis models.
//!
//! An [`AnalysisModel`] turns the sifted streams of a run into a
//! [`SecurityReport`]. Two models are provided:
//!
//! - [`FiniteKeyAnalysis`]: errors are counted on the key stream itself.
//! - [`DualStreamAnalysis`]: the channel error rate is measured on the
//!   recycled (mismatched-basis) stream and charged to the key stream, so no
//!   key bits are sacrificed for parameter estimation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalysisResult;
use crate::finite_key::{
    FiniteKeyParams, KeyRateEstimate, chernoff_hoeffding_bound, check_leakage, rate_formula,
    secure_key_rate,
};
use crate::report::SecurityReport;
use crate::streams::SiftedStreamSet;

/// Turns sifted streams into a security report.
pub trait AnalysisModel {
    /// Short identifier recorded in the report.
    fn name(&self) -> &str;

    /// Analyse a finished run.
    ///
    /// `leakage_rate` is the per-signal source leakage the adversary
    /// obtained; it must lie in `[0, 1]`.
    fn analyze(
        &self,
        streams: &SiftedStreamSet,
        total_signals: usize,
        leakage_rate: f64,
    ) -> AnalysisResult<SecurityReport>;
}

/// Single-stream finite-key analysis on the high-quality stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FiniteKeyAnalysis {
    /// Analysis parameters.
    pub params: FiniteKeyParams,
}

impl FiniteKeyAnalysis {
    /// Create with explicit parameters.
    pub fn new(params: FiniteKeyParams) -> Self {
        Self { params }
    }
}

impl AnalysisModel for FiniteKeyAnalysis {
    fn name(&self) -> &str {
        "finite_key"
    }

    fn analyze(
        &self,
        streams: &SiftedStreamSet,
        total_signals: usize,
        leakage_rate: f64,
    ) -> AnalysisResult<SecurityReport> {
        let key = streams.high_quality();
        let estimate = secure_key_rate(
            key.len(),
            key.errors(),
            total_signals,
            leakage_rate,
            &self.params,
        )?;
        debug!(
            model = self.name(),
            sifted = key.len(),
            errors = key.errors(),
            rate = estimate.secure_key_rate,
            "finite-key analysis"
        );
        Ok(SecurityReport::from_estimate(
            self.name(),
            estimate,
            key.len(),
            total_signals,
            leakage_rate,
            self.params.ec_efficiency,
        ))
    }
}

/// Minimum recycled samples before their error rate is trusted.
pub const DEFAULT_MIN_DIAGNOSTIC_SAMPLES: usize = 20;

/// Dual-stream analysis: key from the high-quality stream, error rate from
/// the recycled stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualStreamAnalysis {
    /// Analysis parameters.
    pub params: FiniteKeyParams,
    /// The recycled error rate is used only above this many samples.
    pub min_diagnostic_samples: usize,
}

impl Default for DualStreamAnalysis {
    fn default() -> Self {
        Self {
            params: FiniteKeyParams::default(),
            min_diagnostic_samples: DEFAULT_MIN_DIAGNOSTIC_SAMPLES,
        }
    }
}

impl DualStreamAnalysis {
    /// Create with explicit parameters.
    pub fn new(params: FiniteKeyParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }
}

impl AnalysisModel for DualStreamAnalysis {
    fn name(&self) -> &str {
        "dual_stream"
    }

    fn analyze(
        &self,
        streams: &SiftedStreamSet,
        total_signals: usize,
        leakage_rate: f64,
    ) -> AnalysisResult<SecurityReport> {
        self.params.validate()?;
        check_leakage(leakage_rate)?;

        let key = streams.high_quality();
        let diagnostic = streams.recycled();
        if key.is_empty() || total_signals == 0 {
            return Ok(SecurityReport::from_estimate(
                self.name(),
                KeyRateEstimate::zero(),
                key.len(),
                total_signals,
                leakage_rate,
                self.params.ec_efficiency,
            ));
        }

        let trusted = diagnostic.len() > self.min_diagnostic_samples;
        let qber_observed = if trusted {
            diagnostic.errors() as f64 / diagnostic.len() as f64
        } else {
            0.0
        };
        // Too few recycled samples to bound the channel: fall back to the
        // key stream's own counts.
        let (bound_errors, bound_samples) = if trusted {
            (diagnostic.errors(), diagnostic.len())
        } else {
            (key.errors(), key.len())
        };
        let qber_bound =
            chernoff_hoeffding_bound(bound_errors, bound_samples, self.params.security_parameter);
        let sifting_efficiency = key.len() as f64 / total_signals as f64;
        let rate = rate_formula(
            sifting_efficiency,
            qber_bound,
            leakage_rate,
            qber_observed,
            self.params.ec_efficiency,
        );

        debug!(
            model = self.name(),
            key_len = key.len(),
            diagnostic_len = diagnostic.len(),
            qber_observed,
            qber_bound,
            rate,
            "dual-stream analysis"
        );

        let estimate = KeyRateEstimate {
            secure_key_rate: rate,
            qber_observed,
            qber_bound: Some(qber_bound),
        };
        Ok(SecurityReport::from_estimate(
            self.name(),
            estimate,
            key.len(),
            total_signals,
            leakage_rate,
            self.params.ec_efficiency,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streams(hq: usize, hq_err: usize, rc: usize, rc_err: usize) -> SiftedStreamSet {
        let mut s = SiftedStreamSet::new();
        for i in 0..hq {
            s.push_high_quality(0, u8::from(i < hq_err));
        }
        for i in 0..rc {
            s.push_recycled(1, u8::from(i >= rc_err));
        }
        s
    }

    #[test]
    fn test_finite_key_uses_high_quality_errors() {
        let s = streams(10_000, 100, 10_000, 5_000);
        let r = FiniteKeyAnalysis::default().analyze(&s, 40_000, 0.0).unwrap();
        assert!((r.qber_observed - 0.01).abs() < 1e-12);
        assert_eq!(r.sifted_length, 10_000);
        assert_eq!(r.analysis, "finite_key");
    }

    #[test]
    fn test_dual_stream_uses_recycled_error_rate() {
        let s = streams(10_000, 0, 10_000, 200);
        let r = DualStreamAnalysis::default().analyze(&s, 40_000, 0.0).unwrap();
        assert!((r.qber_observed - 0.02).abs() < 1e-12);
        let bound = r.qber_bound.unwrap();
        assert!((bound - chernoff_hoeffding_bound(200, 10_000, 1e-9)).abs() < 1e-15);
        assert!(r.is_secure());
    }

    #[test]
    fn test_dual_stream_small_diagnostic_reports_zero_qber() {
        let s = streams(10_000, 0, 20, 10);
        let r = DualStreamAnalysis::default().analyze(&s, 40_000, 0.0).unwrap();
        assert_eq!(r.qber_observed, 0.0);
        let fallback = chernoff_hoeffding_bound(0, 10_000, 1e-9);
        assert!((r.qber_bound.unwrap() - fallback).abs() < 1e-15);
    }

    #[test]
    fn test_dual_stream_empty_key() {
        let s = streams(0, 0, 100, 0);
        let r = DualStreamAnalysis::default().analyze(&s, 1000, 0.0).unwrap();
        assert_eq!(r.secure_key_rate, 0.0);
        assert_eq!(r.qber_bound, None);
    }

    #[test]
    fn test_leakage_lowers_rate() {
        let s = streams(10_000, 0, 10_000, 50);
        let clean = DualStreamAnalysis::default().analyze(&s, 40_000, 0.0).unwrap();
        let leaky = DualStreamAnalysis::default().analyze(&s, 40_000, 0.03).unwrap();
        assert!(leaky.secure_key_rate < clean.secure_key_rate);
    }
}
