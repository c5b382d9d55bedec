//! `aether-analysis` — finite-key security analysis.
//!
//! Converts sifted bit streams into a certified secure-key-rate estimate:
//!
//! - [`binary_entropy`] and the [`chernoff_hoeffding_bound`] on error rates
//! - [`secure_key_rate`], the finite-key rate formula
//! - [`AnalysisModel`] implementations for single- and dual-stream analysis
//! - post-processing cost estimates for the final key length
//!
//! ```rust
//! use aether_analysis::{AnalysisModel, DualStreamAnalysis, SiftedStreamSet};
//!
//! let mut streams = SiftedStreamSet::new();
//! for i in 0..5_000u32 {
//!     let bit = (i % 2) as u8;
//!     streams.push_high_quality(bit, bit);
//!     streams.push_recycled(bit, bit);
//! }
//! let report = DualStreamAnalysis::default().analyze(&streams, 20_000, 0.0).unwrap();
//! assert!(report.secure_key_rate > 0.0);
//! ```

pub mod entropy;
pub mod error;
pub mod finite_key;
pub mod model;
pub mod postprocess;
pub mod report;
pub mod streams;

pub use entropy::binary_entropy;
pub use error::{AnalysisError, AnalysisResult};
pub use finite_key::{FiniteKeyParams, KeyRateEstimate, chernoff_hoeffding_bound, secure_key_rate};
pub use model::{AnalysisModel, DualStreamAnalysis, FiniteKeyAnalysis};
pub use postprocess::{error_correction_cost, privacy_amplified_length};
pub use report::{OperatingMode, SecurityReport};
pub use streams::{BitStreamPair, SiftedStreamSet};
