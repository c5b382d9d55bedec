//! `aether-protocol` — adaptive locked MDI-QKD.
//!
//! This crate wires the circuit, simulation and analysis crates into a full
//! key exchange:
//!
//! - collaborator primitives: [`prepare_state`], [`apply_loss`],
//!   [`measure`], Bell-state [relays](relay) and source-leakage
//!   [adversaries](adversary)
//! - the [`AdaptiveController`] that decides whether to lock the source
//! - the [`AetherProtocol`] orchestrator
//! - the MDI and BB84 [baselines](baseline)
//!
//! # Example
//!
//! ```rust
//! use aether_protocol::{AetherProtocol, RunConfig};
//!
//! let config = RunConfig::new().with_total_signals(2_000).with_seed(7);
//! let outcome = AetherProtocol::new(config).run().unwrap();
//! assert_eq!(outcome.report.total_signals, 2_000);
//! assert!(outcome.report.mode_chosen.is_some());
//! ```

pub mod adversary;
pub mod baseline;
pub mod channel;
pub mod config;
pub mod controller;
pub mod error;
pub mod orchestrator;
pub mod relay;
pub mod source;

pub use adversary::{
    AdaptiveAdversary, AdversaryCapability, AttackState, FixedLeakage, LeakageSource,
    NoAdversary, SourceAttack, SourceLeakageAdversary,
};
pub use baseline::{Bb84Outcome, Comparison, run_bb84, run_comparison, run_mdi_baseline};
pub use channel::{apply_loss, measure};
pub use config::{MAX_BLOCK_QUBITS, RunConfig};
pub use controller::{AdaptiveController, Controller, Decision, DiagnosticStats, FixedController};
pub use error::{ProtocolError, ProtocolResult};
pub use orchestrator::{AetherProtocol, ExchangeStats, LockingStage, RunOutcome};
pub use relay::{BellState, PartialBellRelay, PerfectBellRelay, RelayInput, RelayModel, recover_bit};
pub use source::{Basis, prepare_state, random_bit};

pub use aether_analysis::{OperatingMode, SecurityReport};
