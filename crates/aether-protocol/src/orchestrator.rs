//! The AETHER run orchestrator.
//!
//! A run proceeds in five steps:
//!
//! 1. validate the [`RunConfig`] and seed one [`StdRng`];
//! 2. ask the [`Controller`] for a [`Decision`] and tell the adversary;
//! 3. if locking, generate and route a locking circuit for one block and
//!    precompute its inverse;
//! 4. exchange all signals block by block through the relay, sifting into
//!    the high-quality and recycled streams;
//! 5. hand the streams to the [`AnalysisModel`].
//!
//! The relay, analysis and controller are pluggable so the same loop also
//! runs the MDI baseline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use aether_analysis::{
    AnalysisModel, DualStreamAnalysis, OperatingMode, SecurityReport, SiftedStreamSet,
};
use aether_compile::{AdaptiveBraidGenerator, CircuitGenerator, compile_circuit};
use aether_ir::{CompiledCircuit, Operator, Statevector};
use aether_sim::{GateNoise, NoisyEvolution, unlocking_unitary};

use crate::adversary::AdversaryCapability;
use crate::channel::apply_loss;
use crate::config::RunConfig;
use crate::controller::{AdaptiveController, Controller, Decision, DiagnosticStats};
use crate::error::{ProtocolError, ProtocolResult};
use crate::relay::{PerfectBellRelay, RelayInput, RelayModel, recover_bit};
use crate::source::{Basis, check_bit, prepare_state, random_bit};

/// Fidelities this close to 1 are treated as exact and draw nothing.
pub const FIDELITY_TOLERANCE: f64 = 1e-12;

/// A routed locking circuit and its precomputed inverse.
#[derive(Debug, Clone)]
pub struct LockingStage {
    circuit: CompiledCircuit,
    unlock: Operator,
    evolution: NoisyEvolution,
}

impl LockingStage {
    /// Generate, route and invert a locking circuit.
    ///
    /// `gate_noise` is the Pauli-twirl probability applied after every
    /// routed gate.
    pub fn build(
        generator: &dyn CircuitGenerator,
        block_size: usize,
        depth: usize,
        seed: u64,
        gate_noise: f64,
    ) -> ProtocolResult<Self> {
        let circuit = compile_circuit(&generator.generate(block_size, depth, seed)?)?;
        let unlock = unlocking_unitary(&circuit)?;
        let evolution = NoisyEvolution::new(GateNoise::pauli_twirl(gate_noise)?);
        debug!(
            generator = generator.name(),
            block_size,
            depth,
            compiled_depth = circuit.depth(),
            swaps = circuit.swap_count(),
            "locking stage ready"
        );
        Ok(Self {
            circuit,
            unlock,
            evolution,
        })
    }

    /// The routed circuit.
    pub fn circuit(&self) -> &CompiledCircuit {
        &self.circuit
    }

    /// Block width.
    pub fn width(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Lock, transmit through the noisy hardware and unlock `initial`,
    /// returning the fidelity of the result with `initial`.
    pub fn fidelity<R: Rng + ?Sized>(&self, initial: &Statevector, rng: &mut R) -> ProtocolResult<f64> {
        let locked = self.evolution.evolve(initial, &self.circuit, rng)?;
        let restored = locked.apply(&self.unlock)?;
        Ok(restored.fidelity(initial)?)
    }
}

/// Raw result of the signal exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeStats {
    /// Sifted streams.
    pub streams: SiftedStreamSet,
    /// Sum of per-signal leakage.
    pub total_leakage: f64,
    /// Blocks passed through the locking stage.
    pub locked_blocks: usize,
    /// Blocks in which a bit was corrupted by fidelity collapse.
    pub collapses: usize,
    /// Sum of unlock fidelities over locked blocks.
    pub fidelity_sum: f64,
}

impl ExchangeStats {
    /// Mean unlock fidelity, if any block was locked.
    pub fn mean_fidelity(&self) -> Option<f64> {
        (self.locked_blocks > 0).then(|| self.fidelity_sum / self.locked_blocks as f64)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Security analysis of the sifted key.
    pub report: SecurityReport,
    /// Controller decision.
    pub decision: Decision,
    /// Controller diagnostics, if any were taken.
    pub diagnostics: Option<DiagnosticStats>,
    /// Sifted streams.
    pub streams: SiftedStreamSet,
    /// Per-signal leakage rate charged to the key.
    pub leakage_rate: f64,
    /// Depth of the routed locking circuit, if locked.
    pub compiled_depth: Option<usize>,
    /// Blocks corrupted by fidelity collapse.
    pub fidelity_collapses: usize,
    /// Mean unlock fidelity over locked blocks.
    pub mean_fidelity: Option<f64>,
}

/// The adaptive locked MDI-QKD protocol.
pub struct AetherProtocol {
    config: RunConfig,
    relay: Box<dyn RelayModel>,
    analysis: Box<dyn AnalysisModel>,
    controller: Box<dyn Controller>,
    generator: Box<dyn CircuitGenerator>,
}

impl AetherProtocol {
    /// Create a protocol with the perfect relay, dual-stream analysis,
    /// adaptive controller and adaptive braid generator.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            relay: Box::new(PerfectBellRelay),
            analysis: Box::new(DualStreamAnalysis::default()),
            controller: Box::new(AdaptiveController::default()),
            generator: Box::new(AdaptiveBraidGenerator::new()),
        }
    }

    /// Replace the relay model.
    #[must_use]
    pub fn with_relay(mut self, relay: impl RelayModel + 'static) -> Self {
        self.relay = Box::new(relay);
        self
    }

    /// Replace the analysis model.
    #[must_use]
    pub fn with_analysis(mut self, analysis: impl AnalysisModel + 'static) -> Self {
        self.analysis = Box::new(analysis);
        self
    }

    /// Replace the controller.
    #[must_use]
    pub fn with_controller(mut self, controller: impl Controller + 'static) -> Self {
        self.controller = Box::new(controller);
        self
    }

    /// Replace the locking-circuit generator.
    #[must_use]
    pub fn with_generator(mut self, generator: impl CircuitGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Build the locking stage for this configuration at `depth`.
    pub fn locking_stage(&self, depth: usize) -> ProtocolResult<LockingStage> {
        LockingStage::build(
            self.generator.as_ref(),
            self.config.block_size,
            depth,
            self.config.rng_seed,
            self.config.hardware_noise,
        )
    }

    /// Execute one full run.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration. Runs whose controller
    /// may lock additionally require the block size to divide the number of
    /// signals.
    pub fn run(&self) -> ProtocolResult<RunOutcome> {
        if self.controller.can_lock() {
            self.config.validate_lockable()?;
        } else {
            self.config.validate()?;
        }

        let mut rng = StdRng::seed_from_u64(self.config.rng_seed);
        let mut adversary = self.config.leakage.build()?;

        let (diagnostics, decision) =
            self.controller
                .decide(&self.config, adversary.nominal_leakage(), &mut rng)?;
        adversary.on_mode_chosen(decision.mode);

        let stage = match decision.mode {
            OperatingMode::Lock => Some(self.locking_stage(decision.locking_depth)?),
            OperatingMode::NoLock => None,
        };

        let stats = self.exchange(decision.mode, stage.as_ref(), adversary.as_mut(), &mut rng)?;

        let total = self.config.total_signals;
        let leakage_rate = if total == 0 {
            0.0
        } else {
            (stats.total_leakage / total as f64).min(1.0)
        };
        let report = self
            .analysis
            .analyze(&stats.streams, total, leakage_rate)?
            .with_mode(decision.mode);

        info!(
            mode = %decision.mode,
            relay = self.relay.name(),
            analysis = self.analysis.name(),
            sifted = report.sifted_length,
            qber = report.qber_observed,
            skr = report.secure_key_rate,
            "run complete"
        );

        Ok(RunOutcome {
            report,
            decision,
            diagnostics,
            mean_fidelity: stats.mean_fidelity(),
            fidelity_collapses: stats.collapses,
            streams: stats.streams,
            leakage_rate,
            compiled_depth: stage.as_ref().map(|s| s.circuit().depth()),
        })
    }

    /// Exchange all configured signals in `mode`.
    ///
    /// Signals are processed in blocks of `block_size`. When `lock` is
    /// given every block passes through it; its width must then equal the
    /// block size.
    pub fn exchange(
        &self,
        mode: OperatingMode,
        lock: Option<&LockingStage>,
        adversary: &mut dyn AdversaryCapability,
        rng: &mut StdRng,
    ) -> ProtocolResult<ExchangeStats> {
        let mut stats = ExchangeStats::default();
        let mut remaining = self.config.total_signals;
        while remaining > 0 {
            let len = remaining.min(self.config.block_size);
            remaining -= len;
            self.exchange_block(len, mode, lock, adversary, rng, &mut stats)?;
        }
        debug!(
            high_quality = stats.streams.high_quality().len(),
            recycled = stats.streams.recycled().len(),
            collapses = stats.collapses,
            "exchange finished"
        );
        Ok(stats)
    }

    fn exchange_block(
        &self,
        len: usize,
        mode: OperatingMode,
        lock: Option<&LockingStage>,
        adversary: &mut dyn AdversaryCapability,
        rng: &mut StdRng,
        stats: &mut ExchangeStats,
    ) -> ProtocolResult<()> {
        let cfg = &self.config;
        let alice_bits: Vec<u8> = (0..len).map(|_| random_bit(rng)).collect();
        let alice_bases: Vec<Basis> = (0..len).map(|_| Basis::random(rng)).collect();
        let bob_bits: Vec<u8> = (0..len).map(|_| random_bit(rng)).collect();
        let bob_bases: Vec<Basis> = (0..len).map(|_| Basis::random(rng)).collect();

        let mut sent = alice_bits.clone();
        if mode == OperatingMode::NoLock {
            for bit in &mut sent {
                let attack = adversary.attack(*bit, rng);
                *bit = check_bit(attack.bit)?;
                stats.total_leakage += attack.leakage;
            }
        }

        if let Some(stage) = lock {
            if stage.width() != len {
                return Err(ProtocolError::BlockSizeMismatch {
                    total_signals: cfg.total_signals,
                    block_size: stage.width(),
                });
            }
            let prepared = alice_bits
                .iter()
                .zip(&alice_bases)
                .map(|(&bit, &basis)| prepare_state(bit, basis))
                .collect::<ProtocolResult<Vec<_>>>()?;
            let psi = Statevector::tensor_product(&prepared)?;
            let fidelity = stage.fidelity(&psi, rng)?;
            stats.locked_blocks += 1;
            stats.fidelity_sum += fidelity;
            // Fidelity collapse: with probability 1 - F one bit of the block
            // arrives corrupted.
            if fidelity < 1.0 - FIDELITY_TOLERANCE && rng.r#gen::<f64>() > fidelity {
                let victim = rng.gen_range(0..len);
                sent[victim] ^= 1;
                stats.collapses += 1;
                debug!(fidelity, victim, "fidelity collapse");
            }
        }

        for i in 0..len {
            let mut alice_tx = sent[i];
            // Drawn in both modes so Lock and NoLock consume the generator
            // identically; locked blocks take their noise from the lock.
            let alice_glitch = rng.r#gen::<f64>() < cfg.hardware_noise;
            if mode == OperatingMode::NoLock && alice_glitch {
                alice_tx ^= 1;
            }
            let mut bob_tx = bob_bits[i];
            if rng.r#gen::<f64>() < cfg.hardware_noise {
                bob_tx ^= 1;
            }

            let qa = apply_loss(
                Some(prepare_state(alice_tx, alice_bases[i])?),
                cfg.channel_loss_a,
                rng,
            )?;
            let qb = apply_loss(
                Some(prepare_state(bob_tx, bob_bases[i])?),
                cfg.channel_loss_b,
                rng,
            )?;
            let input = RelayInput {
                alice_bit: alice_tx,
                alice_basis: alice_bases[i],
                bob_bit: bob_tx,
                bob_basis: bob_bases[i],
            };
            let Some(outcome) = self.relay.measure(qa.as_ref(), qb.as_ref(), &input, rng) else {
                continue;
            };

            let bob_key = recover_bit(bob_bits[i], outcome);
            if alice_bases[i] == bob_bases[i] {
                stats.streams.push_high_quality(alice_bits[i], bob_key);
            } else {
                stats.streams.push_recycled(alice_bits[i], bob_key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    use crate::adversary::{NoAdversary, SourceAttack};
    use crate::controller::FixedController;

    struct GarbledSource;

    impl AdversaryCapability for GarbledSource {
        fn name(&self) -> &str {
            "garbled"
        }

        fn attack(&mut self, _bit: u8, _rng: &mut dyn RngCore) -> SourceAttack {
            SourceAttack { bit: 2, leakage: 0.0 }
        }

        fn nominal_leakage(&self) -> f64 {
            0.0
        }
    }

    fn small() -> RunConfig {
        RunConfig::new().with_total_signals(400).with_block_size(4)
    }

    #[test]
    fn test_identity_lock_matches_no_lock() {
        let protocol = AetherProtocol::new(small());
        let stage = protocol.locking_stage(0).unwrap();
        assert!(stage.circuit().is_empty());

        let mut rng = StdRng::seed_from_u64(5);
        let locked = protocol
            .exchange(OperatingMode::Lock, Some(&stage), &mut NoAdversary, &mut rng)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let plain = protocol
            .exchange(OperatingMode::Lock, None, &mut NoAdversary, &mut rng)
            .unwrap();

        assert_eq!(locked.streams, plain.streams);
        assert_eq!(locked.collapses, 0);
        assert!((locked.mean_fidelity().unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(plain.mean_fidelity(), None);
    }

    #[test]
    fn test_noiseless_lock_never_collapses() {
        let cfg = small().with_hardware_noise(0.0);
        let protocol = AetherProtocol::new(cfg);
        let stage = protocol.locking_stage(8).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let stats = protocol
            .exchange(OperatingMode::Lock, Some(&stage), &mut NoAdversary, &mut rng)
            .unwrap();
        assert_eq!(stats.collapses, 0);
        assert_eq!(stats.locked_blocks, 100);
        assert_eq!(stats.streams.high_quality().errors(), 0);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let protocol = AetherProtocol::new(small());
        let other = AetherProtocol::new(small().with_block_size(2));
        let stage = other.locking_stage(2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            protocol.exchange(OperatingMode::Lock, Some(&stage), &mut NoAdversary, &mut rng),
            Err(ProtocolError::BlockSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_unlocked_run_allows_remainder_block() {
        let cfg = RunConfig::new().with_total_signals(10).with_block_size(4);
        let outcome = AetherProtocol::new(cfg.clone())
            .with_controller(FixedController::no_lock())
            .run()
            .unwrap();
        assert!(outcome.streams.total_len() <= 10);
        assert!(AetherProtocol::new(cfg).run().is_err());
    }

    #[test]
    fn test_zero_signals() {
        let outcome = AetherProtocol::new(small().with_total_signals(0)).run().unwrap();
        assert_eq!(outcome.report.secure_key_rate, 0.0);
        assert_eq!(outcome.report.sifted_length, 0);
        assert_eq!(outcome.leakage_rate, 0.0);
    }

    #[test]
    fn test_modes_consume_generator_identically() {
        let protocol = AetherProtocol::new(small().with_hardware_noise(0.0));
        let stage = protocol.locking_stage(0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let locked = protocol
            .exchange(OperatingMode::Lock, Some(&stage), &mut NoAdversary, &mut rng)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let plain = protocol
            .exchange(OperatingMode::NoLock, None, &mut NoAdversary, &mut rng)
            .unwrap();
        assert_eq!(locked.streams, plain.streams);
    }

    #[test]
    fn test_adversary_must_emit_a_bit() {
        let protocol = AetherProtocol::new(small());
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            protocol.exchange(OperatingMode::NoLock, None, &mut GarbledSource, &mut rng),
            Err(ProtocolError::InvalidBit(2))
        ));
    }
}
