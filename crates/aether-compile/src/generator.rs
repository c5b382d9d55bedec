//! Locking-circuit generators.
//!
//! A locking circuit is a random sequence of entangling gates, each
//! preceded by independent Haar-random rotations on its two qubits. The
//! generators differ only in how they pick the qubit pair for each step.
//!
//! All randomness comes from a `StdRng` seeded from the caller's seed, so
//! the same `(num_qubits, depth, seed)` always produces the same circuit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use aether_ir::{AbstractCircuit, AbstractGate, Unitary2x2};

use crate::error::{CompileError, CompileResult};

/// Produces abstract locking circuits.
pub trait CircuitGenerator {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Generate `depth` gates on `num_qubits` qubits.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::TooFewQubits`] if `num_qubits < 2`.
    fn generate(&self, num_qubits: usize, depth: usize, seed: u64)
    -> CompileResult<AbstractCircuit>;
}

/// Default long-range probability at the first step.
pub const DEFAULT_P_INITIAL: f64 = 0.5;
/// Default long-range probability at the last step.
pub const DEFAULT_P_FINAL: f64 = 0.05;
/// Long-range gates are only drawn on registers at least this wide.
pub const MIN_QUBITS_FOR_LONG_RANGE: usize = 4;
/// Seed offset that decorrelates the uniform baseline from the adaptive one.
pub const UNIFORM_SEED_OFFSET: u64 = 9999;

/// The adaptive braid generator.
///
/// Early gates favour long-range pairs to spread information quickly across
/// the block; the long-range probability then decays linearly towards
/// `p_final`, so later gates are mostly cheap nearest-neighbour operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveBraidGenerator {
    p_initial: f64,
    p_final: f64,
}

impl AdaptiveBraidGenerator {
    /// Create a generator with the default schedule (0.5 → 0.05).
    pub fn new() -> Self {
        Self {
            p_initial: DEFAULT_P_INITIAL,
            p_final: DEFAULT_P_FINAL,
        }
    }

    /// Create a generator with a custom long-range schedule.
    pub fn with_schedule(p_initial: f64, p_final: f64) -> CompileResult<Self> {
        for p in [p_initial, p_final] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CompileError::InvalidProbability(p));
            }
        }
        Ok(Self { p_initial, p_final })
    }

    /// Long-range probability at `step` of a `depth`-gate circuit.
    pub fn long_range_probability(&self, step: usize, depth: usize) -> f64 {
        if depth <= 1 {
            return self.p_final;
        }
        let frac = step as f64 / (depth - 1) as f64;
        self.p_initial + (self.p_final - self.p_initial) * frac
    }
}

impl Default for AdaptiveBraidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitGenerator for AdaptiveBraidGenerator {
    fn name(&self) -> &str {
        "adaptive-braid"
    }

    fn generate(
        &self,
        num_qubits: usize,
        depth: usize,
        seed: u64,
    ) -> CompileResult<AbstractCircuit> {
        if num_qubits < 2 {
            return Err(CompileError::TooFewQubits(num_qubits));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let long_range_pairs: Vec<(usize, usize)> = (0..num_qubits)
            .flat_map(|i| (0..num_qubits).map(move |j| (i, j)))
            .filter(|&(i, j)| i.abs_diff(j) > 1)
            .collect();

        let mut circuit = AbstractCircuit::new(num_qubits);
        for step in 0..depth {
            let p = self.long_range_probability(step, depth);
            let draw: f64 = rng.r#gen();
            let (control, target) = if draw < p && num_qubits >= MIN_QUBITS_FOR_LONG_RANGE {
                long_range_pairs[rng.gen_range(0..long_range_pairs.len())]
            } else {
                let i = rng.gen_range(0..num_qubits - 1);
                if rng.r#gen::<f64>() < 0.5 {
                    (i + 1, i)
                } else {
                    (i, i + 1)
                }
            };
            let rotation_a = Unitary2x2::haar_random(&mut rng);
            let rotation_b = Unitary2x2::haar_random(&mut rng);
            circuit.push(AbstractGate::entangle(control, target, rotation_a, rotation_b))?;
        }

        debug!(
            generator = self.name(),
            num_qubits,
            depth,
            long_range = circuit.long_range_count(),
            "generated locking circuit"
        );
        Ok(circuit)
    }
}

/// Uniformly random pairs, used as the non-adaptive baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformRandomGenerator;

impl CircuitGenerator for UniformRandomGenerator {
    fn name(&self) -> &str {
        "uniform-random"
    }

    fn generate(
        &self,
        num_qubits: usize,
        depth: usize,
        seed: u64,
    ) -> CompileResult<AbstractCircuit> {
        if num_qubits < 2 {
            return Err(CompileError::TooFewQubits(num_qubits));
        }
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(UNIFORM_SEED_OFFSET));
        let mut circuit = AbstractCircuit::new(num_qubits);
        for _ in 0..depth {
            let control = rng.gen_range(0..num_qubits);
            let mut target = rng.gen_range(0..num_qubits - 1);
            if target >= control {
                target += 1;
            }
            let rotation_a = Unitary2x2::haar_random(&mut rng);
            let rotation_b = Unitary2x2::haar_random(&mut rng);
            circuit.push(AbstractGate::entangle(control, target, rotation_a, rotation_b))?;
        }

        debug!(
            generator = self.name(),
            num_qubits,
            depth,
            long_range = circuit.long_range_count(),
            "generated locking circuit"
        );
        Ok(circuit)
    }
}
