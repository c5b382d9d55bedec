//! Noisy evolution through compiled circuits.
//!
//! Each compiled gate is embedded into the full register and applied to the
//! state vector. After every gate the [`GateNoise`] model may insert a
//! random Pauli pair on the two touched qubits. The ideal (noiseless)
//! unitary of a circuit is built separately so the protocol layer can undo
//! the lock with its inverse.

use rand::Rng;
use tracing::trace;

use aether_ir::gate::{adjoint, identity, kron};
use aether_ir::{CompiledCircuit, CompiledGate, Operator, Statevector, embed_gate};

use crate::error::{SimError, SimResult};
use crate::noise::GateNoise;

/// Evolves states through compiled circuits under a gate-noise model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoisyEvolution {
    noise: GateNoise,
}

impl NoisyEvolution {
    /// Create an engine with the given noise model.
    pub fn new(noise: GateNoise) -> Self {
        Self { noise }
    }

    /// Create an engine with ideal gates.
    pub fn noiseless() -> Self {
        Self::new(GateNoise::None)
    }

    /// The noise model.
    pub fn noise(&self) -> GateNoise {
        self.noise
    }

    /// Evolve `initial` through `circuit`.
    ///
    /// All randomness is drawn from `rng`; with [`GateNoise::None`] the
    /// generator is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::WidthMismatch`] if the state and circuit widths
    /// differ.
    pub fn evolve<R: Rng + ?Sized>(
        &self,
        initial: &Statevector,
        circuit: &CompiledCircuit,
        rng: &mut R,
    ) -> SimResult<Statevector> {
        check_width(initial, circuit)?;
        let n = circuit.num_qubits();

        let mut state = initial.clone();
        let mut errors = 0usize;
        for gate in circuit.gates() {
            state = state.apply(&gate_unitary(n, gate)?)?;
            if let Some((pa, pb)) = self.noise.sample(rng) {
                let pauli = kron(&pa.to_operator(), &pb.to_operator());
                state = state.apply(&embed_gate(n, &pauli, &gate.qubits())?)?;
                errors += 1;
            }
        }
        trace!(
            depth = circuit.depth(),
            errors,
            noise = %self.noise,
            "evolved state through circuit"
        );
        Ok(state)
    }
}

/// Evolve with a Pauli-twirl probability `noise_p`.
///
/// # Errors
///
/// Returns [`SimError::InvalidProbability`] if `noise_p` is outside `[0, 1]`.
pub fn evolve_noisily<R: Rng + ?Sized>(
    initial: &Statevector,
    circuit: &CompiledCircuit,
    noise_p: f64,
    rng: &mut R,
) -> SimResult<Statevector> {
    NoisyEvolution::new(GateNoise::pauli_twirl(noise_p)?).evolve(initial, circuit, rng)
}

/// Full-register unitary of a single compiled gate.
pub fn gate_unitary(num_qubits: usize, gate: &CompiledGate) -> SimResult<Operator> {
    Ok(embed_gate(num_qubits, &gate.matrix(), &gate.qubits())?)
}

/// Noiseless product unitary `U = G_k · … · G_1` of a compiled circuit.
pub fn ideal_unitary(circuit: &CompiledCircuit) -> SimResult<Operator> {
    let n = circuit.num_qubits();
    let mut u = identity(1 << n);
    for gate in circuit.gates() {
        u = gate_unitary(n, gate)?.dot(&u);
    }
    Ok(u)
}

/// Inverse of [`ideal_unitary`], i.e. its conjugate transpose.
pub fn unlocking_unitary(circuit: &CompiledCircuit) -> SimResult<Operator> {
    Ok(adjoint(&ideal_unitary(circuit)?))
}

fn check_width(state: &Statevector, circuit: &CompiledCircuit) -> SimResult<()> {
    if state.num_qubits() != circuit.num_qubits() {
        return Err(SimError::WidthMismatch {
            state: state.num_qubits(),
            circuit: circuit.num_qubits(),
        });
    }
    Ok(())
}
