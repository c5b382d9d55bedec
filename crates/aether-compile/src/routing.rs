//! SWAP-chain routing onto a linear chain.

use tracing::debug;

use aether_ir::{AbstractCircuit, AbstractGate, CompiledCircuit, CompiledGate, GateKind};

use crate::error::{CompileError, CompileResult};

/// Maps abstract gates onto nearest-neighbour hardware.
///
/// A gate on neighbouring qubits passes through unchanged. Otherwise the
/// control is walked towards the target with SWAPs along the chain, the
/// entangling primitive is applied between the last hop and the target, and
/// the SWAPs are undone in reverse order. The layout is therefore restored
/// after every gate, and the routed circuit implements the same unitary as
/// the abstract one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearChainRouter {
    num_qubits: usize,
}

impl LinearChainRouter {
    /// Router for a linear chain of `num_qubits`.
    pub fn new(num_qubits: usize) -> Self {
        Self { num_qubits }
    }

    /// Width of the chain.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Route an abstract circuit.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::DeviceTooSmall`] if the circuit is wider
    /// than the chain and [`CompileError::RoutingFailed`] for a gate whose
    /// two qubits coincide.
    pub fn route(&self, circuit: &AbstractCircuit) -> CompileResult<CompiledCircuit> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(CompileError::DeviceTooSmall {
                circuit: circuit.num_qubits(),
                device: self.num_qubits,
            });
        }

        let mut compiled = CompiledCircuit::new(circuit.num_qubits());
        for gate in circuit.gates() {
            route_gate(gate, &mut compiled)?;
        }

        debug!(
            abstract_gates = circuit.len(),
            compiled_depth = compiled.depth(),
            swaps = compiled.swap_count(),
            "routed locking circuit"
        );
        Ok(compiled)
    }
}

/// Qubits visited walking the chain from `from` to `to`, both included.
pub fn chain_path(from: usize, to: usize) -> Vec<usize> {
    if from <= to {
        (from..=to).collect()
    } else {
        (to..=from).rev().collect()
    }
}

fn hops(path: &[usize]) -> Vec<(usize, usize)> {
    path.windows(2).map(|w| (w[0], w[1])).collect()
}

fn route_gate(gate: &AbstractGate, out: &mut CompiledCircuit) -> CompileResult<()> {
    let (c, t) = (gate.qubit_a, gate.qubit_b);
    if c == t {
        return Err(CompileError::RoutingFailed {
            qubit1: c,
            qubit2: t,
        });
    }
    let path = chain_path(c, t);

    if gate.kind == GateKind::Swap {
        let swaps = hops(&path);
        // Bubble forward then back, skipping the shared middle swap.
        for &(a, b) in &swaps {
            out.push(CompiledGate::Swap(a, b))?;
        }
        for &(a, b) in swaps.iter().rev().skip(1) {
            out.push(CompiledGate::Swap(a, b))?;
        }
        return Ok(());
    }

    // Every hop except the last, which the gate itself uses.
    let swaps = hops(&path[..path.len() - 1]);
    let last_hop = path[path.len() - 2];

    for &(a, b) in &swaps {
        out.push(CompiledGate::Swap(a, b))?;
    }
    out.push(entangle(gate, last_hop, t))?;
    for &(a, b) in swaps.iter().rev() {
        out.push(CompiledGate::Swap(a, b))?;
    }
    Ok(())
}

fn entangle(gate: &AbstractGate, control: usize, target: usize) -> CompiledGate {
    CompiledGate::Entangle {
        control,
        target,
        rotation_a: gate.rotation_a,
        rotation_b: gate.rotation_b,
    }
}

/// Route `circuit` onto a linear chain of its own width.
pub fn compile_circuit(circuit: &AbstractCircuit) -> CompileResult<CompiledCircuit> {
    LinearChainRouter::new(circuit.num_qubits()).route(circuit)
}
