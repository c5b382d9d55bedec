//! Gate sequences over a fixed register.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{AbstractGate, CompiledGate};

/// An ordered list of abstract gates on `num_qubits` logical qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractCircuit {
    num_qubits: usize,
    gates: Vec<AbstractGate>,
}

impl AbstractCircuit {
    /// Create an empty circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Append a gate, checking that both qubits are in range and distinct.
    pub fn push(&mut self, gate: AbstractGate) -> IrResult<()> {
        check_pair(self.num_qubits, gate.qubit_a, gate.qubit_b)?;
        self.gates.push(gate);
        Ok(())
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[AbstractGate] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of gates acting on non-neighbouring qubits.
    pub fn long_range_count(&self) -> usize {
        self.gates.iter().filter(|g| g.span() > 1).count()
    }
}

/// An ordered list of nearest-neighbour gates ready for evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledCircuit {
    num_qubits: usize,
    gates: Vec<CompiledGate>,
}

impl CompiledCircuit {
    /// Create an empty circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Append a gate. Compiled gates must touch neighbouring qubits.
    pub fn push(&mut self, gate: CompiledGate) -> IrResult<()> {
        let [a, b] = gate.qubits();
        check_pair(self.num_qubits, a, b)?;
        if a.abs_diff(b) != 1 {
            return Err(IrError::NotAdjacent(a, b));
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[CompiledGate] {
        &self.gates
    }

    /// Total number of operations.
    pub fn depth(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of SWAP operations.
    pub fn swap_count(&self) -> usize {
        self.gates.iter().filter(|g| g.is_swap()).count()
    }

    /// Number of entangling operations.
    pub fn entangle_count(&self) -> usize {
        self.depth() - self.swap_count()
    }
}

fn check_pair(num_qubits: usize, a: usize, b: usize) -> IrResult<()> {
    for q in [a, b] {
        if q >= num_qubits {
            return Err(IrError::QubitOutOfRange {
                qubit: q,
                num_qubits,
            });
        }
    }
    if a == b {
        return Err(IrError::DuplicateQubit(a));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unitary::Unitary2x2;

    #[test]
    fn test_compiled_rejects_long_range() {
        let mut c = CompiledCircuit::new(4);
        assert!(matches!(
            c.push(CompiledGate::Swap(0, 2)),
            Err(IrError::NotAdjacent(0, 2))
        ));
        c.push(CompiledGate::Swap(1, 2)).unwrap();
        assert_eq!(c.swap_count(), 1);
        assert_eq!(c.entangle_count(), 0);
    }

    #[test]
    fn test_abstract_counts_long_range() {
        let id = Unitary2x2::identity();
        let mut c = AbstractCircuit::new(4);
        c.push(AbstractGate::entangle(0, 3, id, id)).unwrap();
        c.push(AbstractGate::entangle(2, 1, id, id)).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.long_range_count(), 1);
        assert!(c.push(AbstractGate::entangle(0, 4, id, id)).is_err());
    }
}
