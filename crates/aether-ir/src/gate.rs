//! Abstract and compiled gate records.
//!
//! An [`AbstractGate`] names an entangling interaction between two logical
//! qubits that may be arbitrarily far apart. A [`CompiledGate`] is the
//! hardware-level form: every operation touches two neighbouring qubits on
//! the linear chain.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::Operator;
use crate::unitary::Unitary2x2;

/// The kind of an abstract two-qubit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Rotations on both qubits followed by a CNOT (first qubit controls).
    Entangle,
    /// Exchange of two qubits.
    Swap,
}

/// An entangling gate between two logical qubits.
///
/// Immutable after generation. `rotation_a` acts on `qubit_a` and
/// `rotation_b` on `qubit_b` before the CNOT; for [`GateKind::Swap`] the
/// rotations are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbstractGate {
    /// Gate kind.
    pub kind: GateKind,
    /// Control qubit.
    pub qubit_a: usize,
    /// Target qubit.
    pub qubit_b: usize,
    /// Rotation applied to the control qubit.
    pub rotation_a: Unitary2x2,
    /// Rotation applied to the target qubit.
    pub rotation_b: Unitary2x2,
}

impl AbstractGate {
    /// Create an entangling gate.
    pub fn entangle(
        qubit_a: usize,
        qubit_b: usize,
        rotation_a: Unitary2x2,
        rotation_b: Unitary2x2,
    ) -> Self {
        Self {
            kind: GateKind::Entangle,
            qubit_a,
            qubit_b,
            rotation_a,
            rotation_b,
        }
    }

    /// Create a SWAP.
    pub fn swap(qubit_a: usize, qubit_b: usize) -> Self {
        Self {
            kind: GateKind::Swap,
            qubit_a,
            qubit_b,
            rotation_a: Unitary2x2::identity(),
            rotation_b: Unitary2x2::identity(),
        }
    }

    /// Distance between the two qubits on a linear chain.
    pub fn span(&self) -> usize {
        self.qubit_a.abs_diff(self.qubit_b)
    }

    /// Dense 4x4 matrix of this gate, ordered `(qubit_a, qubit_b)`.
    pub fn matrix(&self) -> Operator {
        match self.kind {
            GateKind::Entangle => entangle_primitive(&self.rotation_a, &self.rotation_b),
            GateKind::Swap => swap_matrix(),
        }
    }
}

/// A hardware-level operation on two neighbouring qubits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CompiledGate {
    /// Exchange neighbouring qubits.
    Swap(usize, usize),
    /// Entangling primitive with its control on `control`.
    Entangle {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
        /// Rotation applied to the control qubit.
        rotation_a: Unitary2x2,
        /// Rotation applied to the target qubit.
        rotation_b: Unitary2x2,
    },
}

impl CompiledGate {
    /// The two qubits this gate touches, in matrix order.
    pub fn qubits(&self) -> [usize; 2] {
        match *self {
            Self::Swap(a, b) => [a, b],
            Self::Entangle {
                control, target, ..
            } => [control, target],
        }
    }

    /// Dense 4x4 matrix of this gate, ordered as [`qubits`](Self::qubits).
    pub fn matrix(&self) -> Operator {
        match self {
            Self::Swap(..) => swap_matrix(),
            Self::Entangle {
                rotation_a,
                rotation_b,
                ..
            } => entangle_primitive(rotation_a, rotation_b),
        }
    }

    /// Returns `true` for SWAP operations.
    pub fn is_swap(&self) -> bool {
        matches!(self, Self::Swap(..))
    }
}

impl fmt::Display for CompiledGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swap(a, b) => write!(f, "swap q[{a}], q[{b}]"),
            Self::Entangle {
                control, target, ..
            } => write!(f, "entangle q[{control}], q[{target}]"),
        }
    }
}

/// Tensor (Kronecker) product `a ⊗ b`.
pub fn kron(a: &Operator, b: &Operator) -> Operator {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    let mut out = Operator::zeros((ar * br, ac * bc));
    for ((i, j), &av) in a.indexed_iter() {
        if av == Complex64::new(0.0, 0.0) {
            continue;
        }
        for ((k, l), &bv) in b.indexed_iter() {
            out[(i * br + k, j * bc + l)] = av * bv;
        }
    }
    out
}

/// Conjugate transpose of a dense operator.
pub fn adjoint(op: &Operator) -> Operator {
    op.t().mapv(|c| c.conj())
}

/// Identity operator of dimension `dim`.
pub fn identity(dim: usize) -> Operator {
    Operator::eye(dim)
}

/// CNOT with the first (most significant) qubit as control.
pub fn cnot_matrix() -> Operator {
    let one = Complex64::new(1.0, 0.0);
    let mut m = Operator::zeros((4, 4));
    m[(0, 0)] = one;
    m[(1, 1)] = one;
    m[(2, 3)] = one;
    m[(3, 2)] = one;
    m
}

/// SWAP of two qubits.
pub fn swap_matrix() -> Operator {
    let one = Complex64::new(1.0, 0.0);
    let mut m = Operator::zeros((4, 4));
    m[(0, 0)] = one;
    m[(1, 2)] = one;
    m[(2, 1)] = one;
    m[(3, 3)] = one;
    m
}

/// The locking primitive `CNOT · (Ra ⊗ Rb)`.
pub fn entangle_primitive(rotation_a: &Unitary2x2, rotation_b: &Unitary2x2) -> Operator {
    cnot_matrix().dot(&kron(&rotation_a.to_operator(), &rotation_b.to_operator()))
}

/// Returns `true` if `op† · op` is the identity within `tol`.
pub fn is_unitary(op: &Operator, tol: f64) -> bool {
    let (rows, cols) = op.dim();
    if rows != cols {
        return false;
    }
    let product = adjoint(op).dot(op);
    product
        .indexed_iter()
        .all(|((i, j), v)| {
            let expected = if i == j { 1.0 } else { 0.0 };
            (v - Complex64::new(expected, 0.0)).norm() < tol
        })
}
