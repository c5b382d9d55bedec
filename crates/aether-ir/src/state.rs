//! Dense state vectors.

use ndarray::Array1;
use num_complex::Complex64;

use crate::Operator;
use crate::embed::MAX_REGISTER_QUBITS;
use crate::error::{IrError, IrResult};
use crate::unitary::Unitary2x2;

/// Norm tolerance accepted by [`Statevector::from_amplitudes`].
const NORM_TOLERANCE: f64 = 1e-8;

/// A pure state of `n` qubits: `2^n` complex amplitudes with unit norm.
///
/// Evolution never mutates a state in place; [`apply`](Self::apply) returns
/// a new vector, so a prepared state can be kept for a later fidelity check.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    amplitudes: Array1<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create the all-zero basis state |0...0⟩.
    pub fn zero(num_qubits: usize) -> IrResult<Self> {
        Self::basis(num_qubits, 0)
    }

    /// Create a computational basis state.
    pub fn basis(num_qubits: usize, index: usize) -> IrResult<Self> {
        if num_qubits > MAX_REGISTER_QUBITS {
            return Err(IrError::RegisterTooLarge(num_qubits));
        }
        let dim = 1usize << num_qubits;
        if index >= dim {
            return Err(IrError::QubitOutOfRange {
                qubit: index,
                num_qubits,
            });
        }
        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap raw amplitudes.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::InvalidStateLength`] if the length is not a
    /// non-zero power of two or the vector is not normalised.
    pub fn from_amplitudes(amplitudes: Array1<Complex64>) -> IrResult<Self> {
        let len = amplitudes.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(IrError::InvalidStateLength(len));
        }
        let num_qubits = len.trailing_zeros() as usize;
        if num_qubits > MAX_REGISTER_QUBITS {
            return Err(IrError::RegisterTooLarge(num_qubits));
        }
        let state = Self {
            amplitudes,
            num_qubits,
        };
        if (state.norm() - 1.0).abs() > NORM_TOLERANCE {
            return Err(IrError::InvalidStateLength(len));
        }
        Ok(state)
    }

    /// Single-qubit state `U|0⟩`.
    pub fn from_rotation(rotation: &Unitary2x2) -> Self {
        let [a, _, c, _] = rotation.data;
        Self {
            amplitudes: Array1::from(vec![a, c]),
            num_qubits: 1,
        }
    }

    /// Tensor product `self ⊗ other`; `self` provides the leading qubits.
    pub fn tensor(&self, other: &Self) -> IrResult<Self> {
        let num_qubits = self.num_qubits + other.num_qubits;
        if num_qubits > MAX_REGISTER_QUBITS {
            return Err(IrError::RegisterTooLarge(num_qubits));
        }
        let dim_b = other.amplitudes.len();
        let mut amplitudes = Array1::zeros(self.amplitudes.len() * dim_b);
        for (i, &a) in self.amplitudes.iter().enumerate() {
            for (j, &b) in other.amplitudes.iter().enumerate() {
                amplitudes[i * dim_b + j] = a * b;
            }
        }
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Tensor product of a sequence of states, first state as qubit 0.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::InvalidStateLength`] for an empty slice.
    pub fn tensor_product(states: &[Self]) -> IrResult<Self> {
        let (first, rest) = states
            .split_first()
            .ok_or(IrError::InvalidStateLength(0))?;
        rest.iter().try_fold(first.clone(), |acc, s| acc.tensor(s))
    }

    /// Apply a dense operator, returning the evolved state.
    pub fn apply(&self, op: &Operator) -> IrResult<Self> {
        let (rows, cols) = op.dim();
        let dim = self.amplitudes.len();
        if rows != dim || cols != dim {
            return Err(IrError::DimensionMismatch {
                operator: rows,
                state: dim,
            });
        }
        Ok(Self {
            amplitudes: op.dot(&self.amplitudes),
            num_qubits: self.num_qubits,
        })
    }

    /// Inner product `⟨self|other⟩`.
    pub fn inner(&self, other: &Self) -> IrResult<Complex64> {
        if self.amplitudes.len() != other.amplitudes.len() {
            return Err(IrError::DimensionMismatch {
                operator: self.amplitudes.len(),
                state: other.amplitudes.len(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Fidelity `|⟨self|other⟩|²` between two pure states.
    pub fn fidelity(&self, other: &Self) -> IrResult<f64> {
        Ok(self.inner(other)?.norm_sqr())
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt()
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitudes.
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Probability of each computational basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::embed_gate;
    use crate::gate::cnot_matrix;

    #[test]
    fn test_tensor_order() {
        let one = Statevector::from_rotation(&Unitary2x2::x());
        let zero = Statevector::from_rotation(&Unitary2x2::identity());
        let s = Statevector::tensor_product(&[one, zero.clone(), zero]).unwrap();
        assert_eq!(s.num_qubits(), 3);
        assert_eq!(s.probabilities()[0b100], 1.0);
    }

    #[test]
    fn test_apply_cnot() {
        let s = Statevector::basis(2, 0b10).unwrap();
        let out = s.apply(&embed_gate(2, &cnot_matrix(), &[0, 1]).unwrap()).unwrap();
        assert_eq!(out, Statevector::basis(2, 0b11).unwrap());
        // Original is untouched.
        assert_eq!(s, Statevector::basis(2, 0b10).unwrap());
    }

    #[test]
    fn test_fidelity() {
        let plus = Statevector::from_rotation(&Unitary2x2::h());
        let zero = Statevector::zero(1).unwrap();
        assert!((plus.fidelity(&zero).unwrap() - 0.5).abs() < 1e-12);
        assert!((plus.fidelity(&plus).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let s = Statevector::zero(1).unwrap();
        assert!(matches!(
            s.apply(&cnot_matrix()),
            Err(IrError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_amplitudes_rejects_bad_length() {
        let amps = Array1::from(vec![Complex64::new(1.0, 0.0); 3]);
        assert!(Statevector::from_amplitudes(amps).is_err());
    }
}
