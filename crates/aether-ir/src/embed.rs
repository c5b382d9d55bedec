//! Embedding of 1- and 2-qubit gates into an n-qubit register.
//!
//! Qubit 0 is the most significant bit of a basis index, matching the
//! order of a tensor product `q0 ⊗ q1 ⊗ ... ⊗ q(n-1)`. Within a gate, the
//! first listed target is the most significant bit of the local index.
//!
//! The embedding works index by index: each basis state is split into the
//! bits owned by the gate and the untouched remainder, the gate column for
//! the owned bits is read, and every non-negligible output amplitude is
//! written back at the recombined index. This costs `O(2^n · 2^k)` instead
//! of the `O(8^n)` of a chain of Kronecker products.

use num_complex::Complex64;

use crate::Operator;
use crate::error::{IrError, IrResult};

/// Amplitudes at or below this magnitude are not written.
pub const AMPLITUDE_CUTOFF: f64 = 1e-9;

/// Largest supported gate arity.
pub const MAX_GATE_QUBITS: usize = 2;

/// Largest register that may be embedded densely.
pub const MAX_REGISTER_QUBITS: usize = 14;

/// Build the `2^n × 2^n` operator that applies `gate` to `targets` and the
/// identity to every other qubit.
///
/// `targets` need not be adjacent or ascending. If they are not ascending,
/// the gate is first conjugated by the permutation that sorts its local
/// basis bits, so the result is the same as applying `gate` with its first
/// row/column bit on `targets[0]`.
///
/// # Errors
///
/// - [`IrError::UnsupportedArity`] if `targets` is empty or longer than two.
/// - [`IrError::GateDimensionMismatch`] if `gate` is not `2^k × 2^k`.
/// - [`IrError::QubitOutOfRange`] / [`IrError::DuplicateQubit`] for bad targets.
pub fn embed_gate(num_qubits: usize, gate: &Operator, targets: &[usize]) -> IrResult<Operator> {
    validate_targets(num_qubits, gate, targets)?;

    let k = targets.len();
    let (local, sorted) = if targets.windows(2).all(|w| w[0] < w[1]) {
        (gate.clone(), targets.to_vec())
    } else {
        sort_gate_targets(gate, targets)
    };

    let dim = 1usize << num_qubits;
    let local_dim = 1usize << k;
    // Bit position of each target inside a global basis index.
    let shifts: Vec<usize> = sorted.iter().map(|&q| num_qubits - 1 - q).collect();
    let target_mask = shifts.iter().fold(0usize, |m, &s| m | (1 << s));

    let mut out = Operator::zeros((dim, dim));
    for i in 0..dim {
        let local_in = extract_bits(i, &shifts);
        let rest = i & !target_mask;
        for local_out in 0..local_dim {
            let amp = local[(local_out, local_in)];
            if amp.norm() > AMPLITUDE_CUTOFF {
                let j = rest | deposit_bits(local_out, &shifts);
                out[(j, i)] = amp;
            }
        }
    }
    Ok(out)
}

/// Embed a single-qubit gate.
pub fn embed_single(num_qubits: usize, gate: &Operator, qubit: usize) -> IrResult<Operator> {
    embed_gate(num_qubits, gate, &[qubit])
}

fn validate_targets(num_qubits: usize, gate: &Operator, targets: &[usize]) -> IrResult<()> {
    let k = targets.len();
    if k == 0 || k > MAX_GATE_QUBITS {
        return Err(IrError::UnsupportedArity(k));
    }
    if num_qubits > MAX_REGISTER_QUBITS {
        return Err(IrError::RegisterTooLarge(num_qubits));
    }
    let (rows, cols) = gate.dim();
    if rows != 1 << k || cols != 1 << k {
        return Err(IrError::GateDimensionMismatch {
            rows,
            cols,
            targets: k,
        });
    }
    for (idx, &q) in targets.iter().enumerate() {
        if q >= num_qubits {
            return Err(IrError::QubitOutOfRange {
                qubit: q,
                num_qubits,
            });
        }
        if targets[..idx].contains(&q) {
            return Err(IrError::DuplicateQubit(q));
        }
    }
    Ok(())
}

/// Re-express `gate` so that its local bits follow ascending target order.
///
/// Returns `P · G · Pᵀ` together with the sorted targets, where `P` maps a
/// local index in the caller's order onto the sorted order.
fn sort_gate_targets(gate: &Operator, targets: &[usize]) -> (Operator, Vec<usize>) {
    let k = targets.len();
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by_key(|&m| targets[m]);
    let sorted: Vec<usize> = order.iter().map(|&m| targets[m]).collect();

    let local_dim = 1usize << k;
    let mut perm = Operator::zeros((local_dim, local_dim));
    for x in 0..local_dim {
        let y = order.iter().enumerate().fold(0usize, |acc, (pos, &src)| {
            let bit = (x >> (k - 1 - src)) & 1;
            acc | (bit << (k - 1 - pos))
        });
        perm[(y, x)] = Complex64::new(1.0, 0.0);
    }
    let permuted = perm.dot(gate).dot(&perm.t());
    (permuted, sorted)
}

/// Gather the bits at `shifts` into a compact index, first shift as MSB.
#[inline]
fn extract_bits(index: usize, shifts: &[usize]) -> usize {
    shifts
        .iter()
        .fold(0usize, |acc, &s| (acc << 1) | ((index >> s) & 1))
}

/// Scatter a compact index back onto the bit positions in `shifts`.
#[inline]
fn deposit_bits(local: usize, shifts: &[usize]) -> usize {
    let k = shifts.len();
    shifts
        .iter()
        .enumerate()
        .fold(0usize, |acc, (m, &s)| acc | (((local >> (k - 1 - m)) & 1) << s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{cnot_matrix, identity, is_unitary, kron, swap_matrix};
    use crate::unitary::Unitary2x2;

    fn approx_eq(a: &Operator, b: &Operator) -> bool {
        a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-12)
    }

    #[test]
    fn test_single_qubit_matches_kron() {
        let x = Unitary2x2::x().to_operator();
        let embedded = embed_single(3, &x, 1).unwrap();
        let expected = kron(&kron(&identity(2), &x), &identity(2));
        assert!(approx_eq(&embedded, &expected));
    }

    #[test]
    fn test_adjacent_ascending_matches_kron() {
        let cx = cnot_matrix();
        let embedded = embed_gate(3, &cx, &[0, 1]).unwrap();
        let expected = kron(&cx, &identity(2));
        assert!(approx_eq(&embedded, &expected));
    }

    #[test]
    fn test_reversed_targets_flip_control() {
        // CNOT on [1, 0] has qubit 1 as control: |01> -> |11>.
        let embedded = embed_gate(2, &cnot_matrix(), &[1, 0]).unwrap();
        assert_eq!(embedded[(0b11, 0b01)], Complex64::new(1.0, 0.0));
        assert_eq!(embedded[(0b10, 0b10)], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_non_adjacent_swap() {
        // SWAP q0 and q2 of |100> gives |001>.
        let embedded = embed_gate(3, &swap_matrix(), &[0, 2]).unwrap();
        assert_eq!(embedded[(0b001, 0b100)], Complex64::new(1.0, 0.0));
        assert!(is_unitary(&embedded, 1e-12));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = embed_gate(3, &cnot_matrix(), &[0]).unwrap_err();
        assert!(matches!(err, IrError::GateDimensionMismatch { .. }));
    }

    #[test]
    fn test_out_of_range_and_duplicate() {
        assert!(matches!(
            embed_gate(2, &cnot_matrix(), &[0, 2]),
            Err(IrError::QubitOutOfRange { qubit: 2, .. })
        ));
        assert!(matches!(
            embed_gate(2, &cnot_matrix(), &[1, 1]),
            Err(IrError::DuplicateQubit(1))
        ));
    }

    #[test]
    fn test_bit_helpers_roundtrip() {
        let shifts = [3, 0];
        assert_eq!(extract_bits(0b1001, &shifts), 0b11);
        assert_eq!(deposit_bits(0b10, &shifts), 0b1000);
        assert_eq!(deposit_bits(0b01, &shifts), 0b0001);
    }
}
