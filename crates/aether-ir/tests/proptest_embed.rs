//! Property-based tests for gate embedding.
//!
//! Every embedding of a unitary gate must itself be unitary, and embedding
//! on reversed targets must agree with conjugating by SWAPs.

use aether_ir::gate::{entangle_primitive, is_unitary, swap_matrix};
use aether_ir::{Operator, Unitary2x2, embed_gate};
use proptest::prelude::*;

/// A ZYZ rotation from three angles.
fn arb_rotation() -> impl Strategy<Value = Unitary2x2> {
    (0.0..std::f64::consts::TAU, 0.0..std::f64::consts::PI, 0.0..std::f64::consts::TAU)
        .prop_map(|(phi, theta, lambda)| Unitary2x2::zyz(phi, theta, lambda))
}

/// A register width and two distinct target qubits in it.
fn arb_placement() -> impl Strategy<Value = (usize, usize, usize)> {
    (2_usize..=6).prop_flat_map(|n| {
        (Just(n), 0..n, 0..n).prop_filter("distinct targets", |(_, a, b)| a != b)
    })
}

fn approx_eq(a: &Operator, b: &Operator) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-9)
}

proptest! {
    #[test]
    fn embedded_entangler_is_unitary(
        (n, a, b) in arb_placement(),
        ra in arb_rotation(),
        rb in arb_rotation(),
    ) {
        let gate = entangle_primitive(&ra, &rb);
        let u = embed_gate(n, &gate, &[a, b]).unwrap();
        prop_assert!(is_unitary(&u, 1e-9));
    }

    #[test]
    fn embedded_rotation_is_unitary(n in 1_usize..=6, q in 0_usize..6, r in arb_rotation()) {
        prop_assume!(q < n);
        let u = embed_gate(n, &r.to_operator(), &[q]).unwrap();
        prop_assert!(is_unitary(&u, 1e-9));
    }

    #[test]
    fn reversed_targets_equal_swap_conjugation(
        (n, a, b) in arb_placement(),
        ra in arb_rotation(),
        rb in arb_rotation(),
    ) {
        let gate = entangle_primitive(&ra, &rb);
        let reversed = embed_gate(n, &gate, &[b, a]).unwrap();

        let swap = swap_matrix();
        let conjugated = swap.dot(&gate).dot(&swap);
        let expected = embed_gate(n, &conjugated, &[a, b]).unwrap();
        prop_assert!(approx_eq(&reversed, &expected));
    }
}
