//! Property-based tests for the entropy and finite-key bounds.

use aether_analysis::{
    FiniteKeyParams, binary_entropy, chernoff_hoeffding_bound, secure_key_rate,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn entropy_is_symmetric(p in 0.0_f64..=1.0) {
        prop_assert!((binary_entropy(p) - binary_entropy(1.0 - p)).abs() < 1e-12);
    }

    #[test]
    fn entropy_is_bounded(p in -1.0_f64..2.0) {
        let h = binary_entropy(p);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&h));
    }

    #[test]
    fn bound_never_below_observed(errors in 0_usize..1000, extra in 1_usize..100_000) {
        let samples = errors + extra;
        let b = chernoff_hoeffding_bound(errors, samples, 1e-9);
        prop_assert!(b >= errors as f64 / samples as f64);
        prop_assert!(b <= 1.0);
    }

    #[test]
    fn bound_non_increasing_in_samples(rate in 0.0_f64..0.5, n in 10_usize..50_000) {
        // Same observed rate, more samples: the bound can only tighten.
        let e1 = (rate * n as f64).floor() as usize;
        let e2 = e1 * 2;
        let b1 = chernoff_hoeffding_bound(e1, n, 1e-9);
        let b2 = chernoff_hoeffding_bound(e2, 2 * n, 1e-9);
        prop_assert!(b2 <= b1 + 1e-15);
    }

    #[test]
    fn rate_is_non_negative_and_bounded(
        sifted in 0_usize..100_000,
        err_frac in 0.0_f64..0.5,
        total_extra in 0_usize..100_000,
        leak in 0.0_f64..=1.0,
    ) {
        let errors = (sifted as f64 * err_frac) as usize;
        let total = sifted + total_extra;
        let r = secure_key_rate(sifted, errors, total, leak, &FiniteKeyParams::default()).unwrap();
        prop_assert!(r.secure_key_rate >= 0.0);
        prop_assert!(r.secure_key_rate <= 1.0);
    }

    #[test]
    fn rate_non_increasing_in_leakage(l1 in 0.0_f64..0.5, dl in 0.0_f64..0.5) {
        let p = FiniteKeyParams::default();
        let a = secure_key_rate(40_000, 200, 100_000, l1, &p).unwrap();
        let b = secure_key_rate(40_000, 200, 100_000, l1 + dl, &p).unwrap();
        prop_assert!(b.secure_key_rate <= a.secure_key_rate + 1e-15);
    }
}

#[test]
fn bound_is_one_without_samples() {
    assert_eq!(chernoff_hoeffding_bound(0, 0, 1e-9), 1.0);
    assert_eq!(chernoff_hoeffding_bound(0, 0, 0.5), 1.0);
}

#[test]
fn bound_monotone_for_fixed_errors() {
    let mut last = 1.0;
    for n in [1, 10, 100, 1_000, 10_000, 100_000] {
        let b = chernoff_hoeffding_bound(0, n, 1e-9);
        assert!(b <= last);
        last = b;
    }
}
