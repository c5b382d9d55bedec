//! Binary Shannon entropy.

/// `h(p) = −p·log2(p) − (1−p)·log2(1−p)`, with `h(p) = 0` for `p ≤ 0` or
/// `p ≥ 1`.
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 || p.is_nan() {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}
