//! Classical post-processing costs for a sifted key.
//!
//! Error correction is assumed perfect; only its disclosure cost is
//! tracked. Privacy amplification then removes everything Eve may know.

use crate::entropy::binary_entropy;

/// Bits disclosed while reconciling `sifted_length` bits at error rate
/// `qber` with efficiency `efficiency`: `ceil(n · h(q) · f)`.
pub fn error_correction_cost(sifted_length: usize, qber: f64, efficiency: f64) -> u64 {
    let cost = sifted_length as f64 * binary_entropy(qber) * efficiency;
    cost.max(0.0).ceil() as u64
}

/// Length of the final secret key after privacy amplification:
/// `floor(max(0, n − n·h(q) − n·h(leak) − ec_cost))`.
pub fn privacy_amplified_length(
    sifted_length: usize,
    qber: f64,
    source_leakage: f64,
    ec_cost: u64,
) -> u64 {
    let n = sifted_length as f64;
    let remaining =
        n - n * binary_entropy(qber) - n * binary_entropy(source_leakage) - ec_cost as f64;
    remaining.max(0.0).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_free_key_is_kept() {
        assert_eq!(error_correction_cost(1000, 0.0, 1.1), 0);
        assert_eq!(privacy_amplified_length(1000, 0.0, 0.0, 0), 1000);
    }

    #[test]
    fn test_costs_reduce_length() {
        let ec = error_correction_cost(1000, 0.05, 1.1);
        // h(0.05) = 0.28640, * 1.1 * 1000 = 315.04
        assert_eq!(ec, 316);
        let pa = privacy_amplified_length(1000, 0.05, 0.0, ec);
        assert_eq!(pa, 397);
    }

    #[test]
    fn test_never_negative() {
        assert_eq!(privacy_amplified_length(100, 0.5, 0.5, 1000), 0);
    }
}
