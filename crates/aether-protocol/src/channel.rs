//! Lossy quantum channels and single-qubit measurement.

use rand::Rng;

use aether_ir::{Statevector, Unitary2x2};

use crate::error::{ProtocolError, ProtocolResult, check_probability};
use crate::source::Basis;

/// Pass a photon through a channel that drops it with probability `loss`.
///
/// A photon that is already lost stays lost and consumes no randomness.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidProbability`] if `loss` is outside
/// `[0, 1]`.
pub fn apply_loss<R: Rng + ?Sized>(
    state: Option<Statevector>,
    loss: f64,
    rng: &mut R,
) -> ProtocolResult<Option<Statevector>> {
    check_probability("channel loss", loss)?;
    let Some(state) = state else {
        return Ok(None);
    };
    if rng.r#gen::<f64>() < loss {
        return Ok(None);
    }
    Ok(Some(state))
}

/// Projectively measure a single qubit in `basis`.
///
/// # Errors
///
/// Returns [`ProtocolError::NotSingleQubit`] for wider states.
pub fn measure<R: Rng + ?Sized>(
    state: &Statevector,
    basis: Basis,
    rng: &mut R,
) -> ProtocolResult<u8> {
    if state.num_qubits() != 1 {
        return Err(ProtocolError::NotSingleQubit(state.num_qubits()));
    }
    let rotated = match basis {
        Basis::Z => state.clone(),
        Basis::X => state.apply(&Unitary2x2::h().to_operator())?,
    };
    let p0 = rotated.probabilities()[0];
    Ok(if rng.r#gen::<f64>() < p0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::prepare_state;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_loss_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        let psi = prepare_state(0, Basis::Z).unwrap();
        assert!(apply_loss(Some(psi.clone()), 0.0, &mut rng).unwrap().is_some());
        assert!(apply_loss(Some(psi), 1.0, &mut rng).unwrap().is_none());
        assert!(apply_loss(None, 0.0, &mut rng).unwrap().is_none());
    }

    #[test]
    fn test_invalid_loss() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            apply_loss(None, -0.1, &mut rng),
            Err(ProtocolError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_matched_basis_measurement_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(11);
        for bit in 0..=1 {
            for basis in [Basis::Z, Basis::X] {
                let psi = prepare_state(bit, basis).unwrap();
                for _ in 0..20 {
                    assert_eq!(measure(&psi, basis, &mut rng).unwrap(), bit);
                }
            }
        }
    }

    #[test]
    fn test_mismatched_basis_is_random() {
        let mut rng = StdRng::seed_from_u64(12);
        let psi = prepare_state(0, Basis::X).unwrap();
        let ones: u32 = (0..2000)
            .map(|_| u32::from(measure(&psi, Basis::Z, &mut rng).unwrap()))
            .sum();
        assert!((800..1200).contains(&ones));
    }

    #[test]
    fn test_measure_rejects_wide_state() {
        let mut rng = StdRng::seed_from_u64(0);
        let psi = Statevector::zero(2).unwrap();
        assert!(matches!(
            measure(&psi, Basis::Z, &mut rng),
            Err(ProtocolError::NotSingleQubit(2))
        ));
    }
}
