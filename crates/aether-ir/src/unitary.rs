//! 2x2 unitary matrices for single-qubit rotations.
//!
//! The locking transform is built from pairs of single-qubit rotations
//! feeding an entangling primitive. Rotations are stored compactly as a
//! [`Unitary2x2`] and only expanded into dense [`Operator`]s when they are
//! embedded into a register.

use std::f64::consts::PI;

use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Operator;

/// Tolerance for floating point comparisons.
const EPSILON: f64 = 1e-10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 matrix from its elements.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::new(
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
        )
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Self::new(
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(-s, 0.0),
        )
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Y matrix.
    pub fn y() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Z matrix.
    pub fn z() -> Self {
        Self::new(
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(-1.0, 0.0),
        )
    }

    /// Pauli matrix by index: 0 = I, 1 = X, 2 = Y, 3 = Z.
    ///
    /// Indices above 3 wrap modulo 4.
    pub fn pauli(index: usize) -> Self {
        match index % 4 {
            0 => Self::identity(),
            1 => Self::x(),
            2 => Self::y(),
            _ => Self::z(),
        }
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        let exp_neg = Complex64::from_polar(1.0, -theta / 2.0);
        let exp_pos = Complex64::from_polar(1.0, theta / 2.0);
        Self::new(
            exp_neg,
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            exp_pos,
        )
    }

    /// ZYZ Euler rotation `Rz(phi) · Ry(theta) · Rz(lambda)`.
    pub fn zyz(phi: f64, theta: f64, lambda: f64) -> Self {
        Self::rz(phi).mul(&Self::ry(theta)).mul(&Self::rz(lambda))
    }

    /// Draw a Haar-distributed single-qubit rotation.
    ///
    /// `phi` and `lambda` are uniform on `[0, 2π)`; `theta = arccos(u)` with
    /// `u` uniform on `[-1, 1)`, which gives the Haar measure on SU(2).
    pub fn haar_random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let phi = rng.gen_range(0.0..2.0 * PI);
        let theta = rng.gen_range(-1.0_f64..1.0).acos();
        let lambda = rng.gen_range(0.0..2.0 * PI);
        Self::zyz(phi, theta, lambda)
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Check whether `U · U†` equals the identity within tolerance.
    pub fn is_unitary(&self) -> bool {
        self.mul(&self.adjoint()).approx_eq(&Self::identity())
    }

    /// Element-wise comparison within tolerance.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).norm() < EPSILON)
    }

    /// Expand into a dense 2x2 [`Operator`].
    pub fn to_operator(&self) -> Operator {
        let [a, b, c, d] = self.data;
        ndarray::arr2(&[[a, b], [c, d]])
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_paulis_are_unitary_and_self_inverse() {
        for idx in 0..4 {
            let p = Unitary2x2::pauli(idx);
            assert!(p.is_unitary());
            assert!(p.mul(&p).approx_eq(&Unitary2x2::identity()));
        }
    }

    #[test]
    fn test_zyz_zero_angles_is_identity() {
        assert!(Unitary2x2::zyz(0.0, 0.0, 0.0).approx_eq(&Unitary2x2::identity()));
    }

    #[test]
    fn test_ry_pi_maps_zero_to_one() {
        let ry = Unitary2x2::ry(PI);
        // Column 0 is the image of |0>.
        assert!(ry.data[0].norm() < EPSILON);
        assert!((ry.data[2].norm() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_haar_random_is_unitary_and_seeded() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let u = Unitary2x2::haar_random(&mut a);
            let v = Unitary2x2::haar_random(&mut b);
            assert!(u.is_unitary());
            assert_eq!(u, v);
        }
    }

    #[test]
    fn test_adjoint_inverts() {
        let mut rng = StdRng::seed_from_u64(3);
        let u = Unitary2x2::haar_random(&mut rng);
        assert!(u.mul(&u.adjoint()).approx_eq(&Unitary2x2::identity()));
    }
}
