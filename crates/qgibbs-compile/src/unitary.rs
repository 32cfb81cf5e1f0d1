//! Single-qubit unitaries: products, Euler angles and resynthesis.

use std::f64::consts::PI;

use num_complex::Complex64;
use qgibbs_ir::{Matrix2, StandardGate};

use crate::target::BasisGates;

/// Angles and matrix entries below this are treated as zero.
pub(crate) const TOLERANCE: f64 = 1e-10;

const IDENTITY: Matrix2 = [
    [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
    [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
];

/// `a · b`.
pub fn matmul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    std::array::from_fn(|r| std::array::from_fn(|c| a[r][0] * b[0][c] + a[r][1] * b[1][c]))
}

/// The unitary of `gates` applied left to right; `None` if one of them is
/// not a single-qubit gate.
pub fn product<'a>(gates: impl IntoIterator<Item = &'a StandardGate>) -> Option<Matrix2> {
    gates
        .into_iter()
        .try_fold(IDENTITY, |acc, gate| Some(matmul(&gate.matrix()?, &acc)))
}

/// `φ` such that `target ≈ e^{iφ} · u`.
pub fn relative_phase(u: &Matrix2, target: &Matrix2) -> f64 {
    u.iter()
        .flatten()
        .zip(target.iter().flatten())
        .map(|(x, y)| x.conj() * y)
        .sum::<Complex64>()
        .arg()
}

/// Wrap into `(-π, π]`; non-finite input maps to zero.
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped > PI { wrapped - 2.0 * PI } else { wrapped }
}

/// `u = e^{i·phase} · Rz(alpha) · Ry(beta) · Rz(gamma)` with `beta ∈ [0, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Euler {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub phase: f64,
}

impl Euler {
    /// Decompose a 2x2 unitary.
    pub fn zyz(u: &Matrix2) -> Self {
        let det = u[0][0] * u[1][1] - u[0][1] * u[1][0];
        let phase = det.arg() / 2.0;
        // In SU(2): top-left = cos(β/2)·e^{-i(α+γ)/2}, bottom-left = sin(β/2)·e^{i(α-γ)/2}.
        let unphase = Complex64::from_polar(1.0, -phase);
        let (diag, lower) = (u[1][1] * unphase, u[1][0] * unphase);

        let beta = 2.0 * lower.norm().atan2(diag.norm());
        let sum = if diag.norm() > TOLERANCE { 2.0 * diag.arg() } else { 0.0 };
        let diff = if lower.norm() > TOLERANCE { 2.0 * lower.arg() } else { 0.0 };
        Self {
            alpha: (sum + diff) / 2.0,
            beta,
            gamma: (sum - diff) / 2.0,
            phase,
        }
    }
}

/// Gate family single-qubit runs are rewritten into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OneQubitBasis {
    /// `rz`, `ry`.
    #[default]
    ZYZ,
    /// `rz`, `sx`.
    ZSX,
}

impl OneQubitBasis {
    /// The family `basis` can express, preferring `rz`/`sx`.
    pub fn for_basis(basis: &BasisGates) -> Option<Self> {
        if !basis.contains("rz") {
            None
        } else if basis.contains("sx") {
            Some(Self::ZSX)
        } else if basis.contains("ry") {
            Some(Self::ZYZ)
        } else {
            None
        }
    }

    /// Gates, left to right, equal to `u` up to the returned global phase.
    pub fn resynthesize(self, u: &Matrix2) -> (Vec<StandardGate>, f64) {
        let Euler {
            alpha, beta, gamma, ..
        } = Euler::zyz(u);
        let mut gates = Vec::with_capacity(5);
        let rz = |gates: &mut Vec<StandardGate>, angle: f64| {
            let angle = wrap_angle(angle);
            if angle.abs() > TOLERANCE {
                gates.push(StandardGate::Rz(angle));
            }
        };

        if beta.abs() <= TOLERANCE {
            rz(&mut gates, alpha + gamma);
        } else {
            match self {
                Self::ZYZ => {
                    rz(&mut gates, gamma);
                    gates.push(StandardGate::Ry(beta));
                    rz(&mut gates, alpha);
                }
                // Ry(β) ∝ Rz(π)·SX·Rz(β+π)·SX
                Self::ZSX => {
                    rz(&mut gates, gamma);
                    gates.push(StandardGate::SX);
                    rz(&mut gates, beta + PI);
                    gates.push(StandardGate::SX);
                    rz(&mut gates, alpha + PI);
                }
            }
        }

        let phase = product(&gates).map_or(0.0, |emitted| relative_phase(&emitted, u));
        (gates, phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_equivalent(target: &Matrix2, gates: &[StandardGate], phase: f64) {
        let got = product(gates).unwrap();
        let global = Complex64::from_polar(1.0, phase);
        for (t, g) in target.iter().flatten().zip(got.iter().flatten()) {
            assert!((t - g * global).norm() < 1e-9, "{target:?} vs {got:?}");
        }
    }

    #[test]
    fn test_product_order() {
        // S then H is H·S, which differs from S·H.
        let hs = product(&[StandardGate::S, StandardGate::H]).unwrap();
        let expected = matmul(
            &StandardGate::H.matrix().unwrap(),
            &StandardGate::S.matrix().unwrap(),
        );
        assert_equivalent(&expected, &[StandardGate::S, StandardGate::H], 0.0);
        assert_eq!(hs, expected);
        assert!(product(&[StandardGate::CX]).is_none());
    }

    #[test]
    fn test_zyz_of_hadamard() {
        let h = StandardGate::H.matrix().unwrap();
        let e = Euler::zyz(&h);
        assert!((e.beta - PI / 2.0).abs() < 1e-12);
        let gates = [StandardGate::Rz(e.gamma), StandardGate::Ry(e.beta), StandardGate::Rz(e.alpha)];
        assert_equivalent(&h, &gates, e.phase);
    }

    #[test]
    fn test_zsx_emits_only_rz_and_sx() {
        for gate in [
            StandardGate::H,
            StandardGate::Y,
            StandardGate::SXdg,
            StandardGate::Rx(0.3),
            StandardGate::Ry(PI),
            StandardGate::P(2.0),
        ] {
            let target = gate.matrix().unwrap();
            let (gates, phase) = OneQubitBasis::ZSX.resynthesize(&target);
            assert!(gates.iter().all(|g| matches!(g, StandardGate::Rz(_) | StandardGate::SX)));
            assert_equivalent(&target, &gates, phase);
        }
    }

    #[test]
    fn test_diagonal_is_one_rz_and_identity_is_empty() {
        let target = product(&[StandardGate::P(0.9), StandardGate::Rz(0.4)]).unwrap();
        let (gates, phase) = OneQubitBasis::ZSX.resynthesize(&target);
        assert_eq!(gates.len(), 1);
        assert_equivalent(&target, &gates, phase);

        assert!(OneQubitBasis::ZYZ.resynthesize(&IDENTITY).0.is_empty());
    }

    #[test]
    fn test_basis_choice() {
        let zyz = BasisGates::from_names(["rz", "ry"]).unwrap();
        let none = BasisGates::from_names(["cx", "h"]).unwrap();
        assert_eq!(OneQubitBasis::for_basis(&BasisGates::ibm()), Some(OneQubitBasis::ZSX));
        assert_eq!(OneQubitBasis::for_basis(&zyz), Some(OneQubitBasis::ZYZ));
        assert_eq!(OneQubitBasis::for_basis(&none), None);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-12);
        assert_eq!(wrap_angle(f64::INFINITY), 0.0);
    }

    proptest! {
        #[test]
        fn prop_resynthesis_is_exact(
            a in -PI..PI,
            b in 0.0..PI,
            c in -PI..PI,
            zsx in any::<bool>(),
        ) {
            let target = product(&[StandardGate::Rz(c), StandardGate::Rx(b), StandardGate::P(a)]).unwrap();
            let basis = if zsx { OneQubitBasis::ZSX } else { OneQubitBasis::ZYZ };
            let (gates, phase) = basis.resynthesize(&target);
            prop_assert!(gates.len() <= 5);
            assert_equivalent(&target, &gates, phase);
        }
    }
}
