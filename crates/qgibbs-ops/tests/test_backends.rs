//! Cross-checks between the dense and the symbolic operator backends.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use qgibbs_ops::expm::max_abs_diff;
use qgibbs_ops::{DenseOperator, Operator, PauliOp, PauliSum};

fn pauli_op(k: u8) -> PauliOp {
    match k % 4 {
        0 => PauliOp::I,
        1 => PauliOp::X,
        2 => PauliOp::Y,
        _ => PauliOp::Z,
    }
}

/// Build the same two-qubit operator on both backends:
/// `a·(P0 ⊗ P1) + b·(P2 ⊗ P3)`.
fn build<O: Operator>(ops: [u8; 4], a: f64, b: f64) -> O {
    let first = O::pauli(pauli_op(ops[0]))
        .tensor(&O::pauli(pauli_op(ops[1])))
        .scale_real(a);
    let second = O::pauli(pauli_op(ops[2]))
        .tensor(&O::pauli(pauli_op(ops[3])))
        .scale_real(b);
    first.add(&second).unwrap()
}

// ---------------------------------------------------------------------------
// Algebra agrees between backends
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_compose_agrees(
        x in prop::array::uniform4(0u8..4),
        y in prop::array::uniform4(0u8..4),
        a in -2.0f64..2.0,
        b in -2.0f64..2.0,
    ) {
        let dense = build::<DenseOperator>(x, a, b)
            .compose(&build::<DenseOperator>(y, b, a))
            .unwrap();
        let symbolic = build::<PauliSum>(x, a, b)
            .compose(&build::<PauliSum>(y, b, a))
            .unwrap();
        prop_assert!(max_abs_diff(&dense.to_matrix(), &symbolic.to_matrix()) < 1e-12);
    }

    #[test]
    fn prop_adjoint_agrees(x in prop::array::uniform4(0u8..4), a in -2.0f64..2.0) {
        let i = Complex64::new(0.0, 1.0);
        let dense = build::<DenseOperator>(x, a, 1.0).scale(i).adjoint();
        let symbolic = build::<PauliSum>(x, a, 1.0).scale(i).adjoint();
        prop_assert!(max_abs_diff(&dense.to_matrix(), &symbolic.to_matrix()) < 1e-12);
    }
}

// ---------------------------------------------------------------------------
// Exponentials
// ---------------------------------------------------------------------------

#[test]
fn test_exp_i_of_diagonal_hamiltonian_agrees() {
    // H = 0.7·Z⊗I + 1.3·Z⊗Z − 0.4·I⊗Z, all terms commute
    let build = |zi: f64, zz: f64, iz: f64| -> (DenseOperator, PauliSum) {
        let mk = |a: PauliOp, b: PauliOp, c: f64| {
            (
                DenseOperator::pauli(a).tensor(&DenseOperator::pauli(b)).scale_real(c),
                PauliSum::pauli(a).tensor(&PauliSum::pauli(b)).scale_real(c),
            )
        };
        let (d1, s1) = mk(PauliOp::Z, PauliOp::I, zi);
        let (d2, s2) = mk(PauliOp::Z, PauliOp::Z, zz);
        let (d3, s3) = mk(PauliOp::I, PauliOp::Z, iz);
        (
            d1.add(&d2).unwrap().add(&d3).unwrap(),
            s1.add(&s2).unwrap().add(&s3).unwrap(),
        )
    };
    let (dense, symbolic) = build(0.7, 1.3, -0.4);
    assert!(symbolic.is_diagonal());

    let ed = dense.exp_i().unwrap();
    let es = symbolic.exp_i().unwrap();
    assert!(max_abs_diff(&ed.to_matrix(), &es.to_matrix()) < 1e-12);
    assert!(ed.is_unitary(1e-12));
}

#[test]
fn test_repeat_compose_and_identity() {
    let x = PauliSum::pauli(PauliOp::X);
    assert_eq!(x.repeat_compose(2).unwrap(), PauliSum::identity(1));
    assert_eq!(x.repeat_compose(0).unwrap(), PauliSum::identity(1));

    let h = DenseOperator::pauli(PauliOp::X)
        .add(&DenseOperator::pauli(PauliOp::Z))
        .unwrap()
        .scale_real(std::f64::consts::FRAC_1_SQRT_2);
    let hh = h.repeat_compose(2).unwrap();
    assert!(max_abs_diff(hh.matrix(), &Array2::eye(2)) < 1e-15);
}
