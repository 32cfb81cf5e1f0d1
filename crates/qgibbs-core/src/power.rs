//! The operator power `(Rz·U)²` that scales one factor's ancilla-0 block.
//!
//! For `U = embed(Φ)` the ancilla-0 block of `(Rz(-2φ)⊗I · U)²` is
//! `I + (cos 2φ - 1)·Φ` plus an imaginary part that the Hadamard test on
//! the lifted operator removes. Choosing `cos 2φ = e^{βw}` gives
//! `exp(βw·Φ)` on the real part. The adjoint of the leading `U` is dropped
//! because `embed(Φ)` is real symmetric, and only `phi1` is used since the
//! solver guarantees `phi1 ≈ phi2`.

use qgibbs_ops::{Operator, PauliOp};

use crate::encoding::embed;
use crate::error::GibbsResult;
use crate::phase::{PhaseFactors, gen_phase_factors};

/// `(RZ1·U)²` with `RZ1 = exp(i·phi1·Z) ⊗ I`, the ancilla on the most
/// significant qubit of `u`.
pub fn power<O: Operator>(u: &O, phases: &PhaseFactors) -> GibbsResult<O> {
    let data = u.num_qubits().saturating_sub(1);
    let rz1 = O::pauli(PauliOp::Z)
        .scale_real(-phases.phi1)
        .exp_i()?
        .tensor(&O::identity(data));
    Ok(rz1.compose(u)?.repeat_compose(2)?)
}

/// The unitary of one factor with indicator `phi` and shifted weight `w`.
pub fn factor_unitary<O: Operator>(phi: &O, beta: f64, w: f64) -> GibbsResult<O> {
    let phases = gen_phase_factors((beta * w).exp())?;
    power(&embed(phi)?, &phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::indicator;
    use qgibbs_ops::{DenseOperator, PauliSum};

    #[test]
    fn test_real_part_of_ancilla_block_is_exponential() {
        let (beta, w): (f64, f64) = (1.0, -0.7);
        let phi: DenseOperator = indicator(2, &[0], &[true]).unwrap();
        let u = factor_unitary(&phi, beta, w).unwrap();
        assert!(u.is_unitary(1e-12));

        let block = u.top_left(2).unwrap();
        let expected = [1.0, 1.0, (beta * w).exp(), (beta * w).exp()];
        for (z, e) in block.diagonal().iter().zip(expected) {
            assert!((z.re - e).abs() < 1e-12, "{z} vs {e}");
            assert!((z.norm() - 1.0).abs() < 1e-12);
        }
        assert!(block.is_diagonal(1e-12));
    }

    #[test]
    fn test_power_matches_on_both_backends() {
        let phases = gen_phase_factors(0.25).unwrap();
        let dense = power(
            &embed(&indicator::<DenseOperator>(1, &[0], &[false]).unwrap()).unwrap(),
            &phases,
        )
        .unwrap();
        let symbolic = power(
            &embed(&indicator::<PauliSum>(1, &[0], &[false]).unwrap()).unwrap(),
            &phases,
        )
        .unwrap();
        let diff = qgibbs_ops::expm::max_abs_diff(dense.matrix(), &symbolic.to_matrix());
        assert!(diff < 1e-12);
    }

    #[test]
    fn test_positive_weight_is_out_of_domain() {
        let phi: DenseOperator = indicator(1, &[0], &[true]).unwrap();
        assert!(factor_unitary(&phi, 1.0, 0.1).is_err());
        assert!(factor_unitary(&phi, 1.0, 0.0).is_err());
    }
}
