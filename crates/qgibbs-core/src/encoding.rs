//! Block encodings with one ancilla as the most significant qubit.

use ndarray::{Array2, s};
use num_complex::Complex64;
use qgibbs_ops::{DenseOperator, Operator, PauliOp};

use crate::error::{GibbsError, GibbsResult};

/// `X⊗(I-A) + Z⊗A`, unitary whenever `A` is a projector.
pub fn embed<O: Operator>(a: &O) -> GibbsResult<O> {
    let identity = O::identity(a.num_qubits());
    let x = O::pauli(PauliOp::X).tensor(&identity.sub(a)?);
    let z = O::pauli(PauliOp::Z).tensor(a);
    Ok(x.add(&z)?)
}

/// `|0⟩⟨0|⊗A + |1⟩⟨1|⊗A†`.
pub fn conjugate_blocks<O: Operator>(a: &O) -> GibbsResult<O> {
    let upper = O::projector(false)?.tensor(a);
    let lower = O::projector(true)?.tensor(&a.adjoint());
    Ok(upper.add(&lower)?)
}

/// The reflection encoding `[[M, S], [S, -M]]` with `S = sqrt(I - M²)`
/// taken entry-wise.
///
/// Unitary for diagonal Hermitian `M` with spectrum in `[-1, 1]`.
pub fn embed_sqrt(m: &DenseOperator) -> GibbsResult<DenseOperator> {
    let dim = m.dim();
    let square = m.compose(m)?;
    let complement = DenseOperator::identity(m.num_qubits())
        .sub(&square)?
        .map_entries(Complex64::sqrt);
    if complement.matrix().iter().any(|z| !z.is_finite()) {
        return Err(GibbsError::Numerical(
            "square-root encoding produced a non-finite entry".into(),
        ));
    }

    let mut out = Array2::<Complex64>::zeros((2 * dim, 2 * dim));
    out.slice_mut(s![..dim, ..dim]).assign(m.matrix());
    out.slice_mut(s![..dim, dim..]).assign(complement.matrix());
    out.slice_mut(s![dim.., ..dim]).assign(complement.matrix());
    out.slice_mut(s![dim.., dim..]).assign(&m.matrix().mapv(|z| -z));
    Ok(DenseOperator::from_matrix(out)?)
}
