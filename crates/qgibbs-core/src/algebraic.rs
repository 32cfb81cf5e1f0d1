//! Operator-level consistency checks of the factorization.
//!
//! These build the same factor unitaries as the circuit assembler but
//! multiply them as matrices, so the identity
//! `exp(-βH) = Π Re(U_j)` (top-left block) can be checked without
//! sampling. Full weights `w = θ - lnZ/|C|` are used throughout.

use qgibbs_ops::expm::{max_abs_diff, spectral_norm};
use qgibbs_ops::{DenseOperator, Operator, PauliOp};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::encoding::embed_sqrt;
use crate::error::{GibbsError, GibbsResult};
use crate::model::{CliqueModel, CliqueStructure};
use crate::power::factor_unitary;
use crate::reference::ExactReference;
use crate::rus::clique_block;

#[allow(clippy::cast_precision_loss)]
fn full_weight(theta: f64, ln_z: f64, num_cliques: usize) -> f64 {
    theta - ln_z / num_cliques as f64
}

fn factor_unitaries<O: Operator>(
    model: &CliqueModel<O>,
    beta: f64,
    ln_z: f64,
) -> GibbsResult<Vec<Vec<O>>> {
    let num_cliques = model.structure().num_cliques();
    model
        .factors()
        .iter()
        .map(|factors| {
            factors
                .iter()
                .map(|f| {
                    factor_unitary(&f.indicator, beta, full_weight(f.weight, ln_z, num_cliques))
                })
                .collect()
        })
        .collect()
}

/// `Π (U + U†)/2` over every factor in enumeration order.
pub fn real_algebraic_product<O: Operator>(
    model: &CliqueModel<O>,
    beta: f64,
    ln_z: f64,
) -> GibbsResult<O> {
    let mut result = O::identity(model.hamiltonian().num_qubits() + 1);
    for u in factor_unitaries(model, beta, ln_z)?.iter().flatten() {
        let real = u.add(&u.adjoint())?.scale_real(0.5);
        result = real.compose(&result)?;
    }
    Ok(result)
}

/// `Π U` over every factor, without taking real parts.
pub fn unreal_product<O: Operator>(model: &CliqueModel<O>, beta: f64, ln_z: f64) -> GibbsResult<O> {
    let mut result = O::identity(model.hamiltonian().num_qubits() + 1);
    for u in factor_unitaries(model, beta, ln_z)?.iter().flatten() {
        result = u.compose(&result)?;
    }
    Ok(result)
}

/// Combine consecutive pairs into `|0⟩⟨0|⊗M0 + |1⟩⟨1|⊗M1`.
pub fn merge<O: Operator>(operators: &[O]) -> GibbsResult<Vec<O>> {
    if operators.len() % 2 != 0 {
        return Err(GibbsError::NotPowerOfTwo {
            what: "number of merged operators",
            count: operators.len(),
        });
    }
    let p0 = O::projector(false)?;
    let p1 = O::projector(true)?;
    operators
        .chunks_exact(2)
        .map(|pair| Ok(p0.tensor(&pair[0]).add(&p1.tensor(&pair[1]))?))
        .collect()
}

/// Merge repeatedly until one block-diagonal operator remains.
pub fn merge_all<O: Operator>(operators: &[O]) -> GibbsResult<O> {
    if !operators.len().is_power_of_two() {
        return Err(GibbsError::NotPowerOfTwo {
            what: "number of merged operators",
            count: operators.len(),
        });
    }
    let mut level = operators.to_vec();
    while level.len() > 1 {
        level = merge(&level)?;
    }
    level
        .pop()
        .ok_or_else(|| GibbsError::Numerical("merge produced no operator".into()))
}

/// `(H⊗I) · diag(M, M†) · (H⊗I)` for `M` the merge of every factor
/// unitary, so that `Re(U_k)` sits in the `k`-th diagonal block.
///
/// Needs a power-of-two number of cliques of equal size.
pub fn blocked_operator<O: Operator>(
    model: &CliqueModel<O>,
    beta: f64,
    ln_z: f64,
) -> GibbsResult<O> {
    let structure = model.structure();
    let size = structure.cliques()[0].len();
    if structure.cliques().iter().any(|c| c.len() != size) {
        return Err(GibbsError::MalformedCliques(
            "blocked factorization needs cliques of equal size".into(),
        ));
    }
    if !structure.num_cliques().is_power_of_two() {
        return Err(GibbsError::NotPowerOfTwo {
            what: "number of cliques",
            count: structure.num_cliques(),
        });
    }

    let per_clique = factor_unitaries(model, beta, ln_z)?
        .iter()
        .map(|unitaries| merge_all(unitaries))
        .collect::<GibbsResult<Vec<_>>>()?;
    let merged = merge_all(&per_clique)?;
    let lifted = O::projector(false)?
        .tensor(&merged)
        .add(&O::projector(true)?.tensor(&merged.adjoint()))?;

    let hadamard = O::pauli(PauliOp::X)
        .add(&O::pauli(PauliOp::Z))?
        .scale_real(std::f64::consts::FRAC_1_SQRT_2)
        .tensor(&O::identity(merged.num_qubits()));
    Ok(hadamard.compose(&lifted)?.compose(&hadamard.adjoint())?)
}

/// Product of the first `count` diagonal blocks of width `block` in
/// ascending order, later blocks applied last.
pub fn diagonal_block_product(
    operator: &DenseOperator,
    count: usize,
    block: usize,
) -> GibbsResult<DenseOperator> {
    let mut result = DenseOperator::from_matrix(ndarray::Array2::eye(block))?;
    for k in 0..count {
        let b = operator.block(k * block, k * block, block)?;
        result = b.compose(&result)?;
    }
    Ok(result)
}

/// Spectral-norm errors of each factorization against `exp(-βH)`.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Number of variables.
    pub n: usize,
    /// Number of factors.
    pub d: usize,
    /// `‖R0 - Π Re(U_j)‖₂` on the top-left block.
    pub real_algebraic: f64,
    /// `‖R0 - Π U_j‖₂` on the top-left block; expected to be large.
    pub unreal: f64,
    /// `‖R0 - (Π_C Re D_C)²‖₂` for the half-weight clique blocks the
    /// circuit uses.
    pub rus_blocks: f64,
    /// Error of the blocked factorization when its shape requirements hold.
    pub blocked: Option<f64>,
    /// Largest `|UU† - I|` entry of the square-root encoding of `Q`.
    pub sqrt_embedding_unitarity: f64,
}

/// Run every check with `lnZ = 0`.
#[instrument(skip(weights))]
pub fn diagnose(structure: &CliqueStructure, weights: &[f64], beta: f64) -> GibbsResult<Diagnostics> {
    let model = CliqueModel::<DenseOperator>::build(structure, weights)?;
    let reference = ExactReference::compute(model.hamiltonian(), beta)?;
    let n = structure.num_variables();
    let data_qubits = model.hamiltonian().num_qubits();
    let r0 = &reference.matrix;

    let error = |op: &DenseOperator| -> GibbsResult<f64> {
        let block = op.top_left(data_qubits)?;
        Ok(spectral_norm(&(r0 - block.matrix())))
    };

    let real_algebraic = error(&real_algebraic_product(&model, beta, 0.0)?)?;
    let unreal = error(&unreal_product(&model, beta, 0.0)?)?;

    let mut amplitude = DenseOperator::identity(data_qubits);
    for (i, factors) in model.factors().iter().enumerate() {
        let d = clique_block(i, factors, n, beta, 0.0)?;
        let real = d.add(&d.adjoint())?.scale_real(0.5);
        amplitude = real.compose(&amplitude)?;
    }
    let rus_blocks = error(&amplitude.compose(&amplitude)?)?;

    let blocked = match blocked_operator(&model, beta, 0.0) {
        Ok(op) => {
            let product = diagonal_block_product(&op, structure.num_factors(), 2 << n)?;
            Some(error(&product)?)
        }
        Err(GibbsError::NotPowerOfTwo { .. } | GibbsError::MalformedCliques(_)) => None,
        Err(e) => return Err(e),
    };

    let q = DenseOperator::from_real_diagonal(&reference.distribution)?;
    let encoded = embed_sqrt(&q)?;
    let sqrt_embedding_unitarity = max_abs_diff(
        &encoded.compose(&encoded.adjoint())?.into_matrix(),
        &ndarray::Array2::eye(encoded.dim()),
    );

    let diagnostics = Diagnostics {
        n,
        d: structure.num_factors(),
        real_algebraic,
        unreal,
        rus_blocks,
        blocked,
        sqrt_embedding_unitarity,
    };
    debug!(?diagnostics, "algebraic checks finished");
    Ok(diagnostics)
}
