//! The operator algebra interface.
//!
//! Operators act on `n` qubits. Tensor products put the left operand on the
//! most significant qubits: in `a.tensor(&b)` the qubits of `b` are numbered
//! `0..b.num_qubits()` and those of `a` follow. Matrix basis index bit `k` is
//! the value of qubit `k`.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::OpsResult;
use crate::pauli::PauliOp;

/// A linear operator on a register of qubits.
///
/// Implemented by [`DenseOperator`](crate::DenseOperator) (explicit matrices)
/// and [`PauliSum`](crate::PauliSum) (symbolic sums of Pauli strings).
pub trait Operator: Clone + std::fmt::Debug + Sized {
    /// Number of qubits the operator acts on.
    fn num_qubits(&self) -> u32;

    /// The identity on `num_qubits` qubits. Zero qubits gives the scalar 1.
    fn identity(num_qubits: u32) -> Self;

    /// A single-qubit Pauli operator.
    fn pauli(op: PauliOp) -> Self;

    /// Tensor product `self ⊗ other`.
    fn tensor(&self, other: &Self) -> Self;

    /// Operator product `self · other` (apply `other` first).
    fn compose(&self, other: &Self) -> OpsResult<Self>;

    /// Sum `self + other`.
    fn add(&self, other: &Self) -> OpsResult<Self>;

    /// Scalar multiple.
    fn scale(&self, factor: Complex64) -> Self;

    /// Conjugate transpose.
    fn adjoint(&self) -> Self;

    /// The exponential `exp(-i·self)`.
    fn exp_i(&self) -> OpsResult<Self>;

    /// Explicit matrix representation.
    fn to_matrix(&self) -> Array2<Complex64>;

    // -------------------------------------------------------------------------
    // Provided operations
    // -------------------------------------------------------------------------

    /// Difference `self - other`.
    fn sub(&self, other: &Self) -> OpsResult<Self> {
        self.add(&other.scale(Complex64::new(-1.0, 0.0)))
    }

    /// Real scalar multiple.
    fn scale_real(&self, factor: f64) -> Self {
        self.scale(Complex64::new(factor, 0.0))
    }

    /// The single-qubit projector onto `|value⟩`: `(I+Z)/2` or `(I-Z)/2`.
    fn projector(value: bool) -> OpsResult<Self> {
        let sign = if value { -1.0 } else { 1.0 };
        Ok(Self::identity(1)
            .add(&Self::pauli(PauliOp::Z).scale_real(sign))?
            .scale_real(0.5))
    }

    /// `self` composed with itself `exponent` times; exponent 0 is the identity.
    fn repeat_compose(&self, exponent: u32) -> OpsResult<Self> {
        let mut result = Self::identity(self.num_qubits());
        for _ in 0..exponent {
            result = self.compose(&result)?;
        }
        Ok(result)
    }
}
