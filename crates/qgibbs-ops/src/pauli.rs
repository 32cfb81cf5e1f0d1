//! Symbolic operators as sums of weighted Pauli strings.
//!
//! A [`PauliSum`] is
//!
//!   A = Σ_k  c_k · P_k
//!
//! where each `P_k` is a tensor product of single-qubit Pauli operators and
//! `c_k ∈ ℂ`. Products, tensor products and adjoints stay exact. The
//! exponential is exact whenever all terms commute, which covers the diagonal
//! Hamiltonians and single-axis rotations this workspace builds.
//!
//! # Example
//!
//! ```rust
//! use qgibbs_ops::{Operator, PauliOp, PauliSum};
//!
//! // (I - Z)/2 selects |1⟩ and is idempotent
//! let p1 = PauliSum::projector(true).unwrap();
//! assert_eq!(p1.compose(&p1).unwrap(), p1);
//! assert_eq!(p1.n_terms(), 2);
//! ```

use std::collections::BTreeMap;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};
use crate::operator::Operator;

/// Coefficients below this magnitude are dropped after every operation.
const COEFF_EPS: f64 = 1e-14;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// Product `self · other` as `(phase, op)`.
    pub fn product(self, other: PauliOp) -> (Complex64, PauliOp) {
        use PauliOp::{I, X, Y, Z};
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        match (self, other) {
            (I, p) | (p, I) => (one, p),
            (X, X) | (Y, Y) | (Z, Z) => (one, I),
            (X, Y) => (i, Z),
            (Y, Z) => (i, X),
            (Z, X) => (i, Y),
            (Y, X) => (-i, Z),
            (Z, Y) => (-i, X),
            (X, Z) => (-i, Y),
        }
    }

    /// Action on a computational basis bit: `P|bit⟩ = phase·|bit'⟩`.
    #[inline]
    fn act(self, bit: bool) -> (Complex64, bool) {
        match self {
            PauliOp::I => (Complex64::new(1.0, 0.0), bit),
            PauliOp::X => (Complex64::new(1.0, 0.0), !bit),
            PauliOp::Y if bit => (Complex64::new(0.0, -1.0), false),
            PauliOp::Y => (Complex64::new(0.0, 1.0), true),
            PauliOp::Z if bit => (Complex64::new(-1.0, 0.0), true),
            PauliOp::Z => (Complex64::new(1.0, 0.0), false),
        }
    }
}

/// A tensor product of Pauli operators on indexed qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with identity factors
/// omitted. Qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PauliString {
    /// Non-identity terms, sorted by qubit index ascending.
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Construct a PauliString from an iterator of (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by qubit.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// The identity string.
    pub fn identity() -> Self {
        Self { ops: vec![] }
    }

    /// Return the non-identity (qubit, op) pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// True if the string is a product of Z and I only.
    pub fn is_diagonal(&self) -> bool {
        self.ops.iter().all(|(_, op)| *op == PauliOp::Z)
    }

    /// The Pauli acting on `qubit`.
    pub fn op_on(&self, qubit: u32) -> PauliOp {
        self.ops
            .binary_search_by_key(&qubit, |(q, _)| *q)
            .map_or(PauliOp::I, |i| self.ops[i].1)
    }

    /// Product `self · other` as `(phase, string)`.
    pub fn product(&self, other: &PauliString) -> (Complex64, PauliString) {
        let mut phase = Complex64::new(1.0, 0.0);
        let mut ops = Vec::with_capacity(self.ops.len() + other.ops.len());
        let (mut a, mut b) = (self.ops.iter().peekable(), other.ops.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(&&(qa, pa)), Some(&&(qb, pb))) if qa == qb => {
                    let (p, op) = pa.product(pb);
                    phase *= p;
                    if op != PauliOp::I {
                        ops.push((qa, op));
                    }
                    a.next();
                    b.next();
                }
                (Some(&&(qa, pa)), Some(&&(qb, _))) if qa < qb => {
                    ops.push((qa, pa));
                    a.next();
                }
                (_, Some(&&(qb, pb))) => {
                    ops.push((qb, pb));
                    b.next();
                }
                (Some(&&(qa, pa)), None) => {
                    ops.push((qa, pa));
                    a.next();
                }
                (None, None) => break,
            }
        }
        (phase, PauliString { ops })
    }

    /// True if the two strings commute.
    pub fn commutes_with(&self, other: &PauliString) -> bool {
        let anticommuting = self
            .ops
            .iter()
            .filter(|(q, op)| {
                let theirs = other.op_on(*q);
                theirs != PauliOp::I && theirs != *op
            })
            .count();
        anticommuting % 2 == 0
    }

    /// Shift every qubit index up by `offset`.
    fn shifted(&self, offset: u32) -> PauliString {
        PauliString {
            ops: self.ops.iter().map(|&(q, op)| (q + offset, op)).collect(),
        }
    }

    /// Image of basis state `index`: `P|index⟩ = phase·|index'⟩`.
    pub fn apply_to_basis(&self, index: usize) -> (Complex64, usize) {
        let mut phase = Complex64::new(1.0, 0.0);
        let mut out = index;
        for &(q, op) in &self.ops {
            let mask = 1usize << q;
            let (p, bit) = op.act(index & mask != 0);
            phase *= p;
            if bit {
                out |= mask;
            } else {
                out &= !mask;
            }
        }
        (phase, out)
    }
}

/// A complex-weighted sum of Pauli strings on a fixed number of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliSum {
    num_qubits: u32,
    terms: BTreeMap<PauliString, Complex64>,
}

impl PauliSum {
    /// The zero operator on `num_qubits` qubits.
    pub fn zero(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            terms: BTreeMap::new(),
        }
    }

    /// Build from `(coefficient, string)` terms; like terms are merged.
    pub fn from_terms(
        num_qubits: u32,
        terms: impl IntoIterator<Item = (Complex64, PauliString)>,
    ) -> OpsResult<Self> {
        let mut sum = Self::zero(num_qubits);
        for (coeff, pauli) in terms {
            if let Some(&(q, _)) = pauli.ops().last() {
                if q >= num_qubits {
                    return Err(OpsError::Unsupported(format!(
                        "Pauli string acts on qubit {q} of a {num_qubits}-qubit operator"
                    )));
                }
            }
            sum.accumulate(pauli, coeff);
        }
        sum.prune();
        Ok(sum)
    }

    /// Number of non-zero terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Iterate over `(string, coefficient)` pairs in a fixed order.
    pub fn terms(&self) -> impl Iterator<Item = (&PauliString, &Complex64)> {
        self.terms.iter()
    }

    /// True if every term is a product of Z and I.
    pub fn is_diagonal(&self) -> bool {
        self.terms.keys().all(PauliString::is_diagonal)
    }

    fn accumulate(&mut self, pauli: PauliString, coeff: Complex64) {
        *self.terms.entry(pauli).or_insert(Complex64::new(0.0, 0.0)) += coeff;
    }

    fn prune(&mut self) {
        self.terms.retain(|_, c| c.norm() > COEFF_EPS);
    }

    fn check_width(&self, other: &Self, op: &'static str) -> OpsResult<()> {
        if self.num_qubits != other.num_qubits {
            return Err(OpsError::QubitCountMismatch {
                op,
                left: self.num_qubits,
                right: other.num_qubits,
            });
        }
        Ok(())
    }
}

impl Operator for PauliSum {
    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn identity(num_qubits: u32) -> Self {
        let mut sum = Self::zero(num_qubits);
        sum.accumulate(PauliString::identity(), Complex64::new(1.0, 0.0));
        sum
    }

    fn pauli(op: PauliOp) -> Self {
        let mut sum = Self::zero(1);
        sum.accumulate(PauliString::from_ops([(0, op)]), Complex64::new(1.0, 0.0));
        sum
    }

    fn tensor(&self, other: &Self) -> Self {
        let mut sum = Self::zero(self.num_qubits + other.num_qubits);
        for (pa, ca) in &self.terms {
            let high = pa.shifted(other.num_qubits);
            for (pb, cb) in &other.terms {
                let ops = pb.ops().iter().chain(high.ops()).copied();
                sum.accumulate(PauliString::from_ops(ops), ca * cb);
            }
        }
        sum.prune();
        sum
    }

    fn compose(&self, other: &Self) -> OpsResult<Self> {
        self.check_width(other, "compose")?;
        let mut sum = Self::zero(self.num_qubits);
        for (pa, ca) in &self.terms {
            for (pb, cb) in &other.terms {
                let (phase, pauli) = pa.product(pb);
                sum.accumulate(pauli, ca * cb * phase);
            }
        }
        sum.prune();
        Ok(sum)
    }

    fn add(&self, other: &Self) -> OpsResult<Self> {
        self.check_width(other, "add")?;
        let mut sum = self.clone();
        for (pauli, coeff) in &other.terms {
            sum.accumulate(pauli.clone(), *coeff);
        }
        sum.prune();
        Ok(sum)
    }

    fn scale(&self, factor: Complex64) -> Self {
        let mut sum = self.clone();
        for coeff in sum.terms.values_mut() {
            *coeff *= factor;
        }
        sum.prune();
        sum
    }

    fn adjoint(&self) -> Self {
        let mut sum = self.clone();
        for coeff in sum.terms.values_mut() {
            *coeff = coeff.conj();
        }
        sum
    }

    /// Exact when all terms commute: `exp(-i·Σ c_k P_k) = Π (cos c_k·I − i·sin c_k·P_k)`.
    fn exp_i(&self) -> OpsResult<Self> {
        let strings: Vec<_> = self.terms.keys().collect();
        for (k, a) in strings.iter().enumerate() {
            if strings[k + 1..].iter().any(|b| !a.commutes_with(b)) {
                return Err(OpsError::Unsupported(
                    "exp_i of a Pauli sum with non-commuting terms".into(),
                ));
            }
        }

        let minus_i = Complex64::new(0.0, -1.0);
        let mut result = Self::identity(self.num_qubits);
        for (pauli, coeff) in &self.terms {
            let mut factor = Self::zero(self.num_qubits);
            if pauli.is_identity() {
                factor.accumulate(pauli.clone(), (minus_i * coeff).exp());
            } else {
                factor.accumulate(PauliString::identity(), coeff.cos());
                factor.accumulate(pauli.clone(), minus_i * coeff.sin());
            }
            result = factor.compose(&result)?;
        }
        Ok(result)
    }

    fn to_matrix(&self) -> Array2<Complex64> {
        let dim = 1usize << self.num_qubits;
        let mut matrix = Array2::<Complex64>::zeros((dim, dim));
        for (pauli, coeff) in &self.terms {
            for col in 0..dim {
                let (phase, row) = pauli.apply_to_basis(col);
                matrix[[row, col]] += coeff * phase;
            }
        }
        matrix
    }
}
