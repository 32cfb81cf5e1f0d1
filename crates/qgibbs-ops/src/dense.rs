//! Dense matrix backend.

use ndarray::{Array1, Array2, s};
use num_complex::Complex64;

use crate::error::{OpsError, OpsResult};
use crate::expm::{dagger, expm, is_unitary};
use crate::operator::Operator;
use crate::pauli::PauliOp;

/// An operator stored as an explicit `2^n × 2^n` complex matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseOperator {
    matrix: Array2<Complex64>,
    num_qubits: u32,
}

impl DenseOperator {
    /// Wrap a square matrix whose dimension is a power of two.
    pub fn from_matrix(matrix: Array2<Complex64>) -> OpsResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || !rows.is_power_of_two() {
            return Err(OpsError::InvalidShape { rows, cols });
        }
        Ok(Self {
            num_qubits: rows.trailing_zeros(),
            matrix,
        })
    }

    /// A diagonal operator with the given real entries.
    pub fn from_real_diagonal(diagonal: &[f64]) -> OpsResult<Self> {
        let dim = diagonal.len();
        let mut matrix = Array2::<Complex64>::zeros((dim, dim));
        for (i, &d) in diagonal.iter().enumerate() {
            matrix[[i, i]] = Complex64::new(d, 0.0);
        }
        Self::from_matrix(matrix)
    }

    /// Borrow the matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Consume into the matrix.
    pub fn into_matrix(self) -> Array2<Complex64> {
        self.matrix
    }

    /// Dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// The main diagonal.
    pub fn diagonal(&self) -> Array1<Complex64> {
        self.matrix.diag().to_owned()
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> Complex64 {
        self.matrix.diag().sum()
    }

    /// The square block of `size` rows and columns starting at `(row, col)`.
    pub fn block(&self, row: usize, col: usize, size: usize) -> OpsResult<Self> {
        let dim = self.dim();
        if row + size > dim || col + size > dim {
            return Err(OpsError::BlockOutOfRange {
                row,
                col,
                size,
                dim,
            });
        }
        Self::from_matrix(
            self.matrix
                .slice(s![row..row + size, col..col + size])
                .to_owned(),
        )
    }

    /// The top-left block acting on the lowest `num_qubits` qubits with
    /// every higher qubit in `|0⟩`.
    pub fn top_left(&self, num_qubits: u32) -> OpsResult<Self> {
        self.block(0, 0, 1usize << num_qubits)
    }

    /// Apply `f` to every entry.
    #[must_use]
    pub fn map_entries(&self, f: impl Fn(Complex64) -> Complex64) -> Self {
        Self {
            matrix: self.matrix.mapv(f),
            num_qubits: self.num_qubits,
        }
    }

    /// True if every off-diagonal entry is below `tol` in magnitude.
    pub fn is_diagonal(&self, tol: f64) -> bool {
        self.matrix
            .indexed_iter()
            .all(|((r, c), z)| r == c || z.norm() <= tol)
    }

    /// True if the operator is unitary within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        is_unitary(&self.matrix, tol)
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

impl Operator for DenseOperator {
    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn identity(num_qubits: u32) -> Self {
        Self {
            matrix: Array2::eye(1usize << num_qubits),
            num_qubits,
        }
    }

    fn pauli(op: PauliOp) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let entries = match op {
            PauliOp::I => [one, zero, zero, one],
            PauliOp::X => [zero, one, one, zero],
            PauliOp::Y => [zero, -i, i, zero],
            PauliOp::Z => [one, zero, zero, -one],
        };
        Self {
            matrix: Array2::from_shape_fn((2, 2), |(r, c)| entries[2 * r + c]),
            num_qubits: 1,
        }
    }

    fn tensor(&self, other: &Self) -> Self {
        Self {
            matrix: ndarray::linalg::kron(&self.matrix, &other.matrix),
            num_qubits: self.num_qubits + other.num_qubits,
        }
    }

    fn compose(&self, other: &Self) -> OpsResult<Self> {
        self.check_width(other, "compose")?;
        Ok(Self {
            matrix: self.matrix.dot(&other.matrix),
            num_qubits: self.num_qubits,
        })
    }

    fn add(&self, other: &Self) -> OpsResult<Self> {
        self.check_width(other, "add")?;
        Ok(Self {
            matrix: &self.matrix + &other.matrix,
            num_qubits: self.num_qubits,
        })
    }

    fn scale(&self, factor: Complex64) -> Self {
        self.map_entries(|z| z * factor)
    }

    fn adjoint(&self) -> Self {
        Self {
            matrix: dagger(&self.matrix),
            num_qubits: self.num_qubits,
        }
    }

    fn exp_i(&self) -> OpsResult<Self> {
        let minus_i = Complex64::new(0.0, -1.0);
        Ok(Self {
            matrix: expm(&self.matrix.mapv(|z| z * minus_i))?,
            num_qubits: self.num_qubits,
        })
    }

    fn to_matrix(&self) -> Array2<Complex64> {
        self.matrix.clone()
    }
}
