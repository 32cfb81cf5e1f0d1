//! Error types for the operator algebra.

use thiserror::Error;

/// Errors produced by operator algebra.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpsError {
    /// Two operators of different widths were combined.
    #[error("Cannot {op} a {left}-qubit operator with a {right}-qubit operator")]
    QubitCountMismatch {
        /// The operation that was attempted.
        op: &'static str,
        /// Width of the left operand.
        left: u32,
        /// Width of the right operand.
        right: u32,
    },

    /// A matrix is not square with a power-of-two dimension.
    #[error("Matrix of shape {rows}x{cols} is not a square power-of-two operator")]
    InvalidShape {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// A requested block lies outside the matrix.
    #[error("Block of size {size} at ({row}, {col}) exceeds dimension {dim}")]
    BlockOutOfRange {
        /// Row offset.
        row: usize,
        /// Column offset.
        col: usize,
        /// Block size.
        size: usize,
        /// Matrix dimension.
        dim: usize,
    },

    /// The backend cannot represent the result exactly.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A numerical routine produced non-finite values.
    #[error("Numerical failure: {0}")]
    Numerical(String),
}

/// Result type for operator algebra.
pub type OpsResult<T> = Result<T, OpsError>;
