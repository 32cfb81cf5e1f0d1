//! Error types for the synthesis crate.

use thiserror::Error;

/// Errors produced by unitary synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// The target matrix does not have dimension `2^num_qubits`.
    #[error("Target of shape {rows}x{cols} does not act on {num_qubits} qubits")]
    DimensionMismatch {
        /// Number of rows of the target.
        rows: usize,
        /// Number of columns of the target.
        cols: usize,
        /// The requested qubit count.
        num_qubits: u32,
    },

    /// The target is not unitary.
    #[error("Target is not unitary (max deviation {deviation:.3e})")]
    NotUnitary {
        /// Largest entry-wise deviation of `U·U†` from the identity.
        deviation: f64,
    },

    /// The synthesizer only handles diagonal targets.
    #[error("Target has an off-diagonal entry of magnitude {magnitude:.3e} at ({row}, {col})")]
    NotDiagonal {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// Its magnitude.
        magnitude: f64,
    },

    /// The coupling map does not cover the qubits or a required pair.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Invalid synthesizer configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qgibbs_ir::IrError),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
