//! Backend errors.

use qgibbs_ir::QubitId;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The circuit is wider than the backend.
    #[error("{backend} supports {limit} qubits, the circuit needs {needed}")]
    TooManyQubits {
        backend: String,
        needed: usize,
        limit: u32,
    },

    #[error("shot count {shots} is outside 1..={max}")]
    Shots { shots: u32, max: u32 },

    /// The backend only runs standard gates.
    #[error("dense unitary '{0}' must be transpiled before submission")]
    DenseUnitary(String),

    /// Validation failed; the reasons are joined with `"; "`.
    #[error("circuit rejected: {0}")]
    Rejected(String),

    /// Sampling from one final state needs every measurement to be terminal.
    #[error("'{gate}' acts on {qubit} after it was measured")]
    GateAfterMeasure { gate: String, qubit: QubitId },

    /// An operand lies outside the simulated register.
    #[error("{qubit} is outside a {width}-qubit register")]
    QubitOutOfRange { qubit: QubitId, width: usize },

    /// The final distribution could not be sampled.
    #[error("cannot sample the final state: {0}")]
    Sampling(String),

    #[error(transparent)]
    Ir(#[from] qgibbs_ir::IrError),
}

pub type HalResult<T> = Result<T, HalError>;
