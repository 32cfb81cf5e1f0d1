//! IR errors.

use thiserror::Error;

use crate::qubit::{ClbitId, QubitId};

/// Rejected circuit constructions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An instruction names a qubit the circuit does not have.
    #[error("'{instruction}' acts on {qubit}, which is not in the circuit")]
    UnknownQubit {
        /// Offending instruction.
        instruction: String,
        /// The missing qubit.
        qubit: QubitId,
    },

    /// An instruction names a classical bit the circuit does not have.
    #[error("'{instruction}' writes {clbit}, which is not in the circuit")]
    UnknownClbit {
        /// Offending instruction.
        instruction: String,
        /// The missing bit.
        clbit: ClbitId,
    },

    /// A gate got the wrong number of operands.
    #[error("'{instruction}' takes {expected} qubits, got {got}")]
    Arity {
        /// Offending instruction.
        instruction: String,
        /// Operand count of the gate.
        expected: usize,
        /// Operands supplied.
        got: usize,
    },

    /// The same qubit appears twice among the operands.
    #[error("'{instruction}' uses {qubit} twice")]
    RepeatedQubit {
        /// Offending instruction.
        instruction: String,
        /// The repeated qubit.
        qubit: QubitId,
    },

    /// A measurement must pair one qubit with one bit.
    #[error("a measurement takes one qubit and one bit, got {qubits} and {clbits}")]
    MalformedMeasure {
        /// Qubits supplied.
        qubits: usize,
        /// Bits supplied.
        clbits: usize,
    },

    /// A custom gate matrix is not `dim × dim`.
    #[error("gate '{gate}' needs a {dim}x{dim} matrix, got {got} entries")]
    MatrixShape {
        /// Gate name.
        gate: String,
        /// Expected side length.
        dim: usize,
        /// Entries supplied.
        got: usize,
    },

    /// Composition onto a different number of qubits.
    #[error("cannot place a {width}-qubit circuit on {targets} qubits")]
    Width {
        /// Qubits of the composed circuit.
        width: usize,
        /// Target qubits supplied.
        targets: usize,
    },

    /// Composition of a circuit that measures.
    #[error("cannot compose '{0}', it contains measurements")]
    ComposeMeasured(String),

    /// The dependency graph is inconsistent.
    #[error("corrupt dependency graph: {0}")]
    Corrupt(String),
}

/// Result alias for IR operations.
pub type IrResult<T> = Result<T, IrError>;
