//! qgibbs circuit intermediate representation
//!
//! Synthesizers emit [`Circuit`]s, the compiler rewrites their
//! [`CircuitDag`], and the simulator executes them. Wires are plain indices
//! ([`QubitId`], [`ClbitId`]); a gate is either a [`StandardGate`] or a dense
//! [`CustomGate`].
//!
//! # Example
//!
//! ```rust
//! use qgibbs_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("hadamard_test", 2, 2);
//! let (data, anc) = (QubitId(0), QubitId(1));
//!
//! circuit.h(data).unwrap();
//! circuit.barrier_all().unwrap();
//! circuit.h(anc).unwrap().cz(anc, data).unwrap().h(anc).unwrap();
//! circuit.measure(anc, ClbitId(1)).unwrap();
//! circuit.measure(data, ClbitId(0)).unwrap();
//!
//! assert_eq!(circuit.size(), 7);
//! assert_eq!(circuit.depth(), 5); // the barrier is not a layer
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H`, `S`, `Sdg` | 1 | Clifford gates |
//! | `SX`, `SXdg` | 1 | sqrt(X) and its inverse |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX`, `CZ` | 2 | Controlled-X and Controlled-Z |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, Matrix2, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId, Wire};
