//! `qgibbs-synth`: unitary synthesis.
//!
//! Turns a dense unitary into a gate-level [`qgibbs_ir::Circuit`] behind the
//! [`UnitarySynthesizer`] trait:
//!
//! - [`DiagonalSynthesizer`]: exact, for diagonal unitaries (Walsh–Hadamard
//!   decomposition into CNOT-ladder Z rotations)
//! - [`VariationalSynthesizer`]: approximate, fits a [`CnotNetwork`] with
//!   [`Adam`] against the cost `1 − |Tr(U†V)|²/d²`
//! - [`OpaqueSynthesizer`]: wraps the matrix as a single custom gate
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::Array2;
//! use num_complex::Complex64;
//! use qgibbs_compile::CouplingMap;
//! use qgibbs_synth::{DiagonalSynthesizer, UnitarySynthesizer};
//!
//! // CZ = diag(1, 1, 1, -1)
//! let mut cz = Array2::<Complex64>::eye(4);
//! cz[[3, 3]] = Complex64::new(-1.0, 0.0);
//!
//! let synthesis = DiagonalSynthesizer::new()
//!     .synthesize(&cz, 2, &CouplingMap::full(2))
//!     .unwrap();
//! assert!(synthesis.converged);
//! assert_eq!(synthesis.circuit.count_ops().get("cx"), Some(&2));
//! ```

pub mod diagonal;
pub mod error;
pub mod network;
pub mod optimizer;
pub mod synthesizer;
pub mod variational;

pub use diagonal::DiagonalSynthesizer;
pub use error::{SynthError, SynthResult};
pub use network::{CnotNetwork, NetworkLayout};
pub use optimizer::{Adam, Minimum};
pub use synthesizer::{
    OpaqueSynthesizer, Synthesis, SynthesizerKind, UnitarySynthesizer, hilbert_schmidt_cost,
};
pub use variational::VariationalSynthesizer;
