//! Operator algebra for qgibbs.
//!
//! Every operator used to build Gibbs-state circuits (indicator projectors,
//! block encodings, rotations, Hamiltonians) is expressed through the
//! [`Operator`] trait, so the same construction code runs on either backend:
//!
//! - [`DenseOperator`]: explicit `2^n × 2^n` complex matrices on `ndarray`
//! - [`PauliSum`]: exact symbolic sums of Pauli strings
//!
//! The [`expm`] module holds the dense matrix exponential and the norm and
//! unitarity helpers used by validation code.
//!
//! # Example
//!
//! ```rust
//! use qgibbs_ops::{DenseOperator, Operator, PauliOp};
//!
//! // X ⊗ (I - P) + Z ⊗ P is unitary for a projector P
//! let p = DenseOperator::projector(true).unwrap();
//! let i = DenseOperator::identity(1);
//! let u = DenseOperator::pauli(PauliOp::X)
//!     .tensor(&i.sub(&p).unwrap())
//!     .add(&DenseOperator::pauli(PauliOp::Z).tensor(&p))
//!     .unwrap();
//! assert!(u.is_unitary(1e-12));
//! ```

pub mod dense;
pub mod error;
pub mod expm;
pub mod operator;
pub mod pauli;

pub use dense::DenseOperator;
pub use error::{OpsError, OpsResult};
pub use operator::Operator;
pub use pauli::{PauliOp, PauliString, PauliSum};
