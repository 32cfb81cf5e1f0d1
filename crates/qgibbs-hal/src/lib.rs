//! qgibbs Hardware Abstraction Layer
//!
//! A small, blocking interface for executing circuits:
//! - A common [`Backend`] trait
//! - [`Capabilities`] to describe backend limits
//! - Unified result handling via [`ExecutionResult`] and [`Counts`]
//!
//! # Implementing a Backend
//!
//! ```rust
//! use qgibbs_hal::{Backend, Capabilities, Counts, ExecutionResult, HalResult};
//! use qgibbs_ir::Circuit;
//!
//! struct AllZeros {
//!     capabilities: Capabilities,
//! }
//!
//! impl Backend for AllZeros {
//!     fn name(&self) -> &str { "all_zeros" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
//!         let mut counts = Counts::new();
//!         counts.insert("0".repeat(circuit.num_clbits()), u64::from(shots));
//!         Ok(ExecutionResult::new(counts, shots))
//!     }
//! }
//!
//! let backend = AllZeros { capabilities: Capabilities::simulator(2) };
//! let circuit = Circuit::with_size("c", 2, 2);
//! let result = backend.validate_and_run(&circuit, 10).unwrap();
//! assert_eq!(result.counts.get("00"), 10);
//! assert!(backend.validate_and_run(&circuit, 0).is_err());
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod result;

pub use backend::{Backend, ValidationResult};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use result::{Counts, ExecutionResult};
