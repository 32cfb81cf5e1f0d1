//! qgibbs Local Statevector Simulator
//!
//! [`SimulatorBackend`] evolves the full statevector once, applying standard
//! gates in place and dense custom gates by gather/scatter, then draws every
//! shot from the final distribution with a seedable RNG
//! ([`SimulatorBackend::with_seed`]). Memory is `16 · 2^n` bytes, so the
//! default 24-qubit limit needs 256 MiB.
//!
//! # Example
//!
//! ```rust
//! use qgibbs_adapter_sim::SimulatorBackend;
//! use qgibbs_hal::Backend;
//! use qgibbs_ir::{Circuit, QubitId};
//!
//! let backend = SimulatorBackend::with_seed(42);
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! let result = backend.run(&circuit, 1000).unwrap();
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! ```

mod simulator;
mod statevector;

pub use simulator::{MeasureMap, SimulatorBackend};
pub use statevector::Statevector;
