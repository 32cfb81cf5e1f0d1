//! Lowering of synthesized circuits onto a hardware gate set.
//!
//! [`transpile`] runs a preset [`PassManager`] over the circuit graph:
//! [`BasisTranslation`](passes::BasisTranslation) first, then, depending on
//! the optimization level, single-qubit fusion and two-qubit pair
//! cancellation. Every rewrite keeps the circuit's unitary exactly, global
//! phase included.
//!
//! ```rust
//! use qgibbs_compile::{BasisGates, transpile};
//! use qgibbs_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("cz", 2, 0);
//! circuit.h(QubitId(0)).unwrap().cz(QubitId(0), QubitId(1)).unwrap();
//!
//! let basis = BasisGates::ibm();
//! let compiled = transpile(&circuit, &basis, 3).unwrap();
//! assert!(compiled.count_ops().keys().all(|g| basis.contains(g)));
//! ```
//!
//! New passes implement [`Pass`]:
//!
//! ```rust
//! use qgibbs_compile::{BasisGates, CompileResult, Pass};
//! use qgibbs_ir::CircuitDag;
//!
//! struct DropBarriers;
//!
//! impl Pass for DropBarriers {
//!     fn name(&self) -> &'static str { "drop_barriers" }
//!
//!     fn run(&self, dag: &mut CircuitDag, _basis: &BasisGates) -> CompileResult<()> {
//!         let kept = dag.instructions().into_iter().filter(|i| !i.is_barrier());
//!         *dag = dag.rebuild(kept)?;
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod target;
pub mod unitary;

pub use error::{CompileError, CompileResult};
pub use manager::PassManager;
pub use pass::{FixedPoint, Pass};
pub use target::{BasisGates, CouplingMap};
pub use unitary::{Euler, OneQubitBasis};

use qgibbs_ir::Circuit;

/// Lower `circuit` to `basis` at optimization `level` (0 to 3).
///
/// Measurements and barriers stay where they are.
pub fn transpile(circuit: &Circuit, basis: &BasisGates, level: u8) -> CompileResult<Circuit> {
    let manager = PassManager::for_level(level)?;
    let mut dag = circuit.dag().clone();
    manager.run(&mut dag, basis)?;
    Ok(Circuit::from_dag(circuit.name(), dag))
}
