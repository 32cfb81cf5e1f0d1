//! Preset pass pipelines.

use tracing::{debug, instrument};

use qgibbs_ir::CircuitDag;

use crate::error::{CompileError, CompileResult};
use crate::pass::{FixedPoint, Pass};
use crate::passes::{BasisTranslation, CancelPairs, Fuse1q};
use crate::target::BasisGates;

/// An ordered list of passes.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pipeline for optimization `level`:
    ///
    /// | level | after basis translation |
    /// |-------|-------------------------|
    /// | 0 | nothing |
    /// | 1 | single-qubit run fusion |
    /// | 2 | fusion, then two-qubit pair cancellation |
    /// | 3 | both, repeated until the circuit stops shrinking |
    pub fn for_level(level: u8) -> CompileResult<Self> {
        let mut pm = Self::new();
        pm.push(BasisTranslation);
        match level {
            0 => {}
            1 => pm.push(Fuse1q),
            2 => {
                pm.push(Fuse1q);
                pm.push(CancelPairs);
            }
            3 => pm.push(FixedPoint::new(vec![Box::new(Fuse1q), Box::new(CancelPairs)])),
            other => return Err(CompileError::OptimizationLevel(other)),
        }
        Ok(pm)
    }

    pub fn push(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass in order.
    #[instrument(skip_all, fields(passes = self.passes.len(), qubits = dag.num_qubits()))]
    pub fn run(&self, dag: &mut CircuitDag, basis: &BasisGates) -> CompileResult<()> {
        for pass in &self.passes {
            let before = dag.num_ops();
            pass.run(dag, basis)?;
            debug!(pass = pass.name(), before, after = dag.num_ops(), "pass finished");
        }
        debug!(depth = dag.depth(), size = dag.num_ops(), "pipeline finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgibbs_ir::{Circuit, QubitId};

    #[test]
    fn test_levels() {
        let lens: Vec<usize> = (0..=3)
            .map(|level| PassManager::for_level(level).unwrap().len())
            .collect();
        assert_eq!(lens, [1, 2, 3, 2]);
        assert!(matches!(
            PassManager::for_level(4),
            Err(CompileError::OptimizationLevel(4))
        ));
        assert!(PassManager::new().is_empty());
    }

    #[test]
    fn test_fixed_point_cascades() {
        // The cx pair only becomes adjacent once the rotations between them fuse away.
        let mut circuit = Circuit::with_size("cascade", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.rz(0.4, QubitId(1)).unwrap();
        circuit.rz(-0.4, QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let mut dag = circuit.into_dag();
        PassManager::for_level(3)
            .unwrap()
            .run(&mut dag, &BasisGates::ibm())
            .unwrap();
        assert_eq!(dag.num_ops(), 0);
    }
}
