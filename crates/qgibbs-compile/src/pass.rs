//! The pass interface.

use qgibbs_ir::CircuitDag;

use crate::error::CompileResult;
use crate::target::BasisGates;

/// One rewrite of a circuit graph towards `basis`.
pub trait Pass: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, dag: &mut CircuitDag, basis: &BasisGates) -> CompileResult<()>;
}

/// Repeats its passes while they keep removing instructions.
pub struct FixedPoint {
    passes: Vec<Box<dyn Pass>>,
    max_rounds: usize,
}

impl FixedPoint {
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self {
            passes,
            max_rounds: 20,
        }
    }
}

impl Pass for FixedPoint {
    fn name(&self) -> &'static str {
        "fixed_point"
    }

    fn run(&self, dag: &mut CircuitDag, basis: &BasisGates) -> CompileResult<()> {
        let mut size = dag.num_ops();
        for round in 1..=self.max_rounds {
            for pass in &self.passes {
                pass.run(dag, basis)?;
            }
            tracing::trace!(round, before = size, after = dag.num_ops(), "fixed point round");
            if dag.num_ops() >= size {
                break;
            }
            size = dag.num_ops();
        }
        Ok(())
    }
}
