use qgibbs_ir::{CircuitDag, Instruction, StandardGate};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::target::BasisGates;

/// Deletes back-to-back `cx·cx` on the same control and target and `cz·cz`
/// on the same pair. Nothing else may touch either qubit in between.
/// Removals expose new neighbours, so nested ladders collapse in one run.
pub struct CancelPairs;

fn self_inverse_pair(first: &Instruction, second: &Instruction) -> bool {
    let gate = |inst: &Instruction| inst.as_gate().and_then(|g| g.as_standard()).copied();
    match (gate(first), gate(second)) {
        (Some(StandardGate::CX), Some(StandardGate::CX)) => first.qubits == second.qubits,
        (Some(StandardGate::CZ), Some(StandardGate::CZ)) => {
            let mut a = first.qubits.clone();
            let mut b = second.qubits.clone();
            a.sort_unstable();
            b.sort_unstable();
            a == b
        }
        _ => false,
    }
}

impl Pass for CancelPairs {
    fn name(&self) -> &'static str {
        "cancel_pairs"
    }

    fn run(&self, dag: &mut CircuitDag, _basis: &BasisGates) -> CompileResult<()> {
        let mut kept: Vec<Option<Instruction>> = Vec::with_capacity(dag.num_ops());
        // Per qubit, the surviving instructions on it, most recent last.
        let mut stacks: Vec<Vec<usize>> = vec![Vec::new(); dag.num_qubits()];
        let mut cancelled = 0usize;

        for inst in dag.instructions() {
            if let &[a, b] = inst.qubits.as_slice() {
                let partner = stacks[a.index()].last().copied().filter(|&i| {
                    stacks[b.index()].last() == Some(&i)
                        && kept[i].as_ref().is_some_and(|prev| self_inverse_pair(prev, &inst))
                });
                if let Some(i) = partner {
                    kept[i] = None;
                    stacks[a.index()].pop();
                    stacks[b.index()].pop();
                    cancelled += 1;
                    continue;
                }
            }
            for q in &inst.qubits {
                stacks[q.index()].push(kept.len());
            }
            kept.push(Some(inst));
        }

        if cancelled > 0 {
            debug!(pairs = cancelled, "cancelled two-qubit pairs");
            *dag = dag.rebuild(kept.into_iter().flatten())?;
        }
        Ok(())
    }
}
