use qgibbs_ir::{CircuitDag, Instruction, Matrix2, QubitId, StandardGate};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::target::BasisGates;
use crate::unitary::{OneQubitBasis, matmul};

/// Collapses each maximal run of single-qubit gates on a wire into its
/// product and resynthesizes it, keeping the rewrite only when it is
/// shorter. Anything else touching the wire ends the run.
///
/// Runs are rewritten into `rz`/`sx` or `rz`/`ry` following the basis,
/// `rz`/`ry` when the basis supports neither.
pub struct Fuse1q;

struct Run {
    gates: Vec<StandardGate>,
    unitary: Matrix2,
}

fn flush(
    run: Run,
    qubit: QubitId,
    family: OneQubitBasis,
    out: &mut Vec<Instruction>,
    phase: &mut f64,
) {
    let (fused, dropped) = family.resynthesize(&run.unitary);
    let gates = if fused.len() < run.gates.len() {
        *phase += dropped;
        fused
    } else {
        run.gates
    };
    out.extend(gates.into_iter().map(|g| Instruction::gate(g, [qubit])));
}

impl Pass for Fuse1q {
    fn name(&self) -> &'static str {
        "fuse_1q"
    }

    fn run(&self, dag: &mut CircuitDag, basis: &BasisGates) -> CompileResult<()> {
        let family = OneQubitBasis::for_basis(basis).unwrap_or_default();
        let mut runs: Vec<Option<Run>> = (0..dag.num_qubits()).map(|_| None).collect();
        let mut out = Vec::with_capacity(dag.num_ops());
        let mut phase = 0.0;

        for inst in dag.instructions() {
            let single = inst
                .standard_1q()
                .and_then(|(gate, q)| Some((*gate, q, gate.matrix()?)));
            if let Some((gate, qubit, matrix)) = single {
                match &mut runs[qubit.index()] {
                    Some(run) => {
                        run.gates.push(gate);
                        run.unitary = matmul(&matrix, &run.unitary);
                    }
                    slot => {
                        *slot = Some(Run {
                            gates: vec![gate],
                            unitary: matrix,
                        });
                    }
                }
                continue;
            }

            for &qubit in &inst.qubits {
                if let Some(run) = runs[qubit.index()].take() {
                    flush(run, qubit, family, &mut out, &mut phase);
                }
            }
            out.push(inst);
        }

        for (qubit, run) in dag.qubits().zip(runs) {
            if let Some(run) = run {
                flush(run, qubit, family, &mut out, &mut phase);
            }
        }

        let global = dag.global_phase() + phase;
        *dag = dag.rebuild(out)?;
        dag.set_global_phase(global);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::names;
    use qgibbs_ir::{Circuit, ClbitId};

    fn fuse(circuit: Circuit, basis: &BasisGates) -> CircuitDag {
        let mut dag = circuit.into_dag();
        Fuse1q.run(&mut dag, basis).unwrap();
        dag
    }

    #[test]
    fn test_hh_vanishes() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        assert_eq!(fuse(circuit, &BasisGates::universal()).num_ops(), 0);
    }

    #[test]
    fn test_rz_chain_sums() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        for angle in [0.1, 0.2, 0.3] {
            circuit.rz(angle, QubitId(0)).unwrap();
        }
        let dag = fuse(circuit, &BasisGates::ibm());
        let angles: Vec<f64> = dag
            .ops()
            .filter_map(|(_, inst)| inst.standard_1q()?.0.angle())
            .collect();
        assert_eq!(angles.len(), 1);
        assert!((angles[0] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_short_runs_are_kept_verbatim() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.sx(QubitId(0)).unwrap().rz(0.7, QubitId(0)).unwrap();
        let dag = fuse(circuit, &BasisGates::ibm());
        assert_eq!(names(&dag), ["sx", "rz"]);
        assert_eq!(dag.global_phase(), 0.0);
    }

    #[test]
    fn test_barriers_and_measurements_split_runs() {
        let mut circuit = Circuit::with_size("t", 1, 1);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier([QubitId(0)]).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        let dag = fuse(circuit, &BasisGates::universal());
        assert_eq!(names(&dag), ["h", "barrier", "h", "measure"]);
    }

    #[test]
    fn test_runs_on_other_wires_flush_at_the_end() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.x(QubitId(1)).unwrap();
        circuit.x(QubitId(1)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        let dag = fuse(circuit, &BasisGates::universal());
        assert_eq!(names(&dag), ["h"]);
    }
}
