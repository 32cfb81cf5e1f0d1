use qgibbs_ir::{CircuitDag, Gate, Instruction, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::target::BasisGates;
use crate::unitary::OneQubitBasis;

/// Rewrites every gate outside the basis.
///
/// A foreign single-qubit gate is resynthesized from its matrix into
/// `rz`/`sx` or `rz`/`ry`; a foreign `cz` becomes `h·cx·h` on its second
/// operand. Dense custom gates and a missing `cx` cannot be translated.
/// The phase the rewrites drop is added to the graph's global phase.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "basis_translation"
    }

    fn run(&self, dag: &mut CircuitDag, basis: &BasisGates) -> CompileResult<()> {
        let family = OneQubitBasis::for_basis(basis);
        let mut lowered = Vec::with_capacity(dag.num_ops());
        let mut phase = 0.0;

        for inst in dag.instructions() {
            let foreign = match inst.as_gate() {
                Some(gate) if !basis.contains(gate.name()) => gate.clone(),
                _ => {
                    lowered.push(inst);
                    continue;
                }
            };
            let untranslatable = || CompileError::Untranslatable {
                gate: foreign.name().to_owned(),
                basis: basis.gates().join(","),
            };

            match (&foreign, inst.qubits.as_slice()) {
                (Gate::Standard(StandardGate::CZ), &[a, b]) if basis.contains("cx") => {
                    phase += lower_1q(StandardGate::H, b, basis, family, &mut lowered)
                        .ok_or_else(untranslatable)?;
                    lowered.push(Instruction::gate(StandardGate::CX, [a, b]));
                    phase += lower_1q(StandardGate::H, b, basis, family, &mut lowered)
                        .ok_or_else(untranslatable)?;
                }
                (Gate::Standard(gate), &[q]) => {
                    phase += lower_1q(*gate, q, basis, family, &mut lowered)
                        .ok_or_else(untranslatable)?;
                }
                _ => return Err(untranslatable()),
            }
        }

        let global = dag.global_phase() + phase;
        *dag = dag.rebuild(lowered)?;
        dag.set_global_phase(global);
        Ok(())
    }
}

/// Emit `gate` on `qubit` in the basis and return the phase dropped.
fn lower_1q(
    gate: StandardGate,
    qubit: QubitId,
    basis: &BasisGates,
    family: Option<OneQubitBasis>,
    out: &mut Vec<Instruction>,
) -> Option<f64> {
    if basis.contains(gate.name()) {
        out.push(Instruction::gate(gate, [qubit]));
        return Some(0.0);
    }
    let (gates, phase) = family?.resynthesize(&gate.matrix()?);
    out.extend(gates.into_iter().map(|g| Instruction::gate(g, [qubit])));
    Some(phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::names;
    use num_complex::Complex64;
    use qgibbs_ir::{Circuit, ClbitId};

    fn lower(circuit: Circuit, basis: &BasisGates) -> CompileResult<CircuitDag> {
        let mut dag = circuit.into_dag();
        BasisTranslation.run(&mut dag, basis)?;
        Ok(dag)
    }

    #[test]
    fn test_everything_lands_in_the_ibm_basis() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        circuit.ry(0.3, QubitId(1)).unwrap();

        let basis = BasisGates::ibm();
        let dag = lower(circuit, &basis).unwrap();
        let names = names(&dag);
        assert!(names.iter().all(|n| basis.contains(n)), "{names:?}");
        assert_eq!(names.iter().filter(|n| *n == "cx").count(), 1);
    }

    #[test]
    fn test_native_instructions_pass_through() {
        let mut circuit = Circuit::with_size("t", 2, 1);
        circuit.rz(0.1, QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.measure(QubitId(1), ClbitId(0)).unwrap();

        let dag = lower(circuit, &BasisGates::ibm()).unwrap();
        assert_eq!(names(&dag), ["rz", "cx", "barrier", "measure"]);
        assert_eq!(dag.global_phase(), 0.0);
    }

    #[test]
    fn test_custom_gates_are_untranslatable() {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit
            .unitary("blob", vec![one, zero, zero, one], &[QubitId(0)])
            .unwrap();
        assert!(matches!(
            lower(circuit, &BasisGates::ibm()),
            Err(CompileError::Untranslatable { gate, .. }) if gate == "blob"
        ));
    }

    #[test]
    fn test_cz_needs_cx() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        let basis = BasisGates::from_names(["rz", "sx"]).unwrap();
        assert!(lower(circuit, &basis).is_err());
    }
}
