//! Circuit builder.

use std::collections::BTreeMap;

use num_complex::Complex64;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{CustomGate, Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A named circuit with chainable gate methods.
///
/// ```rust
/// use qgibbs_ir::{Circuit, QubitId};
///
/// let mut bell = Circuit::with_size("bell", 2, 2);
/// bell.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
/// assert_eq!(bell.depth(), 3);
/// # Ok::<(), qgibbs_ir::IrError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    name: String,
    dag: CircuitDag,
}

macro_rules! fixed_gates {
    ($($(#[$doc:meta])* $method:ident => $gate:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
                self.gate(StandardGate::$gate, [qubit])
            }
        )*
    };
}

macro_rules! rotation_gates {
    ($($(#[$doc:meta])* $method:ident => $gate:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
                self.gate(StandardGate::$gate(angle), [qubit])
            }
        )*
    };
}

impl Circuit {
    /// A circuit with no wires.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dag: CircuitDag::default(),
        }
    }

    /// A circuit with `num_qubits` qubits and `num_clbits` classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            dag: CircuitDag::with_wires(num_qubits as usize, num_clbits as usize),
        }
    }

    /// Wrap an existing graph.
    pub fn from_dag(name: impl Into<String>, dag: CircuitDag) -> Self {
        Self {
            name: name.into(),
            dag,
        }
    }

    /// Append a qubit.
    pub fn add_qubit(&mut self) -> QubitId {
        self.dag.add_qubit()
    }

    /// Append a classical bit.
    pub fn add_clbit(&mut self) -> ClbitId {
        self.dag.add_clbit()
    }

    fixed_gates! {
        /// Identity.
        id => I;
        /// Hadamard.
        h => H;
        /// Pauli X.
        x => X;
        /// Pauli Y.
        y => Y;
        /// Pauli Z.
        z => Z;
        /// S.
        s => S;
        /// S†.
        sdg => Sdg;
        /// sqrt(X).
        sx => SX;
        /// sqrt(X)†.
        sxdg => SXdg;
    }

    rotation_gates! {
        /// `Rx(angle)`.
        rx => Rx;
        /// `Ry(angle)`.
        ry => Ry;
        /// `Rz(angle)`.
        rz => Rz;
        /// Phase `P(angle)`.
        p => P;
    }

    /// CNOT from `control` onto `target`.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Controlled Z.
    pub fn cz(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [a, b])
    }

    /// Append any gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Append a dense unitary; bit `k` of its basis index is `qubits[k]`.
    pub fn unitary(
        &mut self,
        name: impl Into<String>,
        matrix: Vec<Complex64>,
        qubits: &[QubitId],
    ) -> IrResult<&mut Self> {
        let gate = CustomGate::new(name, qubits.len(), matrix)?;
        self.gate(gate, qubits.iter().copied())
    }

    /// Measure `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure qubit `k` into bit `k` for every `k` both wires exist for.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let pairs: Vec<_> = self.dag.qubits().zip(self.dag.clbits()).collect();
        for (qubit, clbit) in pairs {
            self.measure(qubit, clbit)?;
        }
        Ok(self)
    }

    /// Barrier across `qubits`.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Barrier across every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.dag.qubits().collect();
        self.barrier(qubits)
    }

    /// Append the gates of the unitary circuit `other`, sending its qubit `k`
    /// to `targets[k]` and adding its global phase to ours.
    pub fn compose(&mut self, other: &Circuit, targets: &[QubitId]) -> IrResult<&mut Self> {
        if other.num_qubits() != targets.len() {
            return Err(IrError::Width {
                width: other.num_qubits(),
                targets: targets.len(),
            });
        }
        if other.instructions().any(Instruction::is_measure) {
            return Err(IrError::ComposeMeasured(other.name.clone()));
        }

        for inst in other.instructions() {
            let mut placed = inst.clone();
            for qubit in &mut placed.qubits {
                *qubit = targets[qubit.index()];
            }
            self.dag.apply(placed)?;
        }
        self.dag
            .set_global_phase(self.dag.global_phase() + other.dag.global_phase());
        Ok(self)
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.dag.num_qubits()
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.dag.num_clbits()
    }

    /// Instruction count, measurements and barriers included.
    pub fn size(&self) -> usize {
        self.dag.num_ops()
    }

    /// See [`CircuitDag::depth`].
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Global phase in radians.
    pub fn global_phase(&self) -> f64 {
        self.dag.global_phase()
    }

    /// Instruction counts keyed by name.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions() {
            *counts.entry(inst.name().to_owned()).or_default() += 1;
        }
        counts
    }

    /// Gates acting on exactly two qubits.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.instructions()
            .filter(|inst| inst.is_gate() && inst.qubits.len() == 2)
            .count()
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.ops().map(|(_, inst)| inst)
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    pub fn dag_mut(&mut self) -> &mut CircuitDag {
        &mut self.dag
    }

    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_generated_methods_pick_the_right_gate() {
        let mut circuit = Circuit::with_size("gates", 1, 0);
        circuit.sxdg(QubitId(0)).unwrap().p(0.5, QubitId(0)).unwrap();
        let gates: Vec<_> = circuit
            .instructions()
            .filter_map(|inst| inst.standard_1q().map(|(g, _)| *g))
            .collect();
        assert_eq!(gates, [StandardGate::SXdg, StandardGate::P(0.5)]);
    }

    #[test]
    fn test_counts_and_depth() {
        let mut circuit = Circuit::with_size("c", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.measure_all().unwrap();

        assert_eq!(circuit.size(), 5);
        assert_eq!(circuit.depth(), 2);
        let counts = circuit.count_ops();
        assert_eq!(counts["h"], 2);
        assert_eq!(counts["measure"], 2);
        assert_eq!(counts["barrier"], 1);
    }

    #[test]
    fn test_measure_all_stops_at_the_shorter_register() {
        let mut circuit = Circuit::with_size("c", 3, 1);
        circuit.measure_all().unwrap();
        assert_eq!(circuit.size(), 1);
    }

    #[test]
    fn test_compose_relabels_and_adds_phase() {
        let mut block = Circuit::with_size("block", 2, 0);
        block.rz(FRAC_PI_4, QubitId(0)).unwrap();
        block.cx(QubitId(0), QubitId(1)).unwrap();
        block.dag_mut().set_global_phase(0.5);

        let mut circuit = Circuit::with_size("main", 4, 0);
        circuit.dag_mut().set_global_phase(0.25);
        circuit.compose(&block, &[QubitId(3), QubitId(1)]).unwrap();

        let qubits: Vec<_> = circuit.instructions().map(|i| i.qubits.clone()).collect();
        assert_eq!(qubits, [vec![QubitId(3)], vec![QubitId(3), QubitId(1)]]);
        assert_eq!(circuit.num_two_qubit_gates(), 1);
        assert!((circuit.global_phase() - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_compose_errors() {
        let block = Circuit::with_size("block", 2, 0);
        let mut circuit = Circuit::with_size("main", 3, 0);
        assert!(matches!(
            circuit.compose(&block, &[QubitId(0)]),
            Err(IrError::Width { width: 2, targets: 1 })
        ));

        let mut measured = Circuit::with_size("m", 1, 1);
        measured.measure(QubitId(0), ClbitId(0)).unwrap();
        assert!(matches!(
            circuit.compose(&measured, &[QubitId(0)]),
            Err(IrError::ComposeMeasured(name)) if name == "m"
        ));
        assert_eq!(circuit.size(), 0);
    }

    #[test]
    fn test_unitary() {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let mut circuit = Circuit::with_size("u", 1, 0);
        circuit
            .unitary("ident", vec![one, zero, zero, one], &[QubitId(0)])
            .unwrap();
        assert_eq!(circuit.count_ops()["ident"], 1);
        assert!(circuit.unitary("bad", vec![one], &[QubitId(0)]).is_err());
    }

    #[test]
    fn test_wires_can_grow() {
        let mut circuit = Circuit::new("grow");
        let q = circuit.add_qubit();
        let c = circuit.add_clbit();
        circuit.x(q).unwrap().measure(q, c).unwrap();
        let rebuilt = Circuit::from_dag("copy", circuit.clone().into_dag());
        assert_eq!((rebuilt.num_qubits(), rebuilt.num_clbits()), (1, 1));
        assert_eq!(rebuilt.size(), 2);
    }
}
