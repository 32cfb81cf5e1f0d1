//! Instructions: a gate, measurement or barrier with its operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId, Wire};

/// What an instruction does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Apply a gate.
    Gate(Gate),
    /// Measure `qubits[0]` into `clbits[0]`.
    Measure,
    /// Order the listed qubits; occupies no layer.
    Barrier,
}

/// An operation placed on specific wires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub kind: InstructionKind,
    /// Quantum operands in gate order.
    pub qubits: Vec<QubitId>,
    /// Classical operands.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// `gate` on `qubits`.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// Measure `qubit` into `clbit`.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// A barrier across `qubits`.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// The gate, unless this is a measurement or barrier.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(gate) => Some(gate),
            InstructionKind::Measure | InstructionKind::Barrier => None,
        }
    }

    /// The built-in single-qubit gate and its operand, if that is what this is.
    pub fn standard_1q(&self) -> Option<(&StandardGate, QubitId)> {
        match (self.as_gate()?, self.qubits.as_slice()) {
            (Gate::Standard(gate), &[qubit]) => Some((gate, qubit)),
            _ => None,
        }
    }

    /// True for gates of any kind.
    pub fn is_gate(&self) -> bool {
        self.as_gate().is_some()
    }

    /// True for measurements.
    pub fn is_measure(&self) -> bool {
        self.kind == InstructionKind::Measure
    }

    /// True for barriers.
    pub fn is_barrier(&self) -> bool {
        self.kind == InstructionKind::Barrier
    }

    /// Name used in operation counts.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Every wire the instruction touches, qubits first.
    pub fn wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.qubits
            .iter()
            .map(|&q| Wire::Qubit(q))
            .chain(self.clbits.iter().map(|&c| Wire::Clbit(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_1q() {
        let rz = Instruction::gate(StandardGate::Rz(0.5), [QubitId(2)]);
        assert_eq!(rz.standard_1q(), Some((&StandardGate::Rz(0.5), QubitId(2))));
        assert!(rz.is_gate());

        let cx = Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)]);
        assert!(cx.standard_1q().is_none());
        assert_eq!(cx.name(), "cx");
    }

    #[test]
    fn test_measure_wires() {
        let m = Instruction::measure(QubitId(1), ClbitId(3));
        assert!(m.is_measure() && !m.is_gate());
        let wires: Vec<_> = m.wires().collect();
        assert_eq!(wires, [Wire::Qubit(QubitId(1)), Wire::Clbit(ClbitId(3))]);
    }

    #[test]
    fn test_barrier() {
        let b = Instruction::barrier((0..3).map(QubitId));
        assert!(b.is_barrier());
        assert_eq!(b.name(), "barrier");
        assert_eq!(b.wires().count(), 3);
    }
}
