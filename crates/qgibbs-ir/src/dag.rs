//! Dependency graph of a circuit.
//!
//! Every node is an instruction. An edge `a → b` labelled with a wire means
//! `b` is the next instruction on that wire after `a`. Instructions are only
//! ever appended, so node order is a topological order; passes that
//! restructure a circuit build a fresh graph with [`CircuitDag::rebuild`].

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId, Wire};

/// Node handle.
pub type NodeIndex = PetNodeIndex<u32>;

/// Instructions linked along the wires they share.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<Instruction, Wire, u32>,
    /// Last instruction on each qubit.
    qubit_front: Vec<Option<NodeIndex>>,
    /// Last instruction on each classical bit.
    clbit_front: Vec<Option<NodeIndex>>,
    global_phase: f64,
}

impl CircuitDag {
    /// An empty graph over `num_qubits` qubits and `num_clbits` bits.
    pub fn with_wires(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            graph: DiGraph::default(),
            qubit_front: vec![None; num_qubits],
            clbit_front: vec![None; num_clbits],
            global_phase: 0.0,
        }
    }

    /// Append a qubit wire.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_qubit(&mut self) -> QubitId {
        self.qubit_front.push(None);
        QubitId(self.qubit_front.len() as u32 - 1)
    }

    /// Append a classical wire.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_clbit(&mut self) -> ClbitId {
        self.clbit_front.push(None);
        ClbitId(self.clbit_front.len() as u32 - 1)
    }

    fn check(&self, inst: &Instruction) -> IrResult<()> {
        let name = || inst.name().to_string();
        match &inst.kind {
            InstructionKind::Gate(gate) if gate.num_qubits() != inst.qubits.len() => {
                return Err(IrError::Arity {
                    instruction: name(),
                    expected: gate.num_qubits(),
                    got: inst.qubits.len(),
                });
            }
            InstructionKind::Measure if inst.qubits.len() != 1 || inst.clbits.len() != 1 => {
                return Err(IrError::MalformedMeasure {
                    qubits: inst.qubits.len(),
                    clbits: inst.clbits.len(),
                });
            }
            _ => {}
        }

        for (i, &qubit) in inst.qubits.iter().enumerate() {
            if qubit.index() >= self.qubit_front.len() {
                return Err(IrError::UnknownQubit {
                    instruction: name(),
                    qubit,
                });
            }
            if inst.qubits[..i].contains(&qubit) {
                return Err(IrError::RepeatedQubit {
                    instruction: name(),
                    qubit,
                });
            }
        }
        if let Some(&clbit) = inst
            .clbits
            .iter()
            .find(|c| c.index() >= self.clbit_front.len())
        {
            return Err(IrError::UnknownClbit {
                instruction: name(),
                clbit,
            });
        }
        Ok(())
    }

    fn front_mut(&mut self, wire: Wire) -> &mut Option<NodeIndex> {
        match wire {
            Wire::Qubit(q) => &mut self.qubit_front[q.index()],
            Wire::Clbit(c) => &mut self.clbit_front[c.index()],
        }
    }

    /// Append `inst` after the current last instruction on each of its wires.
    pub fn apply(&mut self, inst: Instruction) -> IrResult<NodeIndex> {
        self.check(&inst)?;
        let wires: Vec<Wire> = inst.wires().collect();
        let node = self.graph.add_node(inst);
        for wire in wires {
            if let Some(prev) = self.front_mut(wire).replace(node) {
                self.graph.add_edge(prev, node, wire);
            }
        }
        Ok(node)
    }

    /// Instructions in application order.
    pub fn ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .map(move |node| (node, &self.graph[node]))
    }

    /// Owned copy of the instruction sequence.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.graph.node_weights().cloned().collect()
    }

    /// A graph over the same wires and global phase holding `instructions`.
    pub fn rebuild(&self, instructions: impl IntoIterator<Item = Instruction>) -> IrResult<Self> {
        let mut dag = Self::with_wires(self.num_qubits(), self.num_clbits());
        dag.global_phase = self.global_phase;
        for inst in instructions {
            dag.apply(inst)?;
        }
        Ok(dag)
    }

    /// The instruction at `node`.
    pub fn instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node)
    }

    /// Instructions that must run right before `node`, one per shared wire.
    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = (Wire, NodeIndex)> + '_ {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| (*edge.weight(), edge.source()))
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubit_front.len()
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbit_front.len()
    }

    /// Number of instructions, measurements and barriers included.
    pub fn num_ops(&self) -> usize {
        self.graph.node_count()
    }

    /// Qubit ids in order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> {
        (0..self.num_qubits() as u32).map(QubitId)
    }

    /// Classical bit ids in order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> {
        (0..self.num_clbits() as u32).map(ClbitId)
    }

    /// Length of the longest dependency chain. Barriers order their wires
    /// but occupy no layer.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.graph.node_count()];
        for (node, inst) in self.ops() {
            let before = self
                .predecessors(node)
                .map(|(_, prev)| layer[prev.index()])
                .max()
                .unwrap_or(0);
            layer[node.index()] = before + usize::from(!inst.is_barrier());
        }
        layer.into_iter().max().unwrap_or(0)
    }

    /// Global phase in radians.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Replace the global phase.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.global_phase = phase;
    }

    /// The underlying graph.
    pub fn graph(&self) -> &DiGraph<Instruction, Wire, u32> {
        &self.graph
    }

    /// Check that edges only run forward, that each instruction has at most
    /// one predecessor per wire, and only on wires it touches.
    pub fn verify(&self) -> IrResult<()> {
        for (node, inst) in self.ops() {
            let mut seen: Vec<Wire> = Vec::new();
            for (wire, prev) in self.predecessors(node) {
                if prev >= node {
                    return Err(IrError::Corrupt(format!(
                        "edge from {prev:?} runs backwards into {node:?}"
                    )));
                }
                if !inst.wires().any(|w| w == wire) {
                    return Err(IrError::Corrupt(format!(
                        "'{}' at {node:?} is linked on {wire}, which it does not touch",
                        inst.name()
                    )));
                }
                if seen.contains(&wire) {
                    return Err(IrError::Corrupt(format!(
                        "{node:?} has two predecessors on {wire}"
                    )));
                }
                seen.push(wire);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn h(q: u32) -> Instruction {
        Instruction::gate(StandardGate::H, [QubitId(q)])
    }

    fn cx(c: u32, t: u32) -> Instruction {
        Instruction::gate(StandardGate::CX, [QubitId(c), QubitId(t)])
    }

    #[test]
    fn test_empty() {
        let dag = CircuitDag::with_wires(2, 1);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
        assert_eq!(dag.qubits().count(), 2);
    }

    #[test]
    fn test_depth_counts_longest_chain() {
        let mut dag = CircuitDag::with_wires(3, 0);
        dag.apply(h(0)).unwrap();
        dag.apply(h(1)).unwrap();
        dag.apply(cx(0, 1)).unwrap();
        dag.apply(h(2)).unwrap();
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_barrier_orders_without_a_layer() {
        let mut dag = CircuitDag::with_wires(2, 0);
        dag.apply(h(0)).unwrap();
        dag.apply(h(0)).unwrap();
        dag.apply(Instruction::barrier([QubitId(0), QubitId(1)])).unwrap();
        dag.apply(h(1)).unwrap();
        assert_eq!(dag.depth(), 3);
        dag.verify().unwrap();
    }

    #[test]
    fn test_predecessors_follow_wires() {
        let mut dag = CircuitDag::with_wires(2, 1);
        let a = dag.apply(h(0)).unwrap();
        let b = dag.apply(h(1)).unwrap();
        let c = dag.apply(cx(0, 1)).unwrap();
        let m = dag.apply(Instruction::measure(QubitId(1), ClbitId(0))).unwrap();

        let mut preds: Vec<_> = dag.predecessors(c).collect();
        preds.sort_by_key(|(_, n)| *n);
        assert_eq!(preds, [(Wire::Qubit(QubitId(0)), a), (Wire::Qubit(QubitId(1)), b)]);
        assert_eq!(dag.predecessors(m).count(), 1);
    }

    #[test]
    fn test_rejections() {
        let mut dag = CircuitDag::with_wires(2, 0);
        assert!(matches!(
            dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0)])),
            Err(IrError::Arity { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            dag.apply(cx(1, 1)),
            Err(IrError::RepeatedQubit { qubit: QubitId(1), .. })
        ));
        assert!(matches!(
            dag.apply(h(5)),
            Err(IrError::UnknownQubit { qubit: QubitId(5), .. })
        ));
        assert!(matches!(
            dag.apply(Instruction::measure(QubitId(0), ClbitId(0))),
            Err(IrError::UnknownClbit { .. })
        ));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_rebuild_keeps_wires_and_phase() {
        let mut dag = CircuitDag::with_wires(2, 1);
        dag.set_global_phase(0.25);
        dag.apply(h(1)).unwrap();
        dag.apply(Instruction::measure(QubitId(1), ClbitId(0))).unwrap();

        let rebuilt = dag.rebuild(dag.instructions()).unwrap();
        assert_eq!(rebuilt.num_qubits(), 2);
        assert_eq!(rebuilt.num_clbits(), 1);
        assert_eq!(rebuilt.global_phase(), 0.25);
        let names: Vec<_> = rebuilt.ops().map(|(_, i)| i.name()).collect();
        assert_eq!(names, ["h", "measure"]);
    }
}
