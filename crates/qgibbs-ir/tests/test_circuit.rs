//! Integration tests for circuit construction and metrics.

use proptest::prelude::*;
use qgibbs_ir::{Circuit, ClbitId, IrError, QubitId};

// ---------------------------------------------------------------------------
// Wire layout
// ---------------------------------------------------------------------------

#[test]
fn test_data_and_ancilla_registers() {
    let mut circuit = Circuit::new("rus");
    let data = [circuit.add_qubit(), circuit.add_qubit()];
    let anc = [circuit.add_qubit()];
    for _ in 0..3 {
        circuit.add_clbit();
    }

    circuit.h(data[0]).unwrap().h(data[1]).unwrap();
    circuit.barrier_all().unwrap();
    circuit.h(anc[0]).unwrap();
    circuit.cz(anc[0], data[1]).unwrap();
    circuit.h(anc[0]).unwrap();
    circuit.measure(anc[0], ClbitId(2)).unwrap();
    circuit.barrier_all().unwrap();
    circuit.measure(data[0], ClbitId(0)).unwrap();
    circuit.measure(data[1], ClbitId(1)).unwrap();

    assert_eq!(circuit.num_qubits(), 3);
    assert_eq!(circuit.size(), 10);
    circuit.dag().verify().unwrap();
}

#[test]
fn test_measure_unknown_clbit() {
    let mut circuit = Circuit::with_size("m", 1, 0);
    let err = circuit.measure(QubitId(0), ClbitId(0)).unwrap_err();
    assert!(matches!(err, IrError::UnknownClbit { .. }));
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_depth_bounded_by_gate_count(gates in prop::collection::vec((0u32..4, 0u32..4, 0u8..3), 0..60)) {
        let mut circuit = Circuit::with_size("random", 4, 0);
        for (a, b, kind) in &gates {
            match kind {
                0 => { circuit.rz(0.1, QubitId(*a)).unwrap(); }
                1 if a != b => { circuit.cx(QubitId(*a), QubitId(*b)).unwrap(); }
                _ => { circuit.barrier_all().unwrap(); }
            }
        }
        let non_barrier = circuit
            .instructions()
            .filter(|inst| !inst.is_barrier())
            .count();
        prop_assert!(circuit.depth() <= non_barrier);
        prop_assert_eq!(circuit.size(), circuit.instructions().count());
        prop_assert!(circuit.dag().verify().is_ok());
    }
}
