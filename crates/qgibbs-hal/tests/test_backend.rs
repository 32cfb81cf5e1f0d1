//! Provided `Backend` methods exercised through a mock backend.

use qgibbs_hal::{
    Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult, ValidationResult,
};
use num_complex::Complex64;
use qgibbs_ir::{Circuit, QubitId};

struct Mock {
    capabilities: Capabilities,
}

impl Mock {
    fn new(num_qubits: u32, max_shots: u32) -> Self {
        let mut capabilities = Capabilities::simulator(num_qubits);
        capabilities.name = "mock".into();
        capabilities.max_shots = max_shots;
        Self { capabilities }
    }
}

impl Backend for Mock {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn run(&self, _circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let mut counts = Counts::new();
        counts.insert("", u64::from(shots));
        Ok(ExecutionResult::new(counts, shots))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_accepts_fitting_circuit() {
    let backend = Mock::new(4, 1000);
    let circuit = Circuit::with_size("c", 4, 0);
    assert_eq!(backend.validate(&circuit, 1000), ValidationResult::Valid);
}

#[test]
fn test_validate_collects_every_reason() {
    let backend = Mock::new(2, 1000);
    let circuit = Circuit::with_size("c", 3, 0);
    match backend.validate(&circuit, 5000) {
        ValidationResult::Invalid { reasons } => assert_eq!(reasons.len(), 2),
        ValidationResult::Valid => panic!("expected rejection"),
    }
}

#[test]
fn test_validate_and_run_reports_invalid_circuit() {
    let backend = Mock::new(1, 10);
    let circuit = Circuit::with_size("c", 2, 0);
    let err = backend.validate_and_run(&circuit, 5).unwrap_err();
    assert!(matches!(err, HalError::Rejected(_)));

    let ok = backend
        .validate_and_run(&Circuit::with_size("c", 1, 0), 5)
        .unwrap();
    assert_eq!(ok.counts.total_shots(), 5);
}

// ---------------------------------------------------------------------------
// Gate kinds
// ---------------------------------------------------------------------------

fn with_dense_gate() -> Circuit {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    let mut circuit = Circuit::with_size("c", 1, 0);
    circuit
        .unitary("block", vec![one, zero, zero, one], &[QubitId(0)])
        .unwrap();
    circuit
}

#[test]
fn test_dense_unitary_needs_the_capability() {
    let mut backend = Mock::new(2, 100);
    assert!(backend.validate(&with_dense_gate(), 10).is_valid());

    backend.capabilities.dense_unitaries = false;
    match backend.validate(&with_dense_gate(), 10) {
        ValidationResult::Invalid { reasons } => {
            assert_eq!(reasons.len(), 1);
            assert!(reasons[0].contains("block"), "{reasons:?}");
        }
        ValidationResult::Valid => panic!("expected rejection"),
    }

    let mut standard = Circuit::with_size("c", 1, 0);
    standard.h(QubitId(0)).unwrap();
    assert!(backend.validate(&standard, 10).is_valid());
}
