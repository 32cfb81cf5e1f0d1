//! The execution interface.
//!
//! Execution is blocking: every backend here is local and the experiment
//! driver submits one circuit at a time.

use qgibbs_ir::{Circuit, Gate};

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// Whether a circuit and shot count fit a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reasons: Vec<String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        *self == ValidationResult::Valid
    }
}

/// Something that samples measurement outcomes of a circuit.
///
/// `capabilities()` is cached at construction. A successful `run()` records
/// exactly `shots` outcomes.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    /// Compare the circuit width, shot count and gate kinds with the
    /// capabilities.
    fn validate(&self, circuit: &Circuit, shots: u32) -> ValidationResult {
        let caps = self.capabilities();
        let mut reasons = Vec::new();
        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(
                HalError::TooManyQubits {
                    backend: self.name().to_owned(),
                    needed: circuit.num_qubits(),
                    limit: caps.num_qubits,
                }
                .to_string(),
            );
        }
        if !(1..=caps.max_shots).contains(&shots) {
            reasons.push(
                HalError::Shots {
                    shots,
                    max: caps.max_shots,
                }
                .to_string(),
            );
        }
        if !caps.dense_unitaries {
            let dense = circuit
                .instructions()
                .filter_map(|inst| inst.as_gate())
                .find(|gate| matches!(gate, Gate::Custom(_)));
            if let Some(gate) = dense {
                reasons.push(HalError::DenseUnitary(gate.name().to_owned()).to_string());
            }
        }
        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }

    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult>;

    /// [`validate`](Self::validate), then [`run`](Self::run).
    fn validate_and_run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        match self.validate(circuit, shots) {
            ValidationResult::Valid => self.run(circuit, shots),
            ValidationResult::Invalid { reasons } => Err(HalError::Rejected(reasons.join("; "))),
        }
    }
}
