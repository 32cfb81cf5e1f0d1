//! What a backend can execute.

use serde::{Deserialize, Serialize};

/// Limits checked by [`Backend::validate`](crate::Backend::validate) before
/// a circuit is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub name: String,
    /// Widest circuit accepted, ancillas included.
    pub num_qubits: u32,
    pub max_shots: u32,
    pub is_simulator: bool,
    /// Whether dense custom unitaries run as-is. Backends without this need
    /// the circuit transpiled to standard gates first.
    #[serde(default)]
    pub dense_unitaries: bool,
}

impl Capabilities {
    /// An ideal statevector simulator of `num_qubits` qubits.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "statevector".into(),
            num_qubits,
            max_shots: 100_000_000,
            is_simulator: true,
            dense_unitaries: true,
        }
    }
}
