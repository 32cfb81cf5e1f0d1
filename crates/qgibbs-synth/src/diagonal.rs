//! Exact synthesis of diagonal unitaries.
//!
//! A diagonal unitary `D = diag(e^{iφ_x})` is a product of commuting
//! Z-parity rotations. Writing the phases in the Walsh basis,
//!
//! ```text
//! φ_x = Σ_S a_S · (-1)^{|S ∧ x|},   a_S = (1/d) Σ_x φ_x · (-1)^{|S ∧ x|}
//! ```
//!
//! every non-empty subset `S` of qubits contributes `exp(i·a_S·Z_S)`: a CNOT
//! ladder that collects the parity of `S` on its highest qubit, `Rz(-2·a_S)`
//! there, and the ladder undone. The empty subset is the global phase.

use ndarray::Array2;
use num_complex::Complex64;
use qgibbs_compile::CouplingMap;
use qgibbs_ir::{Circuit, QubitId};
use tracing::{debug, instrument};

use crate::error::{SynthError, SynthResult};
use crate::synthesizer::{Synthesis, UnitarySynthesizer, validate_target};

/// Exact synthesizer for diagonal unitaries.
#[derive(Debug, Clone)]
pub struct DiagonalSynthesizer {
    /// Largest off-diagonal magnitude accepted.
    pub diagonal_tol: f64,
    /// Walsh coefficients smaller than this are dropped.
    pub angle_cutoff: f64,
}

impl Default for DiagonalSynthesizer {
    fn default() -> Self {
        Self {
            diagonal_tol: 1e-8,
            angle_cutoff: 1e-12,
        }
    }
}

impl DiagonalSynthesizer {
    /// Create a synthesizer with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_diagonal(&self, target: &Array2<Complex64>) -> SynthResult<()> {
        let offending = target
            .indexed_iter()
            .filter(|((r, c), _)| r != c)
            .map(|((r, c), z)| (r, c, z.norm()))
            .find(|&(_, _, magnitude)| magnitude > self.diagonal_tol);
        match offending {
            Some((row, col, magnitude)) => Err(SynthError::NotDiagonal {
                row,
                col,
                magnitude,
            }),
            None => Ok(()),
        }
    }
}

impl UnitarySynthesizer for DiagonalSynthesizer {
    fn name(&self) -> &str {
        "diagonal"
    }

    #[instrument(skip(self, target, coupling))]
    fn synthesize(
        &self,
        target: &Array2<Complex64>,
        num_qubits: u32,
        coupling: &CouplingMap,
    ) -> SynthResult<Synthesis> {
        validate_target(target, num_qubits, coupling)?;
        self.check_diagonal(target)?;

        let coefficients = walsh_coefficients(target.diag().iter().map(|z| z.arg()).collect());

        let mut circuit = Circuit::with_size("diagonal", num_qubits, 0);
        let mut rotations = 0usize;
        for (subset, &angle) in coefficients.iter().enumerate().skip(1) {
            if angle.abs() <= self.angle_cutoff {
                continue;
            }
            let qubits: Vec<u32> = (0..num_qubits).filter(|&q| subset >> q & 1 == 1).collect();
            append_parity_rotation(&mut circuit, &qubits, -2.0 * angle, coupling)?;
            rotations += 1;
        }
        circuit.dag_mut().set_global_phase(coefficients[0]);

        debug!(
            rotations,
            gates = circuit.size(),
            "synthesized diagonal unitary"
        );
        Ok(Synthesis::exact(circuit))
    }
}

/// Walsh–Hadamard coefficients `a_S` of a phase vector, indexed by the
/// subset bitmask `S`.
#[allow(clippy::cast_precision_loss)]
pub fn walsh_coefficients(mut phases: Vec<f64>) -> Vec<f64> {
    let len = phases.len();
    let mut half = 1;
    while half < len {
        for block in (0..len).step_by(2 * half) {
            for i in block..block + half {
                let (a, b) = (phases[i], phases[i + half]);
                phases[i] = a + b;
                phases[i + half] = a - b;
            }
        }
        half *= 2;
    }
    let scale = 1.0 / len as f64;
    phases.iter_mut().for_each(|p| *p *= scale);
    phases
}

/// Append `exp(-i·θ/2·Z_S)` for the qubits `S` in ascending order.
fn append_parity_rotation(
    circuit: &mut Circuit,
    qubits: &[u32],
    theta: f64,
    coupling: &CouplingMap,
) -> SynthResult<()> {
    for pair in qubits.windows(2) {
        if !coupling.is_connected(pair[0], pair[1]) {
            return Err(SynthError::Connectivity(format!(
                "parity ladder needs qubits {} and {} to be coupled",
                pair[0], pair[1]
            )));
        }
    }

    for pair in qubits.windows(2) {
        circuit.cx(QubitId(pair[0]), QubitId(pair[1]))?;
    }
    if let Some(&last) = qubits.last() {
        circuit.rz(theta, QubitId(last))?;
    }
    for pair in qubits.windows(2).rev() {
        circuit.cx(QubitId(pair[0]), QubitId(pair[1]))?;
    }
    Ok(())
}
