//! The synthesis service interface.
//!
//! A [`UnitarySynthesizer`] turns a target unitary on `q` local qubits into
//! a gate-level [`Circuit`]. Matrix basis index bit `k` belongs to local
//! qubit `k`, matching [`Circuit::unitary`] and the operator crate.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use num_complex::Complex64;
use qgibbs_compile::CouplingMap;
use qgibbs_ir::{Circuit, QubitId};
use qgibbs_ops::expm::{dagger, max_abs_diff};
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// Entry-wise tolerance for the unitarity check on targets.
pub const UNITARY_TOL: f64 = 1e-8;

/// Widest target any synthesizer accepts.
pub const MAX_QUBITS: u32 = 12;

/// The outcome of one synthesis call.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Circuit on the target's local qubits.
    pub circuit: Circuit,
    /// Remaining cost `1 − |Tr(U†V)|²/d²`; zero for exact methods.
    pub objective: f64,
    /// Whether the method reached its tolerance.
    pub converged: bool,
    /// Optimizer iterations spent.
    pub iterations: usize,
}

impl Synthesis {
    /// An exact synthesis that needed no optimization.
    pub fn exact(circuit: Circuit) -> Self {
        Self {
            circuit,
            objective: 0.0,
            converged: true,
            iterations: 0,
        }
    }
}

/// Synthesizes gate-level circuits for dense unitaries.
pub trait UnitarySynthesizer {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Synthesize `target`, a `2^num_qubits`-dimensional unitary, for a
    /// device with the given connectivity.
    fn synthesize(
        &self,
        target: &Array2<Complex64>,
        num_qubits: u32,
        coupling: &CouplingMap,
    ) -> SynthResult<Synthesis>;
}

/// Check the shape and unitarity of a target and that the coupling map
/// covers its qubits.
pub fn validate_target(
    target: &Array2<Complex64>,
    num_qubits: u32,
    coupling: &CouplingMap,
) -> SynthResult<()> {
    let (rows, cols) = target.dim();
    if num_qubits > MAX_QUBITS || rows != 1usize << num_qubits || cols != rows {
        return Err(SynthError::DimensionMismatch {
            rows,
            cols,
            num_qubits,
        });
    }
    if coupling.num_qubits() < num_qubits {
        return Err(SynthError::Connectivity(format!(
            "coupling map has {} qubits, target needs {num_qubits}",
            coupling.num_qubits()
        )));
    }
    let deviation = max_abs_diff(&target.dot(&dagger(target)), &Array2::eye(rows));
    if deviation > UNITARY_TOL {
        return Err(SynthError::NotUnitary { deviation });
    }
    Ok(())
}

/// The phase-insensitive distance `1 − |Tr(U†V)|²/d²`.
#[allow(clippy::cast_precision_loss)]
pub fn hilbert_schmidt_cost(target: &Array2<Complex64>, approx: &Array2<Complex64>) -> f64 {
    let dim = target.nrows() as f64;
    let overlap: Complex64 = target
        .iter()
        .zip(approx.iter())
        .map(|(u, v)| u.conj() * v)
        .sum();
    1.0 - overlap.norm_sqr() / (dim * dim)
}

/// Emits the target as a single opaque gate.
///
/// The result only runs on backends that apply dense unitaries, so it must
/// not be transpiled to a gate basis.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueSynthesizer;

impl UnitarySynthesizer for OpaqueSynthesizer {
    fn name(&self) -> &str {
        "opaque"
    }

    fn synthesize(
        &self,
        target: &Array2<Complex64>,
        num_qubits: u32,
        coupling: &CouplingMap,
    ) -> SynthResult<Synthesis> {
        validate_target(target, num_qubits, coupling)?;
        let mut circuit = Circuit::with_size("opaque", num_qubits, 0);
        let qubits: Vec<QubitId> = (0..num_qubits).map(QubitId).collect();
        circuit.unitary("unitary", target.iter().copied().collect(), &qubits)?;
        Ok(Synthesis::exact(circuit))
    }
}

/// Selects one of the built-in synthesizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesizerKind {
    /// Exact Walsh–Hadamard synthesis of diagonal unitaries.
    #[default]
    Diagonal,
    /// Variational CNOT-network synthesis.
    Variational,
    /// A single dense-unitary gate.
    Opaque,
}

impl SynthesizerKind {
    /// Whether circuits from this synthesizer can be lowered to a gate basis.
    pub fn is_transpilable(self) -> bool {
        !matches!(self, Self::Opaque)
    }
}

impl fmt::Display for SynthesizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Diagonal => "diagonal",
            Self::Variational => "variational",
            Self::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

impl FromStr for SynthesizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diagonal" => Ok(Self::Diagonal),
            "variational" | "aqc" => Ok(Self::Variational),
            "opaque" => Ok(Self::Opaque),
            other => Err(format!(
                "unknown synthesizer '{other}' (expected diagonal, variational or opaque)"
            )),
        }
    }
}
