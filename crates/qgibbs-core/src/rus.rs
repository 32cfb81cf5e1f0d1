//! Repeat-until-success circuit assembly.
//!
//! Every clique gets one ancilla. The product of its factor unitaries is
//! truncated to the ancilla-0 block `D`, lifted to `|0⟩⟨0|⊗D + |1⟩⟨1|⊗D†`,
//! synthesized, and sandwiched between Hadamards on the clique ancilla. The
//! ancilla reads 0 with amplitude `Re(D)`, which is the clique's share of
//! `exp(-βH/2)` on the data register prepared in `|+⟩^n`.

use std::fmt;
use std::str::FromStr;

use qgibbs_compile::CouplingMap;
use qgibbs_ir::{Circuit, ClbitId, QubitId};
use qgibbs_ops::{DenseOperator, Operator};
use qgibbs_synth::{Synthesis, UnitarySynthesizer};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::encoding::conjugate_blocks;
use crate::error::{GibbsError, GibbsResult};
use crate::model::{CliqueModel, Factor};
use crate::power::factor_unitary;

/// The log-partition estimate `lnZ` subtracted from every factor weight,
/// spread evenly over the cliques.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogShift {
    /// `lnZ = 0`.
    None,
    /// A fixed `lnZ`.
    Fixed {
        /// The shift.
        value: f64,
    },
    /// `lnZ = |C|·(θ_max/2 + margin)`, which makes the largest shifted
    /// weight exactly `-margin`.
    MaxWeight {
        /// Distance kept from zero.
        margin: f64,
    },
}

impl Default for LogShift {
    fn default() -> Self {
        Self::MaxWeight { margin: 1e-3 }
    }
}

impl LogShift {
    /// Resolve `lnZ` for the given raw weights.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, weights: impl IntoIterator<Item = f64>, num_cliques: usize) -> f64 {
        match *self {
            Self::None => 0.0,
            Self::Fixed { value } => value,
            Self::MaxWeight { margin } => {
                let max = weights.into_iter().fold(f64::NEG_INFINITY, f64::max);
                num_cliques as f64 * (0.5 * max + margin)
            }
        }
    }
}

impl fmt::Display for LogShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fixed { value } => write!(f, "{value}"),
            Self::MaxWeight { margin } => write!(f, "max:{margin}"),
        }
    }
}

/// Parses `none`, `max`, `max:<margin>` or a number.
impl FromStr for LogShift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "none" => return Ok(Self::None),
            "max" => return Ok(Self::default()),
            _ => {}
        }
        if let Some(margin) = s.strip_prefix("max:") {
            let margin = margin
                .parse::<f64>()
                .map_err(|e| format!("invalid margin '{margin}': {e}"))?;
            return Ok(Self::MaxWeight { margin });
        }
        s.parse::<f64>()
            .map(|value| Self::Fixed { value })
            .map_err(|_| format!("invalid log shift '{s}', expected none, max, max:<margin> or a number"))
    }
}

/// An assembled RUS circuit with what went into it.
#[derive(Debug, Clone)]
pub struct RusCircuit {
    /// `n + |C|` qubits and as many classical bits.
    pub circuit: Circuit,
    /// One synthesis per clique.
    pub syntheses: Vec<Synthesis>,
    /// The resolved `lnZ`.
    pub log_shift: f64,
}

/// Ancilla-0 block of the product of one clique's factor unitaries.
///
/// Each factor uses the halved weight `w = θ/2 - shift`, which must be
/// negative. Factors are applied in enumeration order.
pub fn clique_block<O: Operator>(
    clique: usize,
    factors: &[Factor<O>],
    num_variables: usize,
    beta: f64,
    shift: f64,
) -> GibbsResult<DenseOperator> {
    let data = qubit_count(num_variables)?;
    let mut product = O::identity(data + 1);
    for (assignment, factor) in factors.iter().enumerate() {
        let w = 0.5 * factor.weight - shift;
        if !(w < 0.0) {
            return Err(GibbsError::NonNegativeWeight {
                clique,
                assignment,
                w,
            });
        }
        product = factor_unitary(&factor.indicator, beta, w)?.compose(&product)?;
    }
    Ok(DenseOperator::from_matrix(product.to_matrix())?.top_left(data)?)
}

/// Build the full RUS circuit for `model` at inverse temperature `beta`.
#[instrument(skip_all, fields(cliques = model.structure().num_cliques(), synthesizer = synthesizer.name()))]
pub fn assemble_rus<O: Operator>(
    model: &CliqueModel<O>,
    beta: f64,
    log_shift: &LogShift,
    synthesizer: &dyn UnitarySynthesizer,
) -> GibbsResult<RusCircuit> {
    let structure = model.structure();
    let n = structure.num_variables();
    let num_cliques = structure.num_cliques();
    let data = qubit_count(n)?;
    let width = qubit_count(n + num_cliques)?;

    let ln_z = log_shift.value(model.weights(), num_cliques);
    #[allow(clippy::cast_precision_loss)]
    let shift = ln_z / num_cliques as f64;

    let mut circuit = Circuit::with_size("rus", width, width);
    for q in 0..data {
        circuit.h(QubitId(q))?;
    }
    circuit.barrier_all()?;

    let coupling = CouplingMap::full(data + 1);
    let mut syntheses = Vec::with_capacity(num_cliques);
    for (i, factors) in model.factors().iter().enumerate() {
        let block = clique_block(i, factors, n, beta, shift)?;
        let lifted = conjugate_blocks(&block)?;
        let synthesis = synthesizer.synthesize(lifted.matrix(), data + 1, &coupling)?;
        if synthesis.converged {
            debug!(clique = i, gates = synthesis.circuit.size(), "clique synthesized");
        } else {
            warn!(
                clique = i,
                objective = synthesis.objective,
                iterations = synthesis.iterations,
                "synthesis did not converge"
            );
        }

        let ancilla = data + qubit_count(i)?;
        let mut wires: Vec<QubitId> = (0..data).map(QubitId).collect();
        wires.push(QubitId(ancilla));

        circuit.h(QubitId(ancilla))?;
        circuit.compose(&synthesis.circuit, &wires)?;
        circuit.h(QubitId(ancilla))?;
        circuit.measure(QubitId(ancilla), ClbitId(ancilla))?;
        circuit.barrier_all()?;
        syntheses.push(synthesis);
    }

    for q in 0..data {
        circuit.measure(QubitId(q), ClbitId(q))?;
    }

    debug!(
        qubits = circuit.num_qubits(),
        size = circuit.size(),
        depth = circuit.depth(),
        ln_z,
        "assembled RUS circuit"
    );
    Ok(RusCircuit {
        circuit,
        syntheses,
        log_shift: ln_z,
    })
}

fn qubit_count(count: usize) -> GibbsResult<u32> {
    u32::try_from(count).map_err(|_| GibbsError::Config(format!("{count} qubits is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CliqueStructure;
    use qgibbs_synth::{DiagonalSynthesizer, OpaqueSynthesizer};

    fn singleton() -> CliqueModel<DenseOperator> {
        let structure = CliqueStructure::new(vec![vec![0]]).unwrap();
        CliqueModel::build(&structure, &[-1.0, -2.0]).unwrap()
    }

    #[test]
    fn test_log_shift_parsing() {
        assert_eq!("none".parse::<LogShift>().unwrap(), LogShift::None);
        assert_eq!("max".parse::<LogShift>().unwrap(), LogShift::default());
        assert_eq!(
            "max:0.5".parse::<LogShift>().unwrap(),
            LogShift::MaxWeight { margin: 0.5 }
        );
        assert_eq!(
            "-1.25".parse::<LogShift>().unwrap(),
            LogShift::Fixed { value: -1.25 }
        );
        assert!("maximum".parse::<LogShift>().is_err());
        for shift in [LogShift::None, LogShift::Fixed { value: 2.0 }, LogShift::default()] {
            assert_eq!(shift.to_string().parse::<LogShift>().unwrap(), shift);
        }
    }

    #[test]
    fn test_max_weight_keeps_margin() {
        let shift = LogShift::MaxWeight { margin: 0.01 };
        let ln_z = shift.value([-3.0, -1.0, -2.0], 2);
        assert!((ln_z - 2.0 * (-0.5 + 0.01)).abs() < 1e-15);
        let w_max = 0.5 * -1.0 - ln_z / 2.0;
        assert!((w_max + 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_clique_block_is_diagonal_and_unimodular() {
        let model = singleton();
        let block = clique_block(0, &model.factors()[0], 1, 1.0, 0.0).unwrap();
        assert!(block.is_diagonal(1e-12));
        assert!(block.is_unitary(1e-12));
        // real part is exp(β·θ/2) per state
        assert!((block.diagonal()[0].re - (-0.5f64).exp()).abs() < 1e-12);
        assert!((block.diagonal()[1].re - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_nonnegative_weight_is_rejected() {
        let model = singleton();
        let err = clique_block(0, &model.factors()[0], 1, 1.0, -0.75).unwrap_err();
        assert!(matches!(
            err,
            GibbsError::NonNegativeWeight {
                clique: 0,
                assignment: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_circuit_layout() {
        let structure = CliqueStructure::chain(2);
        let weights: Vec<f64> = (0..8).map(|k| -0.2 * f64::from(k + 1)).collect();
        let model = CliqueModel::<DenseOperator>::build(&structure, &weights).unwrap();
        let rus = assemble_rus(&model, 1.0, &LogShift::default(), &DiagonalSynthesizer::new())
            .unwrap();

        assert_eq!(rus.circuit.num_qubits(), 5);
        assert_eq!(rus.circuit.num_clbits(), 5);
        assert_eq!(rus.syntheses.len(), 2);
        let ops = rus.circuit.count_ops();
        assert_eq!(ops.get("measure"), Some(&5));
        assert_eq!(ops.get("h"), Some(&(3 + 2 * 2)));
        assert_eq!(ops.get("barrier"), Some(&3));
    }

    #[test]
    fn test_opaque_synthesis_keeps_one_gate_per_clique() {
        let rus = assemble_rus(&singleton(), 1.0, &LogShift::None, &OpaqueSynthesizer).unwrap();
        assert_eq!(rus.circuit.count_ops().get("unitary"), Some(&1));
        assert_eq!(rus.log_shift, 0.0);
    }
}
