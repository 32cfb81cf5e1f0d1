//! Exact Gibbs distribution by matrix exponential.

use ndarray::Array2;
use num_complex::Complex64;
use qgibbs_ops::Operator;
use qgibbs_ops::expm::expm;

use crate::error::{GibbsError, GibbsResult};

/// `R0 = exp(-βH)` with its log-partition function and diagonal distribution.
#[derive(Debug, Clone)]
pub struct ExactReference {
    /// The unnormalized state `exp(-βH)`.
    pub matrix: Array2<Complex64>,
    /// `ln Tr R0`.
    pub log_partition: f64,
    /// `Q = diag(R0) / Tr R0`, indexed by basis state.
    pub distribution: Vec<f64>,
}

impl ExactReference {
    /// Exponentiate `-β·H` and normalize its diagonal.
    pub fn compute<O: Operator>(hamiltonian: &O, beta: f64) -> GibbsResult<Self> {
        let scaled = hamiltonian.to_matrix().mapv(|z| z * -beta);
        let matrix = expm(&scaled)?;

        let trace = matrix.diag().sum().re;
        if !(trace.is_finite() && trace > 0.0) {
            return Err(GibbsError::Numerical(format!(
                "partition function {trace} is not a positive finite number"
            )));
        }
        let log_partition = trace.ln();
        let z = log_partition.exp();
        let distribution = matrix.diag().iter().map(|e| e.re / z).collect();

        Ok(Self {
            matrix,
            log_partition,
            distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CliqueModel, CliqueStructure};
    use qgibbs_ops::DenseOperator;

    #[test]
    fn test_singleton_matches_two_state_gibbs() {
        let structure = CliqueStructure::new(vec![vec![0]]).unwrap();
        let model = CliqueModel::<DenseOperator>::build(&structure, &[-1.0, -2.0]).unwrap();
        let reference = ExactReference::compute(model.hamiltonian(), 1.0).unwrap();

        let (a, b) = ((-1.0f64).exp(), (-2.0f64).exp());
        assert!((reference.distribution[0] - a / (a + b)).abs() < 1e-9);
        assert!((reference.distribution[1] - b / (a + b)).abs() < 1e-9);
        assert!((reference.log_partition - (a + b).ln()).abs() < 1e-9);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let structure = CliqueStructure::chain(2);
        let weights: Vec<f64> = (0..8).map(|k| -0.3 * f64::from(k + 1)).collect();
        let model = CliqueModel::<DenseOperator>::build(&structure, &weights).unwrap();
        let reference = ExactReference::compute(model.hamiltonian(), 0.5).unwrap();
        assert_eq!(reference.distribution.len(), 8);
        let total: f64 = reference.distribution.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
