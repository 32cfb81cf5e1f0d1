//! Approximate synthesis by optimizing a CNOT-unit network.

use std::f64::consts::TAU;

use ndarray::Array2;
use num_complex::Complex64;
use qgibbs_compile::CouplingMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::error::SynthResult;
use crate::network::{CnotNetwork, NetworkLayout};
use crate::optimizer::Adam;
use crate::synthesizer::{Synthesis, UnitarySynthesizer, validate_target};

/// Seed of the initial angles unless configured otherwise.
pub const DEFAULT_SEED: u64 = 134;

/// Fits a [`CnotNetwork`] to the target with [`Adam`].
///
/// Initial angles are drawn uniformly from `[0, 2π)` with a seeded
/// generator, so repeated calls on the same target give the same circuit.
#[derive(Debug, Clone)]
pub struct VariationalSynthesizer {
    /// CNOT placement.
    pub layout: NetworkLayout,
    /// Number of CNOT units; 0 selects the lower bound for the width.
    pub depth: usize,
    /// Seed for the initial angles.
    pub seed: u64,
    /// The optimizer.
    pub optimizer: Adam,
}

impl Default for VariationalSynthesizer {
    fn default() -> Self {
        Self {
            layout: NetworkLayout::Spin,
            depth: 0,
            seed: DEFAULT_SEED,
            optimizer: Adam::default(),
        }
    }
}

impl VariationalSynthesizer {
    /// Create a synthesizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CNOT layout.
    #[must_use]
    pub fn with_layout(mut self, layout: NetworkLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the number of CNOT units.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set the optimizer iteration cap.
    #[must_use]
    pub fn with_max_iter(mut self, maxiter: usize) -> Self {
        self.optimizer.max_steps = maxiter;
        self
    }

    /// Set the seed of the initial angles.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the optimizer.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: Adam) -> Self {
        self.optimizer = optimizer;
        self
    }
}

impl UnitarySynthesizer for VariationalSynthesizer {
    fn name(&self) -> &str {
        "variational"
    }

    #[instrument(skip(self, target, coupling), fields(layout = ?self.layout))]
    fn synthesize(
        &self,
        target: &Array2<Complex64>,
        num_qubits: u32,
        coupling: &CouplingMap,
    ) -> SynthResult<Synthesis> {
        validate_target(target, num_qubits, coupling)?;
        let network = CnotNetwork::new(num_qubits, self.layout, self.depth, coupling)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let initial: Vec<f64> = (0..network.num_params())
            .map(|_| rng.gen_range(0.0..TAU))
            .collect();

        // Shapes were checked above; evaluation errors are unreachable here.
        let result = self.optimizer.minimize(
            |params| {
                network
                    .cost_and_gradient(target, params)
                    .unwrap_or_else(|_| (f64::INFINITY, vec![0.0; params.len()]))
            },
            initial,
        );

        debug!(
            cnots = network.cnots().len(),
            params = network.num_params(),
            objective = result.value,
            iterations = result.steps,
            converged = result.converged,
            "variational synthesis finished"
        );

        Ok(Synthesis {
            circuit: network.to_circuit(&result.params)?,
            objective: result.value,
            converged: result.converged,
            iterations: result.steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hadamard() -> Array2<Complex64> {
        let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Array2::from_shape_vec((2, 2), vec![h, h, h, -h]).unwrap()
    }

    #[test]
    fn test_single_qubit_fit() {
        let synth = VariationalSynthesizer::new().with_max_iter(1000);
        let synthesis = synth.synthesize(&hadamard(), 1, &CouplingMap::full(1)).unwrap();
        assert!(synthesis.objective < 1e-2, "objective {}", synthesis.objective);
        assert_eq!(synthesis.circuit.count_ops().get("cx"), None);
        assert_eq!(synthesis.circuit.size(), 3);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let synth = VariationalSynthesizer::new().with_max_iter(20);
        let a = synth.synthesize(&hadamard(), 1, &CouplingMap::full(1)).unwrap();
        let b = synth.synthesize(&hadamard(), 1, &CouplingMap::full(1)).unwrap();
        assert_eq!(a.objective, b.objective);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_fixed_depth_network_shape() {
        let synth = VariationalSynthesizer::new().with_depth(3).with_max_iter(50);
        let full = CouplingMap::full(2);
        let mut target = Array2::<Complex64>::zeros((4, 4));
        for (i, phase) in [0.1, -0.4, 0.9, 0.3].into_iter().enumerate() {
            target[[i, i]] = Complex64::from_polar(1.0, phase);
        }
        let synthesis = synth.synthesize(&target, 2, &full).unwrap();

        let network = CnotNetwork::new(2, NetworkLayout::Spin, 3, &full).unwrap();
        assert_eq!(synthesis.circuit.num_two_qubit_gates(), network.cnots().len());
        assert!((0.0..=1.0).contains(&synthesis.objective));
        assert!(synthesis.iterations <= 50);
    }
}
