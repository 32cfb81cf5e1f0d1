//! Experiment configuration.
//!
//! [`GibbsConfig`] holds everything one experiment needs besides the model;
//! [`SweepConfig`] adds the topologies and repetitions of a sweep. Both load
//! from JSON with every field optional:
//!
//! ```json
//! {
//!   "topologies": [[[0]], [[0, 1], [1, 2]]],
//!   "reps": 3,
//!   "shots": 100000,
//!   "log_shift": { "kind": "max_weight", "margin": 0.001 }
//! }
//! ```

use std::path::{Path, PathBuf};

use qgibbs_compile::BasisGates;
use qgibbs_synth::{
    Adam, DiagonalSynthesizer, NetworkLayout, OpaqueSynthesizer, SynthesizerKind,
    UnitarySynthesizer, VariationalSynthesizer,
};
use serde::{Deserialize, Serialize};

use crate::error::{GibbsError, GibbsResult};
use crate::model::{CliqueStructure, WeightPolicy};
use crate::rus::LogShift;

fn default_beta() -> f64 {
    1.0
}

fn default_shots() -> u32 {
    1_000_000
}

fn default_basis_gates() -> Vec<String> {
    BasisGates::ibm().gates().to_vec()
}

fn default_optimization_level() -> u8 {
    3
}

fn default_max_iter() -> usize {
    200
}

fn default_synth_seed() -> u64 {
    qgibbs_synth::variational::DEFAULT_SEED
}

fn default_reps() -> usize {
    10
}

fn default_output() -> PathBuf {
    PathBuf::from("results_experiment_aqc.csv")
}

/// Settings of a single experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GibbsConfig {
    /// Inverse temperature β.
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Log-partition shift applied to the factor weights.
    #[serde(default)]
    pub log_shift: LogShift,

    /// Shots per execution.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Target gate basis.
    #[serde(default = "default_basis_gates")]
    pub basis_gates: Vec<String>,

    /// Compiler optimization level (0-3).
    #[serde(default = "default_optimization_level")]
    pub optimization_level: u8,

    /// Clique-block synthesizer.
    #[serde(default)]
    pub synthesizer: SynthesizerKind,

    /// Iteration cap of the variational synthesizer.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Seed of the variational synthesizer's initial angles.
    #[serde(default = "default_synth_seed")]
    pub synth_seed: u64,

    /// CNOT layout of the variational synthesizer.
    #[serde(default)]
    pub network_layout: NetworkLayout,
}

impl Default for GibbsConfig {
    fn default() -> Self {
        Self {
            beta: default_beta(),
            log_shift: LogShift::default(),
            shots: default_shots(),
            basis_gates: default_basis_gates(),
            optimization_level: default_optimization_level(),
            synthesizer: SynthesizerKind::default(),
            max_iter: default_max_iter(),
            synth_seed: default_synth_seed(),
            network_layout: NetworkLayout::default(),
        }
    }
}

impl GibbsConfig {
    /// Reject values no experiment can run with.
    pub fn validate(&self) -> GibbsResult<()> {
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(GibbsError::Config(format!(
                "beta must be positive and finite, got {}",
                self.beta
            )));
        }
        if self.shots == 0 {
            return Err(GibbsError::Config("shots must be at least 1".into()));
        }
        if self.optimization_level > 3 {
            return Err(GibbsError::Config(format!(
                "optimization level must be 0-3, got {}",
                self.optimization_level
            )));
        }
        if let LogShift::MaxWeight { margin } = self.log_shift {
            if !(margin > 0.0) {
                return Err(GibbsError::Config(format!(
                    "log shift margin must be positive, got {margin}"
                )));
            }
        }
        self.basis()?;
        Ok(())
    }

    /// The configured gate basis.
    pub fn basis(&self) -> GibbsResult<BasisGates> {
        Ok(BasisGates::from_names(&self.basis_gates)?)
    }

    /// Instantiate the configured synthesizer.
    pub fn synthesizer(&self) -> Box<dyn UnitarySynthesizer> {
        match self.synthesizer {
            SynthesizerKind::Diagonal => Box::new(DiagonalSynthesizer::new()),
            SynthesizerKind::Variational => Box::new(
                VariationalSynthesizer::new()
                    .with_layout(self.network_layout)
                    .with_seed(self.synth_seed)
                    .with_optimizer(Adam::new().max_steps(self.max_iter)),
            ),
            SynthesizerKind::Opaque => Box::new(OpaqueSynthesizer),
        }
    }
}

/// Settings of a sweep over topologies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Clique structures, each run `reps` times.
    #[serde(default = "CliqueStructure::default_sweep")]
    pub topologies: Vec<CliqueStructure>,

    /// Repetitions per topology.
    #[serde(default = "default_reps")]
    pub reps: usize,

    /// Seed of the weight generator; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// How weights are drawn for every repetition.
    #[serde(default)]
    pub weights: WeightPolicy,

    /// CSV log path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Per-experiment settings.
    #[serde(flatten)]
    pub gibbs: GibbsConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            topologies: CliqueStructure::default_sweep(),
            reps: default_reps(),
            seed: None,
            weights: WeightPolicy::default(),
            output: default_output(),
            gibbs: GibbsConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> GibbsResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty sweeps and invalid experiment settings.
    pub fn validate(&self) -> GibbsResult<()> {
        if self.topologies.is_empty() {
            return Err(GibbsError::Config("sweep has no topologies".into()));
        }
        if self.reps == 0 {
            return Err(GibbsError::Config("reps must be at least 1".into()));
        }
        self.gibbs.validate()
    }

    /// Total number of experiments.
    pub fn num_runs(&self) -> usize {
        self.topologies.len() * self.reps
    }
}
