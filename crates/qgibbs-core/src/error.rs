//! Error types for Gibbs-state preparation.

use thiserror::Error;

/// Errors produced while building, running or evaluating an experiment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GibbsError {
    /// The clique structure violates its invariants.
    #[error("Malformed clique structure: {0}")]
    MalformedCliques(String),

    /// The weights do not fit the model.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// The phase solver was called outside `(-1, 1)`.
    #[error("Phase factors need ey in (-1, 1), got {ey}")]
    PhaseDomain {
        /// The offending target value.
        ey: f64,
    },

    /// The two solved angles disagree.
    #[error("Phase factors disagree: phi1 = {phi1}, phi2 = {phi2}")]
    AngleMismatch {
        /// First angle.
        phi1: f64,
        /// Second angle.
        phi2: f64,
    },

    /// A shifted factor weight is not negative.
    #[error("Shifted weight w = {w} of clique {clique}, assignment {assignment} must be negative")]
    NonNegativeWeight {
        /// Clique index.
        clique: usize,
        /// Assignment index within the clique.
        assignment: usize,
        /// The shifted weight.
        w: f64,
    },

    /// Post-selection kept no shots.
    #[error("No shot out of {shots} measured every ancilla in |0⟩")]
    ZeroPostSelection {
        /// Number of shots executed.
        shots: u64,
    },

    /// A blocked construction needs a power-of-two count.
    #[error("{what} must be a power of two, got {count}")]
    NotPowerOfTwo {
        /// What was counted.
        what: &'static str,
        /// The count.
        count: usize,
    },

    /// A numerical routine produced an unusable value.
    #[error("Numerical failure: {0}")]
    Numerical(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Operator algebra error.
    #[error("Operator error: {0}")]
    Ops(#[from] qgibbs_ops::OpsError),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qgibbs_ir::IrError),

    /// Unitary synthesis error.
    #[error("Synthesis error: {0}")]
    Synth(#[from] qgibbs_synth::SynthError),

    /// Transpilation error.
    #[error("Compilation error: {0}")]
    Compile(#[from] qgibbs_compile::CompileError),

    /// Backend error.
    #[error("Backend error: {0}")]
    Hal(#[from] qgibbs_hal::HalError),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Gibbs-state preparation.
pub type GibbsResult<T> = Result<T, GibbsError>;
