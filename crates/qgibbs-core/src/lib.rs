//! Gibbs-state preparation of clique Markov random fields.
//!
//! A binary MRF with clique structure `C` and factor weights `θ_{C,y}` has
//! Hamiltonian `H = Σ -θ·Φ_{C,y}`, where `Φ_{C,y}` is the diagonal indicator
//! of the clique assignment `y`. This crate encodes `exp(-βH)` into a
//! repeat-until-success circuit with one ancilla per clique and checks the
//! sampled distribution against the exact one.
//!
//! The pieces, bottom-up:
//!
//! - [`model`]: clique structures, weight policies, indicators and `H`
//! - [`phase`]: rotation angles with `cos 2φ = e^{βw}`
//! - [`encoding`]: `X⊗(I-Φ) + Z⊗Φ` and the conjugate-block lift
//! - [`power`]: the factor unitary `(Rz·U)²`
//! - [`rus`]: per-clique blocks, synthesis and circuit assembly
//! - [`reference`]: `exp(-βH)` and its diagonal distribution
//! - [`stats`]: post-selection, fidelity and KL divergence
//! - [`algebraic`]: matrix-level checks of the factorization
//! - [`pipeline`]: single experiments and sweeps
//!
//! # Example
//!
//! ```rust
//! use qgibbs_adapter_sim::SimulatorBackend;
//! use qgibbs_core::{CliqueStructure, GibbsConfig, run_experiment};
//!
//! let structure: CliqueStructure = "0".parse().unwrap();
//! let config = GibbsConfig {
//!     shots: 20_000,
//!     ..GibbsConfig::default()
//! };
//! let backend = SimulatorBackend::with_seed(7);
//!
//! let outcome = run_experiment(&structure, &[-1.0, -2.0], &config, &backend).unwrap();
//! assert!(outcome.record.fidelity > 0.99);
//! assert!(outcome.record.success_rate > 0.5);
//! ```

pub mod algebraic;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod phase;
pub mod pipeline;
pub mod power;
pub mod reference;
pub mod rus;
pub mod stats;

pub use algebraic::{Diagnostics, diagnose};
pub use config::{GibbsConfig, SweepConfig};
pub use error::{GibbsError, GibbsResult};
pub use model::{CliqueModel, CliqueStructure, Factor, WeightPolicy};
pub use phase::{PhaseFactors, gen_phase_factors};
pub use pipeline::{ExperimentOutcome, run_experiment, run_sweep};
pub use reference::ExactReference;
pub use rus::{LogShift, RusCircuit, assemble_rus};
pub use stats::{ExperimentRecord, PostSelection, fidelity, kl_divergence, post_select};
