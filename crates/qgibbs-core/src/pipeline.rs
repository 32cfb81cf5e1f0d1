//! End-to-end experiments: build, compile, execute, compare.

use qgibbs_compile::transpile;
use qgibbs_hal::Backend;
use qgibbs_ir::Circuit;
use qgibbs_ops::DenseOperator;
use qgibbs_synth::Synthesis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::config::{GibbsConfig, SweepConfig};
use crate::error::GibbsResult;
use crate::model::{CliqueModel, CliqueStructure};
use crate::reference::ExactReference;
use crate::rus::assemble_rus;
use crate::stats::{ExperimentRecord, PostSelection, fidelity, kl_divergence, post_select};

/// Everything one experiment produced.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// The logged metrics.
    pub record: ExperimentRecord,
    /// The exact reference.
    pub reference: ExactReference,
    /// The post-selected empirical distribution.
    pub empirical: PostSelection,
    /// The circuit that was executed.
    pub circuit: Circuit,
    /// Per-clique synthesis reports.
    pub syntheses: Vec<Synthesis>,
    /// The resolved `lnZ` shift.
    pub log_shift: f64,
}

/// Run one experiment for `structure` with the given factor weights.
#[instrument(skip_all, fields(topology = %structure, shots = config.shots))]
pub fn run_experiment(
    structure: &CliqueStructure,
    weights: &[f64],
    config: &GibbsConfig,
    backend: &dyn Backend,
) -> GibbsResult<ExperimentOutcome> {
    config.validate()?;
    let model = CliqueModel::<DenseOperator>::build(structure, weights)?;
    let reference = ExactReference::compute(model.hamiltonian(), config.beta)?;

    let synthesizer = config.synthesizer();
    let rus = assemble_rus(&model, config.beta, &config.log_shift, synthesizer.as_ref())?;

    let circuit = if config.synthesizer.is_transpilable() {
        transpile(&rus.circuit, &config.basis()?, config.optimization_level)?
    } else {
        debug!("synthesizer output is opaque, skipping transpilation");
        rus.circuit
    };
    debug!(
        size = circuit.size(),
        depth = circuit.depth(),
        "compiled circuit"
    );

    let result = backend.validate_and_run(&circuit, config.shots)?;
    let shots = u64::from(config.shots);
    let empirical = post_select(
        &result.counts,
        structure.num_variables(),
        structure.num_cliques(),
        shots,
    )?;

    let (w_min, w_max) = model.weight_range();
    let record = ExperimentRecord {
        n: structure.num_variables(),
        d: structure.num_factors(),
        num_cliques: structure.num_cliques(),
        c_max: structure.max_clique_size(),
        fidelity: fidelity(&empirical.distribution, &reference.distribution),
        kl: kl_divergence(&reference.distribution, &empirical.distribution),
        success_rate: empirical.success_rate,
        num_gates: circuit.size(),
        depth: circuit.depth(),
        shots,
        w_min,
        w_max,
    };
    info!(
        fidelity = record.fidelity,
        kl = record.kl,
        success_rate = record.success_rate,
        gates = record.num_gates,
        depth = record.depth,
        "experiment finished"
    );

    Ok(ExperimentOutcome {
        record,
        reference,
        empirical,
        circuit,
        syntheses: rus.syntheses,
        log_shift: rus.log_shift,
    })
}

/// Run every topology `reps` times with fresh weights, handing each record
/// to `on_record` as soon as it exists.
///
/// The first error aborts the sweep.
#[instrument(skip_all, fields(runs = sweep.num_runs()))]
pub fn run_sweep<F>(
    sweep: &SweepConfig,
    backend: &dyn Backend,
    mut on_record: F,
) -> GibbsResult<Vec<ExperimentRecord>>
where
    F: FnMut(&ExperimentRecord) -> GibbsResult<()>,
{
    sweep.validate()?;
    let mut rng = match sweep.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut records = Vec::with_capacity(sweep.num_runs());
    for structure in &sweep.topologies {
        for rep in 0..sweep.reps {
            let weights = sweep.weights.draw(structure.num_factors(), &mut rng)?;
            debug!(topology = %structure, rep, "starting repetition");
            let outcome = run_experiment(structure, &weights, &sweep.gibbs, backend)?;
            on_record(&outcome.record)?;
            records.push(outcome.record);
        }
    }
    Ok(records)
}
