//! Validate command implementation.
//!
//! Runs one experiment and compares the post-selected samples with the
//! exact Gibbs distribution.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use qgibbs_core::{CliqueStructure, GibbsConfig, LogShift, WeightPolicy, run_experiment};
use qgibbs_synth::SynthesizerKind;

use super::common::{
    check_max_iter, parse_basis, parse_weights, print_distributions, print_record, simulator,
};

/// Options of the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Clique structure, e.g. `0,1/1,2`
    #[arg(short, long, default_value = "0")]
    pub topology: String,

    /// Comma-separated factor weights (default -1, -2, ...)
    #[arg(short, long, allow_hyphen_values = true)]
    pub weights: Option<String>,

    /// Shots per execution
    #[arg(short, long, default_value = "100000")]
    pub shots: u32,

    /// Inverse temperature
    #[arg(long, default_value = "1.0")]
    pub beta: f64,

    /// Seed of the simulator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Clique-block synthesizer (diagonal, variational, opaque)
    #[arg(long, default_value = "diagonal")]
    pub synth: SynthesizerKind,

    /// Iteration cap of the variational synthesizer (only with `--synth variational`)
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Log-partition shift (none, max, max:<margin>, or a number)
    #[arg(long, default_value = "max", allow_hyphen_values = true)]
    pub log_shift: LogShift,

    /// Target gate basis, comma-separated
    #[arg(long)]
    pub basis: Option<String>,

    /// Optimization level (0-3)
    #[arg(short = 'O', long, default_value = "3")]
    pub opt_level: u8,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    /// Experiment settings with the command-line options applied.
    pub fn config(&self) -> Result<GibbsConfig> {
        let mut config = GibbsConfig {
            beta: self.beta,
            log_shift: self.log_shift,
            shots: self.shots,
            optimization_level: self.opt_level,
            synthesizer: self.synth,
            ..GibbsConfig::default()
        };
        if let Some(max_iter) = self.max_iter {
            config.max_iter = max_iter;
        }
        check_max_iter(self.max_iter, config.synthesizer);
        if let Some(basis) = &self.basis {
            config.basis_gates = parse_basis(basis);
        }
        config.validate().context("Invalid settings")?;
        Ok(config)
    }
}

/// Execute the validate command.
pub fn execute(args: &ValidateArgs) -> Result<()> {
    let config = args.config()?;
    let json = args.json;
    let structure: CliqueStructure = args
        .topology
        .parse()
        .with_context(|| format!("Invalid topology: '{}'", args.topology))?;
    let policy = match &args.weights {
        Some(text) => WeightPolicy::Fixed {
            weights: parse_weights(text)?,
        },
        None => WeightPolicy::Sequence,
    };
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or_default());
    let weights = policy.draw(structure.num_factors(), &mut rng)?;

    if !json {
        println!(
            "{} Validating {} ({} variables, {} factors, {} shots, synthesizer {})",
            style("→").cyan().bold(),
            style(structure.to_string()).green(),
            structure.num_variables(),
            structure.num_factors(),
            config.shots,
            style(config.synthesizer).yellow()
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress template")?,
    );
    spinner.set_message("Assembling, compiling and sampling...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let backend = simulator(args.seed);
    let result = run_experiment(&structure, &weights, &config, &backend);
    spinner.finish_and_clear();
    let outcome = result.context("Experiment failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.record)?);
        return Ok(());
    }

    print_distributions(
        &outcome.reference.distribution,
        &outcome.empirical.distribution,
        structure.num_variables(),
    );
    print_record(&outcome.record);
    println!("  lnZ shift:    {:.6}", outcome.log_shift);
    for (i, synthesis) in outcome.syntheses.iter().enumerate() {
        if !synthesis.converged {
            println!(
                "  {} clique {i} synthesis did not converge (objective {:.3e})",
                style("!").yellow().bold(),
                synthesis.objective
            );
        }
    }
    println!("\n{} Done", style("✓").green().bold());
    Ok(())
}
