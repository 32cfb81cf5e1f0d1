//! qgibbs command-line interface.
//!
//! Samples Gibbs distributions of clique Markov random fields with
//! repeat-until-success circuits and compares them with exact references.
//!
//! ```text
//! qgibbs validate --topology 0,1/1,2 --shots 100000
//! qgibbs sweep --reps 10 --output results_experiment_aqc.csv
//! qgibbs diagnose --topology 0,1 --weights=-1,-2,-3,-4
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod csv;

use commands::common::parse_weights;
use commands::sweep::SweepArgs;
use commands::validate::ValidateArgs;
use commands::{diagnose, sweep, validate};

/// qgibbs - quantum Gibbs sampling of clique MRFs
#[derive(Parser)]
#[command(name = "qgibbs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample one model and compare with its exact Gibbs distribution
    Validate(ValidateArgs),

    /// Run repeated experiments over topologies and log them as CSV
    Sweep(SweepArgs),

    /// Check the factorizations of exp(-βH) without sampling
    Diagnose {
        /// Clique structure, e.g. `0,1/1,2`
        #[arg(short, long, default_value = "0,1")]
        topology: String,

        /// Comma-separated factor weights (random when omitted)
        #[arg(short, long, allow_hyphen_values = true)]
        weights: Option<String>,

        /// Seed of the random weights
        #[arg(long)]
        seed: Option<u64>,

        /// Inverse temperature
        #[arg(long, default_value = "1.0")]
        beta: f64,

        /// Print the diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => validate::execute(&args),

        Commands::Sweep(args) => sweep::execute(&args),

        Commands::Diagnose {
            topology,
            weights,
            seed,
            beta,
            json,
        } => weights
            .as_deref()
            .map(parse_weights)
            .transpose()
            .and_then(|weights| diagnose::execute(&topology, weights, seed, beta, json)),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use qgibbs_core::LogShift;
    use qgibbs_synth::SynthesizerKind;

    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_arguments() {
        let cli = Cli::try_parse_from([
            "qgibbs",
            "-vv",
            "validate",
            "--topology",
            "0,1/1,2",
            "--weights",
            "-1,-2,-3,-4,-5,-6,-7,-8",
            "--log-shift",
            "none",
            "--synth",
            "variational",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.topology, "0,1/1,2");
        assert_eq!(args.weights.as_deref(), Some("-1,-2,-3,-4,-5,-6,-7,-8"));
        assert_eq!(args.log_shift, LogShift::None);
        assert_eq!(args.synth, SynthesizerKind::Variational);
        assert_eq!(args.shots, 100_000);
    }

    #[test]
    fn test_sweep_arguments() {
        let cli = Cli::try_parse_from([
            "qgibbs", "sweep", "-t", "0", "-t", "0,1", "--reps", "2", "--log-shift", "-0.5",
        ])
        .unwrap();
        let Commands::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.topologies, vec!["0", "0,1"]);
        assert_eq!(args.reps, Some(2));
        assert_eq!(args.log_shift, Some(LogShift::Fixed { value: -0.5 }));
    }

    #[test]
    fn test_rejects_unknown_synthesizer() {
        assert!(Cli::try_parse_from(["qgibbs", "validate", "--synth", "qiskit"]).is_err());
    }
}
