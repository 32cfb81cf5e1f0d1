//! Sweep command implementation.
//!
//! `qgibbs sweep [--config sweep.json] [--topology 0,1/1,2 ...] [--reps 10] [--output results.csv]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use qgibbs_core::{LogShift, SweepConfig, run_sweep};
use qgibbs_synth::SynthesizerKind;

use super::common::{check_max_iter, parse_basis, parse_topologies, simulator};
use crate::csv::CsvLog;

/// Options of the sweep command; each one overrides the config file.
#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// JSON file with sweep settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Clique structure, e.g. `0,1/1,2` (repeatable)
    #[arg(short, long = "topology")]
    pub topologies: Vec<String>,

    /// Repetitions per topology
    #[arg(short, long)]
    pub reps: Option<usize>,

    /// Shots per execution
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Inverse temperature
    #[arg(long)]
    pub beta: Option<f64>,

    /// Target gate basis, comma-separated
    #[arg(long)]
    pub basis: Option<String>,

    /// Optimization level (0-3)
    #[arg(long)]
    pub opt_level: Option<u8>,

    /// Clique-block synthesizer (diagonal, variational, opaque)
    #[arg(long)]
    pub synth: Option<SynthesizerKind>,

    /// Iteration cap of the variational synthesizer (only with `--synth variational`)
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Seed of the weight draws and the simulator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log-partition shift (none, max, max:<margin>, or a number)
    #[arg(long, allow_hyphen_values = true)]
    pub log_shift: Option<LogShift>,

    /// CSV output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SweepArgs {
    /// Layer the command-line options over the file (or default) settings.
    pub fn resolve(&self) -> Result<SweepConfig> {
        let mut sweep = match &self.config {
            Some(path) => SweepConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => SweepConfig::default(),
        };

        if !self.topologies.is_empty() {
            sweep.topologies = parse_topologies(&self.topologies)?;
        }
        if let Some(reps) = self.reps {
            sweep.reps = reps;
        }
        if let Some(seed) = self.seed {
            sweep.seed = Some(seed);
        }
        if let Some(output) = &self.output {
            sweep.output.clone_from(output);
        }

        let gibbs = &mut sweep.gibbs;
        if let Some(shots) = self.shots {
            gibbs.shots = shots;
        }
        if let Some(beta) = self.beta {
            gibbs.beta = beta;
        }
        if let Some(basis) = &self.basis {
            gibbs.basis_gates = parse_basis(basis);
        }
        if let Some(level) = self.opt_level {
            gibbs.optimization_level = level;
        }
        if let Some(synth) = self.synth {
            gibbs.synthesizer = synth;
        }
        if let Some(max_iter) = self.max_iter {
            gibbs.max_iter = max_iter;
        }
        check_max_iter(self.max_iter, gibbs.synthesizer);
        if let Some(log_shift) = self.log_shift {
            gibbs.log_shift = log_shift;
        }

        sweep.validate().context("Invalid sweep settings")?;
        Ok(sweep)
    }
}

/// Execute the sweep command.
pub fn execute(args: &SweepArgs) -> Result<()> {
    let sweep = args.resolve()?;
    let topologies: Vec<String> = sweep.topologies.iter().map(ToString::to_string).collect();

    println!(
        "{} Sweeping {} topologies x {} reps ({} shots, beta {}, synthesizer {})",
        style("→").cyan().bold(),
        sweep.topologies.len(),
        sweep.reps,
        sweep.gibbs.shots,
        sweep.gibbs.beta,
        style(sweep.gibbs.synthesizer).yellow()
    );
    println!("  Topologies: {}", style(topologies.join("  ")).green());
    println!("  Output:     {}", style(sweep.output.display()).green());
    info!(?sweep, "resolved sweep settings");

    let mut log = CsvLog::create(&sweep.output)
        .with_context(|| format!("Failed to create {}", sweep.output.display()))?;

    let bar = ProgressBar::new(sweep.num_runs() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("=> "),
    );

    let backend = simulator(sweep.seed);
    let result = run_sweep(&sweep, &backend, |record| {
        log.append(record)?;
        bar.set_message(format!(
            "n={} F={:.4} KL={:.2e}",
            record.n, record.fidelity, record.kl
        ));
        bar.inc(1);
        Ok(())
    });
    bar.finish_and_clear();
    let records = result.with_context(|| {
        format!(
            "Sweep aborted after {} of {} runs",
            log.rows(),
            sweep.num_runs()
        )
    })?;

    println!(
        "\n  {:>2} {:>3} {:>7} {:>10} {:>10} {:>8} {:>7} {:>6}",
        "n", "d", "cliques", "fidelity", "KL", "success", "gates", "depth"
    );
    for r in &records {
        println!(
            "  {:>2} {:>3} {:>7} {:>10.6} {:>10.3e} {:>8.4} {:>7} {:>6}",
            r.n, r.d, r.num_cliques, r.fidelity, r.kl, r.success_rate, r.num_gates, r.depth
        );
    }

    println!(
        "\n{} Wrote {} rows to {}",
        style("✓").green().bold(),
        log.rows(),
        style(sweep.output.display()).green()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_experiment() {
        let sweep = SweepArgs::default().resolve().unwrap();
        assert_eq!(sweep, SweepConfig::default());
        assert_eq!(sweep.num_runs(), 40);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.json");
        std::fs::write(&path, r#"{ "reps": 3, "shots": 500, "beta": 0.5 }"#).unwrap();

        let args = SweepArgs {
            config: Some(path),
            topologies: vec!["0,1".into()],
            shots: Some(1000),
            log_shift: Some(LogShift::None),
            ..SweepArgs::default()
        };
        let sweep = args.resolve().unwrap();
        assert_eq!(sweep.reps, 3);
        assert_eq!(sweep.gibbs.shots, 1000);
        assert_eq!(sweep.gibbs.beta, 0.5);
        assert_eq!(sweep.gibbs.log_shift, LogShift::None);
        assert_eq!(sweep.topologies.len(), 1);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = SweepArgs {
            opt_level: Some(7),
            ..SweepArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
