//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use console::style;
use tracing::warn;

use qgibbs_adapter_sim::SimulatorBackend;
use qgibbs_core::{CliqueStructure, ExperimentRecord};
use qgibbs_synth::SynthesizerKind;

/// Parse `--topology` values such as `0,1/1,2`.
pub fn parse_topologies(specs: &[String]) -> Result<Vec<CliqueStructure>> {
    specs
        .iter()
        .map(|text| {
            text.parse::<CliqueStructure>()
                .with_context(|| format!("Invalid topology: '{text}'"))
        })
        .collect()
}

/// Parse a comma-separated weight list.
pub fn parse_weights(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|w| {
            w.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid weight '{w}' in '{text}'"))
        })
        .collect()
}

/// Split a comma-separated gate list.
pub fn parse_basis(text: &str) -> Vec<String> {
    text.split(',')
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

/// Warn when `--max-iter` is set for a synthesizer that never iterates.
/// Returns whether the cap is ignored.
pub fn check_max_iter(max_iter: Option<usize>, synth: SynthesizerKind) -> bool {
    let ignored = max_iter.is_some() && synth != SynthesizerKind::Variational;
    if ignored {
        warn!(synthesizer = %synth, "--max-iter only applies to --synth variational; ignoring it");
    }
    ignored
}

/// The local simulator, seeded when a seed is given.
pub fn simulator(seed: Option<u64>) -> SimulatorBackend {
    match seed {
        Some(seed) => SimulatorBackend::with_seed(seed),
        None => SimulatorBackend::new(),
    }
}

/// Label of basis index `i` as the assignment of variables `0..n`.
pub fn assignment_label(index: usize, num_variables: usize) -> String {
    format!("{index:0num_variables$b}")
}

/// Print the exact and sampled distributions side by side.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn print_distributions(reference: &[f64], empirical: &[f64], num_variables: usize) {
    println!(
        "\n  {:<width$}  {:>9}  {:>9}",
        style("x").bold(),
        style("Q (exact)").bold(),
        style("P (RUS)").bold(),
        width = num_variables.max(1)
    );
    for (i, (q, p)) in reference.iter().zip(empirical).enumerate() {
        let bar = "█".repeat((p * 40.0).round() as usize);
        println!(
            "  {}  {:>9.5}  {:>9.5} {}",
            style(assignment_label(i, num_variables)).cyan(),
            q,
            p,
            style(bar).green()
        );
    }
}

/// Print the metrics of one record.
pub fn print_record(record: &ExperimentRecord) {
    println!(
        "\n  n = {}, d = {}, cliques = {}, C_max = {}",
        record.n, record.d, record.num_cliques, record.c_max
    );
    println!("  Fidelity:     {}", style(format!("{:.6}", record.fidelity)).yellow());
    println!("  KL(Q, P):     {}", style(format!("{:.3e}", record.kl)).yellow());
    println!(
        "  Success rate: {}",
        style(format!("{:.4}", record.success_rate)).yellow()
    );
    println!(
        "  Circuit:      {} instructions, depth {}",
        record.num_gates, record.depth
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topologies() {
        let parsed = parse_topologies(&["0".into(), "0,1/1,2".into()]).unwrap();
        assert_eq!(parsed[0].num_variables(), 1);
        assert_eq!(parsed[1].num_cliques(), 2);
        assert!(parse_topologies(&["0,3".into()]).is_err());
    }

    #[test]
    fn test_parse_weights() {
        assert_eq!(parse_weights("-1, -2.5").unwrap(), vec![-1.0, -2.5]);
        assert!(parse_weights("-1,abc").is_err());
    }

    #[test]
    fn test_parse_basis() {
        assert_eq!(parse_basis("cx, rz,,sx"), vec!["cx", "rz", "sx"]);
    }

    #[test]
    fn test_max_iter_is_flagged_unless_variational() {
        assert!(check_max_iter(Some(50), SynthesizerKind::Diagonal));
        assert!(check_max_iter(Some(50), SynthesizerKind::Opaque));
        assert!(!check_max_iter(Some(50), SynthesizerKind::Variational));
        assert!(!check_max_iter(None, SynthesizerKind::Diagonal));
    }

    #[test]
    fn test_assignment_label_puts_first_variable_left() {
        assert_eq!(assignment_label(2, 2), "10");
        assert_eq!(assignment_label(1, 3), "001");
    }
}
