//! Diagnose command implementation.

use anyhow::{Context, Result};
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qgibbs_core::{CliqueStructure, Diagnostics, WeightPolicy, diagnose};

const TOLERANCE: f64 = 1e-8;

/// Execute the diagnose command.
pub fn execute(
    topology: &str,
    weights: Option<Vec<f64>>,
    seed: Option<u64>,
    beta: f64,
    json: bool,
) -> Result<()> {
    let structure: CliqueStructure = topology
        .parse()
        .with_context(|| format!("Invalid topology: '{topology}'"))?;
    let policy = weights.map_or_else(WeightPolicy::default, |weights| WeightPolicy::Fixed {
        weights,
    });
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let weights = policy.draw(structure.num_factors(), &mut rng)?;

    let diagnostics = diagnose(&structure, &weights, beta).context("Diagnostics failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        return Ok(());
    }

    println!(
        "{} Factorization errors for {} (n = {}, d = {}, beta = {beta})",
        style("→").cyan().bold(),
        style(structure.to_string()).green(),
        diagnostics.n,
        diagnostics.d
    );
    print_diagnostics(&diagnostics);
    Ok(())
}

fn verdict(error: f64, expect_exact: bool) -> console::StyledObject<&'static str> {
    match (error < TOLERANCE, expect_exact) {
        (true, true) => style("exact").green(),
        (false, false) => style("differs (expected)").dim(),
        (true, false) => style("exact").yellow(),
        (false, true) => style("MISMATCH").red().bold(),
    }
}

fn print_diagnostics(d: &Diagnostics) {
    let row = |name: &str, error: f64, expect_exact: bool| {
        println!(
            "  {name:<26} {:>12.3e}  {}",
            error,
            verdict(error, expect_exact)
        );
    };
    println!();
    row("real algebraic product", d.real_algebraic, true);
    row("complex product", d.unreal, false);
    row("RUS clique blocks", d.rus_blocks, true);
    match d.blocked {
        Some(error) => row("blocked operator", error, true),
        None => println!(
            "  {:<26} {:>12}  {}",
            "blocked operator",
            "-",
            style("skipped (needs 2^k factors)").dim()
        ),
    }
    row("sqrt encoding unitarity", d.sqrt_embedding_unitarity, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdicts() {
        assert_eq!(verdict(1e-12, true).to_string(), style("exact").green().to_string());
        assert_eq!(
            verdict(0.3, true).to_string(),
            style("MISMATCH").red().bold().to_string()
        );
    }

    #[test]
    fn test_execute_fixed_weights() {
        assert!(execute("0,1", Some(vec![-1.0, -2.0, -0.5, -3.0]), None, 1.0, true).is_ok());
        assert!(execute("0,1", Some(vec![-1.0]), None, 1.0, true).is_err());
        assert!(execute("0,5", None, Some(1), 1.0, true).is_err());
    }
}
