//! Post-selection and distribution metrics.

use qgibbs_hal::Counts;
use serde::{Deserialize, Serialize};

use crate::error::{GibbsError, GibbsResult};

/// Bhattacharyya fidelity `(Σ √(p·q))²`.
pub fn fidelity(p: &[f64], q: &[f64]) -> f64 {
    let overlap: f64 = p.iter().zip(q).map(|(a, b)| (a * b).sqrt()).sum();
    overlap * overlap
}

/// Kullback–Leibler divergence `Σ p·ln(p/q)`.
///
/// Terms where either probability is zero are skipped, so the result stays
/// finite when `q` misses part of the support of `p`.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|&(&a, &b)| a > 0.0 && b > 0.0)
        .map(|(a, b)| a * (a / b).ln())
        .sum()
}

/// The data distribution conditioned on every ancilla reading 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSelection {
    /// Normalized distribution over data basis states.
    pub distribution: Vec<f64>,
    /// Shots that passed.
    pub accepted: u64,
    /// `accepted / shots`.
    pub success_rate: f64,
}

/// Keep the shots whose ancilla bits `n..n+num_ancillas` are all `0` and
/// histogram their data bits.
///
/// Data bit `j` contributes `2^j` to the basis index.
#[allow(clippy::cast_precision_loss)]
pub fn post_select(
    counts: &Counts,
    num_data: usize,
    num_ancillas: usize,
    shots: u64,
) -> GibbsResult<PostSelection> {
    let width = num_data + num_ancillas;
    let mut histogram = vec![0u64; 1 << num_data];

    for (bits, &count) in counts.iter() {
        let bits = bits.as_bytes();
        if bits.len() != width {
            return Err(GibbsError::Numerical(format!(
                "outcome of width {} does not match {width} classical bits",
                bits.len()
            )));
        }
        if bits[num_data..].iter().any(|&b| b != b'0') {
            continue;
        }
        let index = bits[..num_data]
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == b'1')
            .fold(0usize, |acc, (j, _)| acc | 1 << j);
        histogram[index] += count;
    }

    let accepted: u64 = histogram.iter().sum();
    if accepted == 0 {
        return Err(GibbsError::ZeroPostSelection { shots });
    }
    Ok(PostSelection {
        distribution: histogram
            .iter()
            .map(|&c| c as f64 / accepted as f64)
            .collect(),
        accepted,
        success_rate: accepted as f64 / shots as f64,
    })
}

/// One row of the experiment log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Number of variables.
    pub n: usize,
    /// Number of factors.
    pub d: usize,
    /// Number of cliques.
    pub num_cliques: usize,
    /// Largest clique size.
    #[serde(rename = "C_max")]
    pub c_max: usize,
    /// `F(P, Q)`.
    pub fidelity: f64,
    /// `KL(Q, P)` with the exact distribution first.
    #[serde(rename = "KL")]
    pub kl: f64,
    /// Fraction of shots kept by post-selection.
    pub success_rate: f64,
    /// Instructions in the executed circuit.
    pub num_gates: usize,
    /// Depth of the executed circuit.
    pub depth: usize,
    /// Shots requested.
    pub shots: u64,
    /// Smallest raw weight.
    pub w_min: f64,
    /// Largest raw weight.
    pub w_max: f64,
}

impl ExperimentRecord {
    /// Column names in log order.
    pub const HEADER: [&'static str; 12] = [
        "n",
        "d",
        "num_cliques",
        "C_max",
        "fidelity",
        "KL",
        "success_rate",
        "num_gates",
        "depth",
        "shots",
        "w_min",
        "w_max",
    ];

    /// Field values in log order.
    pub fn fields(&self) -> [String; 12] {
        [
            self.n.to_string(),
            self.d.to_string(),
            self.num_cliques.to_string(),
            self.c_max.to_string(),
            self.fidelity.to_string(),
            self.kl.to_string(),
            self.success_rate.to_string(),
            self.num_gates.to_string(),
            self.depth.to_string(),
            self.shots.to_string(),
            self.w_min.to_string(),
            self.w_max.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalize(raw: Vec<f64>) -> Vec<f64> {
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|x| x / total).collect()
    }

    #[test]
    fn test_identical_distributions() {
        let p = [0.1, 0.2, 0.7];
        assert!((fidelity(&p, &p) - 1.0).abs() < 1e-15);
        assert_eq!(kl_divergence(&p, &p), 0.0);
    }

    #[test]
    fn test_kl_skips_zero_terms() {
        assert_eq!(kl_divergence(&[0.5, 0.5], &[1.0, 0.0]), 0.5 * 0.5f64.ln());
        assert_eq!(kl_divergence(&[0.0, 1.0], &[0.5, 0.5]), 2.0f64.ln());
    }

    #[test]
    fn test_post_selection_discards_nonzero_ancillas() {
        // two data bits then one ancilla
        let counts: Counts = [
            ("000".to_string(), 10),
            ("100".to_string(), 20),
            ("010".to_string(), 30),
            ("111".to_string(), 40),
        ]
        .into_iter()
        .collect();
        let selected = post_select(&counts, 2, 1, 100).unwrap();
        assert_eq!(selected.accepted, 60);
        assert_eq!(selected.distribution, vec![10.0 / 60.0, 20.0 / 60.0, 0.5, 0.0]);
        assert!((selected.success_rate - 0.6).abs() < 1e-15);
    }

    #[test]
    fn test_zero_post_selection_is_an_error() {
        let counts: Counts = [("01".to_string(), 5)].into_iter().collect();
        let err = post_select(&counts, 1, 1, 5).unwrap_err();
        assert!(matches!(err, GibbsError::ZeroPostSelection { shots: 5 }));
    }

    #[test]
    fn test_record_columns() {
        let record = ExperimentRecord {
            n: 1,
            d: 2,
            num_cliques: 1,
            c_max: 1,
            fidelity: 0.99,
            kl: 0.001,
            success_rate: 0.7,
            num_gates: 12,
            depth: 8,
            shots: 1000,
            w_min: -2.0,
            w_max: -1.0,
        };
        assert_eq!(record.fields()[3], "1");
        assert_eq!(record.fields()[10], "-2");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("C_max").is_some());
        assert!(json.get("KL").is_some());
    }

    proptest! {
        #[test]
        fn fidelity_is_symmetric(
            raw in prop::collection::vec((0.01f64..1.0, 0.01f64..1.0), 1..16)
        ) {
            let (a, b): (Vec<f64>, Vec<f64>) = raw.into_iter().unzip();
            let (p, q) = (normalize(a), normalize(b));
            prop_assert!((fidelity(&p, &q) - fidelity(&q, &p)).abs() < 1e-12);
            prop_assert!(fidelity(&p, &q) <= 1.0 + 1e-12);
            prop_assert!(kl_divergence(&p, &q) >= -1e-12);
        }
    }
}
