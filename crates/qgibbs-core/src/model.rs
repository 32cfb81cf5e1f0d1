//! Clique structures, weights and the indicator Hamiltonian.
//!
//! Variables are numbered `0..n`. Operators put variable 0 on the most
//! significant tensor factor, so data qubit `j` carries variable `n-1-j`
//! and basis index order equals lexicographic assignment order.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use qgibbs_ops::Operator;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GibbsError, GibbsResult};

/// An ordered list of cliques over contiguous variables `0..n`.
///
/// Serialized as a list of index lists, e.g. `[[0, 1], [1, 2]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct CliqueStructure {
    cliques: Vec<Vec<usize>>,
    num_variables: usize,
}

impl CliqueStructure {
    /// Validate and wrap a list of cliques.
    ///
    /// Every clique must be non-empty without repeated variables, and the
    /// variables used must be exactly `{0, …, n-1}`.
    pub fn new(cliques: Vec<Vec<usize>>) -> GibbsResult<Self> {
        if cliques.is_empty() {
            return Err(GibbsError::MalformedCliques(
                "at least one clique is required".into(),
            ));
        }

        let mut variables = BTreeSet::new();
        for (i, clique) in cliques.iter().enumerate() {
            if clique.is_empty() {
                return Err(GibbsError::MalformedCliques(format!("clique {i} is empty")));
            }
            let unique: BTreeSet<_> = clique.iter().copied().collect();
            if unique.len() != clique.len() {
                return Err(GibbsError::MalformedCliques(format!(
                    "clique {i} repeats a variable: {clique:?}"
                )));
            }
            variables.extend(unique);
        }

        let num_variables = variables.len();
        if let Some(&max) = variables.last() {
            if max + 1 != num_variables {
                return Err(GibbsError::MalformedCliques(format!(
                    "variables must be contiguous from 0, found {num_variables} distinct indices up to {max}"
                )));
            }
        }

        Ok(Self {
            cliques,
            num_variables,
        })
    }

    /// A path `[[0,1],[1,2],…]` with `edges` pairwise cliques; zero edges
    /// gives the single variable `[[0]]`.
    pub fn chain(edges: usize) -> Self {
        let cliques = if edges == 0 {
            vec![vec![0]]
        } else {
            (0..edges).map(|i| vec![i, i + 1]).collect()
        };
        Self {
            num_variables: edges + 1,
            cliques,
        }
    }

    /// The topologies of the reference experiment: `[[0]]` and the chains
    /// with one to three edges.
    pub fn default_sweep() -> Vec<Self> {
        (0..4).map(Self::chain).collect()
    }

    /// The cliques.
    pub fn cliques(&self) -> &[Vec<usize>] {
        &self.cliques
    }

    /// Number of variables `n`.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of cliques `|C|`.
    pub fn num_cliques(&self) -> usize {
        self.cliques.len()
    }

    /// Number of factors `d = Σ 2^{|C_i|}`.
    pub fn num_factors(&self) -> usize {
        self.cliques.iter().map(|c| 1usize << c.len()).sum()
    }

    /// Largest clique size `C_max`.
    pub fn max_clique_size(&self) -> usize {
        self.cliques.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl TryFrom<Vec<Vec<usize>>> for CliqueStructure {
    type Error = GibbsError;

    fn try_from(cliques: Vec<Vec<usize>>) -> GibbsResult<Self> {
        Self::new(cliques)
    }
}

impl From<CliqueStructure> for Vec<Vec<usize>> {
    fn from(structure: CliqueStructure) -> Self {
        structure.cliques
    }
}

/// `0,1/1,2` lists cliques separated by `/`.
impl fmt::Display for CliqueStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .cliques
            .iter()
            .map(|c| c.iter().map(ToString::to_string).collect::<Vec<_>>().join(","))
            .collect();
        f.write_str(&parts.join("/"))
    }
}

impl FromStr for CliqueStructure {
    type Err = GibbsError;

    fn from_str(s: &str) -> GibbsResult<Self> {
        let cliques = s
            .split('/')
            .map(|clique| {
                clique
                    .split(',')
                    .map(|v| {
                        v.trim().parse::<usize>().map_err(|e| {
                            GibbsError::MalformedCliques(format!("bad variable '{v}' in '{s}': {e}"))
                        })
                    })
                    .collect::<GibbsResult<Vec<_>>>()
            })
            .collect::<GibbsResult<Vec<_>>>()?;
        Self::new(cliques)
    }
}

/// The assignments of a clique of `size` variables in lexicographic order,
/// first variable most significant.
pub fn assignments(size: usize) -> impl Iterator<Item = Vec<bool>> {
    (0..1usize << size).map(move |k| (0..size).map(|j| k >> (size - 1 - j) & 1 == 1).collect())
}

/// The diagonal projector onto basis states whose restriction to `clique`
/// equals `assignment`.
pub fn indicator<O: Operator>(
    num_variables: usize,
    clique: &[usize],
    assignment: &[bool],
) -> GibbsResult<O> {
    let mut result = O::identity(0);
    for v in 0..num_variables {
        let factor = match clique.iter().position(|&c| c == v) {
            Some(k) => O::projector(assignment[k])?,
            None => O::identity(1),
        };
        result = result.tensor(&factor);
    }
    Ok(result)
}

/// How factor weights θ are chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightPolicy {
    /// `θ = -(k+1)` for the `k`-th factor overall.
    Sequence,
    /// Explicit weights in factor order.
    Fixed {
        /// One weight per factor.
        weights: Vec<f64>,
    },
    /// Independent uniform draws from `[low, high)`.
    Uniform {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self::Uniform {
            low: -5.0,
            high: -0.001,
        }
    }
}

impl WeightPolicy {
    /// Produce `count` weights.
    #[allow(clippy::cast_precision_loss)]
    pub fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> GibbsResult<Vec<f64>> {
        match self {
            Self::Sequence => Ok((0..count).map(|k| -((k + 1) as f64)).collect()),
            Self::Fixed { weights } => {
                if weights.len() != count {
                    return Err(GibbsError::InvalidWeights(format!(
                        "model has {count} factors but {} weights were given",
                        weights.len()
                    )));
                }
                Ok(weights.clone())
            }
            Self::Uniform { low, high } => {
                if !(low < high) || !low.is_finite() || !high.is_finite() {
                    return Err(GibbsError::InvalidWeights(format!(
                        "empty weight range [{low}, {high})"
                    )));
                }
                Ok((0..count).map(|_| rng.gen_range(*low..*high)).collect())
            }
        }
    }
}

/// One weighted indicator of a clique.
#[derive(Debug, Clone)]
pub struct Factor<O> {
    /// The assignment `y`, first clique variable first.
    pub assignment: Vec<bool>,
    /// The weight θ.
    pub weight: f64,
    /// The indicator `Φ_{C,y}`.
    pub indicator: O,
}

/// The Hamiltonian `H = Σ -θ·Φ` of a clique MRF with its factor lists.
#[derive(Debug, Clone)]
pub struct CliqueModel<O> {
    structure: CliqueStructure,
    hamiltonian: O,
    factors: Vec<Vec<Factor<O>>>,
}

impl<O: Operator> CliqueModel<O> {
    /// Build the model; `weights` are consumed in clique order, assignments
    /// in lexicographic order within each clique.
    pub fn build(structure: &CliqueStructure, weights: &[f64]) -> GibbsResult<Self> {
        let d = structure.num_factors();
        if weights.len() != d {
            return Err(GibbsError::InvalidWeights(format!(
                "model has {d} factors but {} weights were given",
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite()) {
            return Err(GibbsError::InvalidWeights(format!("weight {w} is not finite")));
        }

        let n = structure.num_variables();
        let mut next = weights.iter().copied();
        let mut hamiltonian: Option<O> = None;
        let mut factors = Vec::with_capacity(structure.num_cliques());
        for clique in structure.cliques() {
            let mut list = Vec::with_capacity(1 << clique.len());
            for (assignment, weight) in assignments(clique.len()).zip(next.by_ref()) {
                let indicator: O = indicator(n, clique, &assignment)?;
                let term = indicator.scale_real(-weight);
                hamiltonian = Some(match hamiltonian {
                    Some(h) => h.add(&term)?,
                    None => term,
                });
                list.push(Factor {
                    assignment,
                    weight,
                    indicator,
                });
            }
            factors.push(list);
        }

        let hamiltonian = hamiltonian
            .ok_or_else(|| GibbsError::MalformedCliques("model has no factors".into()))?;
        Ok(Self {
            structure: structure.clone(),
            hamiltonian,
            factors,
        })
    }

    /// The clique structure.
    pub fn structure(&self) -> &CliqueStructure {
        &self.structure
    }

    /// The Hamiltonian.
    pub fn hamiltonian(&self) -> &O {
        &self.hamiltonian
    }

    /// Factor lists, one per clique.
    pub fn factors(&self) -> &[Vec<Factor<O>>] {
        &self.factors
    }

    /// All weights in factor order.
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.factors.iter().flatten().map(|f| f.weight)
    }

    /// Smallest and largest weight.
    pub fn weight_range(&self) -> (f64, f64) {
        self.weights()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| {
                (lo.min(w), hi.max(w))
            })
    }
}
