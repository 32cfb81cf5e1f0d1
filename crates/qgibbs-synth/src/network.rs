//! Parameterized CNOT-unit networks.
//!
//! A network on `q` qubits starts with an `Rz·Ry·Rz` layer on every qubit,
//! followed by CNOT units. The unit on `(c, t)` is
//!
//! ```text
//! c: ──■── Ry ── Rz ──
//!      │
//! t: ──X── Ry ── Rx ──
//! ```
//!
//! so a network with `L` units has `3q + 4L` angles. The matrices are
//! evaluated directly on dense `2^q × 2^q` arrays, with the analytic gradient
//! of the Hilbert–Schmidt cost computed in a single backward sweep.

use ndarray::Array2;
use num_complex::Complex64;
use qgibbs_compile::CouplingMap;
use qgibbs_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

type Matrix2 = [[Complex64; 2]; 2];

/// How CNOT units are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkLayout {
    /// Alternating even and odd nearest-neighbour pairs.
    #[default]
    Spin,
    /// Every coupled pair `(i, j)`, `i < j`, in lexicographic order.
    Sequential,
}

/// Rotation axis of a parameterized gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One element of a network, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// `R_axis(params[param])` on `qubit`.
    Rotation {
        axis: Axis,
        qubit: u32,
        param: usize,
    },
    /// A fixed CNOT.
    Cx { control: u32, target: u32 },
}

/// A CNOT-unit ansatz on a fixed number of qubits.
#[derive(Debug, Clone)]
pub struct CnotNetwork {
    num_qubits: u32,
    cnots: Vec<(u32, u32)>,
    elements: Vec<Element>,
    num_params: usize,
}

impl CnotNetwork {
    /// Build a network with `depth` CNOT units; depth 0 selects
    /// [`lower_bound_depth`](Self::lower_bound_depth).
    pub fn new(
        num_qubits: u32,
        layout: NetworkLayout,
        depth: usize,
        coupling: &CouplingMap,
    ) -> SynthResult<Self> {
        if num_qubits == 0 {
            return Err(SynthError::InvalidConfig(
                "a network needs at least one qubit".into(),
            ));
        }
        let depth = if depth == 0 {
            Self::lower_bound_depth(num_qubits)
        } else {
            depth
        };

        let pattern = match layout {
            NetworkLayout::Spin => spin_pairs(num_qubits),
            NetworkLayout::Sequential => sequential_pairs(num_qubits, coupling),
        };
        if depth > 0 && pattern.is_empty() {
            return Err(SynthError::InvalidConfig(format!(
                "no CNOT pairs available for {depth} units on {num_qubits} qubit(s)"
            )));
        }
        if let Some(&(a, b)) = pattern.iter().find(|&&(a, b)| !coupling.is_connected(a, b)) {
            return Err(SynthError::Connectivity(format!(
                "{layout:?} layout needs qubits {a} and {b} to be coupled"
            )));
        }
        let cnots: Vec<(u32, u32)> = pattern.iter().copied().cycle().take(depth).collect();

        let mut elements = Vec::with_capacity(3 * num_qubits as usize + 5 * cnots.len());
        let mut param = 0;
        let mut rotation = |axis, qubit| {
            let element = Element::Rotation { axis, qubit, param };
            param += 1;
            element
        };
        for qubit in 0..num_qubits {
            elements.push(rotation(Axis::Z, qubit));
            elements.push(rotation(Axis::Y, qubit));
            elements.push(rotation(Axis::Z, qubit));
        }
        for &(control, target) in &cnots {
            elements.push(Element::Cx { control, target });
            elements.push(rotation(Axis::Y, control));
            elements.push(rotation(Axis::Z, control));
            elements.push(rotation(Axis::Y, target));
            elements.push(rotation(Axis::X, target));
        }

        Ok(Self {
            num_qubits,
            cnots,
            num_params: param,
            elements,
        })
    }

    /// The number of CNOTs needed to reach every unitary on `num_qubits`
    /// qubits: `ceil((4^q − 3q − 1) / 4)`.
    pub fn lower_bound_depth(num_qubits: u32) -> usize {
        let q = num_qubits as usize;
        let free = (1usize << (2 * q)) - 3 * q - 1;
        free.div_ceil(4)
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of angles.
    pub fn num_params(&self) -> usize {
        self.num_params
    }

    /// The CNOT units as `(control, target)` pairs.
    pub fn cnots(&self) -> &[(u32, u32)] {
        &self.cnots
    }

    /// The elements in application order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn check_params(&self, params: &[f64]) -> SynthResult<()> {
        if params.len() != self.num_params {
            return Err(SynthError::InvalidConfig(format!(
                "network takes {} parameters, got {}",
                self.num_params,
                params.len()
            )));
        }
        Ok(())
    }

    /// The unitary implemented by the network.
    pub fn unitary(&self, params: &[f64]) -> SynthResult<Array2<Complex64>> {
        self.check_params(params)?;
        let mut v = Array2::eye(1usize << self.num_qubits);
        for element in &self.elements {
            element.apply_left(&mut v, params, false);
        }
        Ok(v)
    }

    /// The cost `1 − |Tr(U†V)|²/d²` and its gradient.
    #[allow(clippy::cast_precision_loss)]
    pub fn cost_and_gradient(
        &self,
        target: &Array2<Complex64>,
        params: &[f64],
    ) -> SynthResult<(f64, Vec<f64>)> {
        let v = self.unitary(params)?;
        let dim = v.nrows() as f64;
        let norm = dim * dim;
        let overlap: Complex64 = target
            .iter()
            .zip(v.iter())
            .map(|(u, x)| u.conj() * x)
            .sum();
        let cost = 1.0 - overlap.norm_sqr() / norm;

        // Walking back from the last element, `prefix` is the product of
        // the elements up to k and `suffix` is U† times those after k.
        let mut gradient = vec![0.0; self.num_params];
        let mut prefix = v;
        let mut suffix = target.t().mapv(|z| z.conj());
        let half_i = Complex64::new(0.0, -0.5);
        for element in self.elements.iter().rev() {
            if let Element::Rotation { axis, qubit, param } = *element {
                let mut generated = prefix.clone();
                apply_left_1q(&mut generated, &axis.pauli(), qubit);
                let d_overlap = half_i * trace_of_product(&suffix, &generated);
                gradient[param] = -2.0 * (overlap.conj() * d_overlap).re / norm;
            }
            element.apply_right(&mut suffix, params);
            element.apply_left(&mut prefix, params, true);
        }

        Ok((cost, gradient))
    }

    /// Emit the network as a circuit.
    pub fn to_circuit(&self, params: &[f64]) -> SynthResult<Circuit> {
        self.check_params(params)?;
        let mut circuit = Circuit::with_size("cnot_network", self.num_qubits, 0);
        for element in &self.elements {
            match *element {
                Element::Rotation { axis, qubit, param } => {
                    let angle = params[param];
                    let q = QubitId(qubit);
                    match axis {
                        Axis::X => circuit.rx(angle, q)?,
                        Axis::Y => circuit.ry(angle, q)?,
                        Axis::Z => circuit.rz(angle, q)?,
                    };
                }
                Element::Cx { control, target } => {
                    circuit.cx(QubitId(control), QubitId(target))?;
                }
            }
        }
        Ok(circuit)
    }
}

fn spin_pairs(num_qubits: u32) -> Vec<(u32, u32)> {
    let even = (0..num_qubits.saturating_sub(1)).step_by(2);
    let odd = (1..num_qubits.saturating_sub(1)).step_by(2);
    even.chain(odd).map(|q| (q, q + 1)).collect()
}

fn sequential_pairs(num_qubits: u32, coupling: &CouplingMap) -> Vec<(u32, u32)> {
    (0..num_qubits)
        .flat_map(|i| ((i + 1)..num_qubits).map(move |j| (i, j)))
        .filter(|&(i, j)| coupling.is_connected(i, j))
        .collect()
}

impl Axis {
    fn pauli(self) -> Matrix2 {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match self {
            Axis::X => [[zero, one], [one, zero]],
            Axis::Y => [[zero, -i], [i, zero]],
            Axis::Z => [[one, zero], [zero, -one]],
        }
    }

    /// `exp(-i·θ/2·P)`.
    fn rotation(self, theta: f64) -> Matrix2 {
        let (s, c) = (theta / 2.0).sin_cos();
        let cos = Complex64::new(c, 0.0);
        match self {
            Axis::X => [
                [cos, Complex64::new(0.0, -s)],
                [Complex64::new(0.0, -s), cos],
            ],
            Axis::Y => [
                [cos, Complex64::new(-s, 0.0)],
                [Complex64::new(s, 0.0), cos],
            ],
            Axis::Z => [
                [Complex64::from_polar(1.0, -theta / 2.0), Complex64::new(0.0, 0.0)],
                [Complex64::new(0.0, 0.0), Complex64::from_polar(1.0, theta / 2.0)],
            ],
        }
    }
}

impl Element {
    /// `m ← G·m`, or `m ← G†·m` when `adjoint` is set.
    fn apply_left(&self, m: &mut Array2<Complex64>, params: &[f64], adjoint: bool) {
        match *self {
            Element::Rotation { axis, qubit, param } => {
                let theta = if adjoint { -params[param] } else { params[param] };
                apply_left_1q(m, &axis.rotation(theta), qubit);
            }
            Element::Cx { control, target } => swap_rows_cx(m, control, target),
        }
    }

    /// `m ← m·G`.
    fn apply_right(&self, m: &mut Array2<Complex64>, params: &[f64]) {
        match *self {
            Element::Rotation { axis, qubit, param } => {
                apply_right_1q(m, &axis.rotation(params[param]), qubit);
            }
            Element::Cx { control, target } => swap_cols_cx(m, control, target),
        }
    }
}

fn apply_left_1q(m: &mut Array2<Complex64>, g: &Matrix2, qubit: u32) {
    let bit = 1usize << qubit;
    let (rows, cols) = m.dim();
    for i in (0..rows).filter(|i| i & bit == 0) {
        let j = i | bit;
        for c in 0..cols {
            let (a, b) = (m[[i, c]], m[[j, c]]);
            m[[i, c]] = g[0][0] * a + g[0][1] * b;
            m[[j, c]] = g[1][0] * a + g[1][1] * b;
        }
    }
}

fn apply_right_1q(m: &mut Array2<Complex64>, g: &Matrix2, qubit: u32) {
    let bit = 1usize << qubit;
    let (rows, cols) = m.dim();
    for r in 0..rows {
        for i in (0..cols).filter(|i| i & bit == 0) {
            let j = i | bit;
            let (a, b) = (m[[r, i]], m[[r, j]]);
            m[[r, i]] = a * g[0][0] + b * g[1][0];
            m[[r, j]] = a * g[0][1] + b * g[1][1];
        }
    }
}

// CX is a symmetric permutation, so left and right application are row and
// column swaps of the same index pairs.
fn cx_pairs(dim: usize, control: u32, target: u32) -> impl Iterator<Item = (usize, usize)> {
    let (cbit, tbit) = (1usize << control, 1usize << target);
    (0..dim)
        .filter(move |i| i & cbit != 0 && i & tbit == 0)
        .map(move |i| (i, i | tbit))
}

fn swap_rows_cx(m: &mut Array2<Complex64>, control: u32, target: u32) {
    let (rows, cols) = m.dim();
    for (i, j) in cx_pairs(rows, control, target) {
        for c in 0..cols {
            m.swap([i, c], [j, c]);
        }
    }
}

fn swap_cols_cx(m: &mut Array2<Complex64>, control: u32, target: u32) {
    let (rows, cols) = m.dim();
    for (i, j) in cx_pairs(cols, control, target) {
        for r in 0..rows {
            m.swap([r, i], [r, j]);
        }
    }
}

/// `Tr(a·b)` without forming the product.
fn trace_of_product(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Complex64 {
    a.indexed_iter().map(|((i, j), &x)| x * b[[j, i]]).sum()
}
