//! Gates.
//!
//! Matrices use the usual circuit-model conventions, e.g.
//! `Rz(θ) = diag(e^{-iθ/2}, e^{iθ/2})` and `P(λ) = diag(1, e^{iλ})`.

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Row-major 2x2 matrix.
pub type Matrix2 = [[Complex64; 2]; 2];

/// Built-in gates the compiler and the simulator understand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity.
    I,
    /// Pauli X.
    X,
    /// Pauli Y.
    Y,
    /// Pauli Z.
    Z,
    /// Hadamard.
    H,
    /// sqrt(Z).
    S,
    /// S†.
    Sdg,
    /// sqrt(X).
    SX,
    /// SX†.
    SXdg,
    /// X rotation.
    Rx(f64),
    /// Y rotation.
    Ry(f64),
    /// Z rotation.
    Rz(f64),
    /// Phase.
    P(f64),
    /// CNOT; the first operand is the control.
    CX,
    /// Controlled Z.
    CZ,
}

impl StandardGate {
    /// Lower-case gate name, as used in basis lists.
    pub fn name(&self) -> &'static str {
        use StandardGate::*;
        match self {
            I => "id",
            X => "x",
            Y => "y",
            Z => "z",
            H => "h",
            S => "s",
            Sdg => "sdg",
            SX => "sx",
            SXdg => "sxdg",
            Rx(_) => "rx",
            Ry(_) => "ry",
            Rz(_) => "rz",
            P(_) => "p",
            CX => "cx",
            CZ => "cz",
        }
    }

    /// Number of operands.
    pub fn num_qubits(&self) -> usize {
        match self {
            Self::CX | Self::CZ => 2,
            _ => 1,
        }
    }

    /// The angle of a rotation or phase gate.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            Self::Rx(t) | Self::Ry(t) | Self::Rz(t) | Self::P(t) => Some(t),
            _ => None,
        }
    }

    /// The inverse gate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        use StandardGate::*;
        match *self {
            S => Sdg,
            Sdg => S,
            SX => SXdg,
            SXdg => SX,
            Rx(t) => Rx(-t),
            Ry(t) => Ry(-t),
            Rz(t) => Rz(-t),
            P(t) => P(-t),
            hermitian => hermitian,
        }
    }

    /// The matrix of a single-qubit gate; `None` for `cx` and `cz`.
    pub fn matrix(&self) -> Option<Matrix2> {
        let c = Complex64::new;
        let (zero, one, i) = (c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0));
        let diag = |a: Complex64, d: Complex64| [[a, zero], [zero, d]];
        let m = match *self {
            Self::I => diag(one, one),
            Self::X => [[zero, one], [one, zero]],
            Self::Y => [[zero, -i], [i, zero]],
            Self::Z => diag(one, -one),
            Self::H => {
                let h = c(FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            Self::S => diag(one, i),
            Self::Sdg => diag(one, -i),
            Self::SX => [[c(0.5, 0.5), c(0.5, -0.5)], [c(0.5, -0.5), c(0.5, 0.5)]],
            Self::SXdg => [[c(0.5, -0.5), c(0.5, 0.5)], [c(0.5, 0.5), c(0.5, -0.5)]],
            Self::Rx(t) => {
                let (s, co) = (t / 2.0).sin_cos();
                [[c(co, 0.0), c(0.0, -s)], [c(0.0, -s), c(co, 0.0)]]
            }
            Self::Ry(t) => {
                let (s, co) = (t / 2.0).sin_cos();
                [[c(co, 0.0), c(-s, 0.0)], [c(s, 0.0), c(co, 0.0)]]
            }
            Self::Rz(t) => diag(
                Complex64::from_polar(1.0, -t / 2.0),
                Complex64::from_polar(1.0, t / 2.0),
            ),
            Self::P(t) => diag(one, Complex64::from_polar(1.0, t)),
            Self::CX | Self::CZ => return None,
        };
        Some(m)
    }
}

/// A dense unitary applied as one opaque gate.
///
/// The matrix is row-major, `2^n × 2^n`, and bit `k` of its basis index
/// belongs to the `k`-th operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    name: String,
    num_qubits: usize,
    matrix: Vec<Complex64>,
}

impl CustomGate {
    /// Wrap `matrix`, checking that it is `2^n × 2^n` for `num_qubits = n`.
    pub fn new(name: impl Into<String>, num_qubits: usize, matrix: Vec<Complex64>) -> IrResult<Self> {
        let name = name.into();
        let dim = 1usize << num_qubits;
        if matrix.len() != dim * dim {
            return Err(IrError::MatrixShape {
                gate: name,
                dim,
                got: matrix.len(),
            });
        }
        Ok(Self {
            name,
            num_qubits,
            matrix,
        })
    }

    /// The gate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of operands.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Row-major matrix entries.
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }
}

/// A standard or custom gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A built-in gate.
    Standard(StandardGate),
    /// A dense unitary.
    Custom(CustomGate),
}

impl Gate {
    /// Gate name.
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Custom(g) => g.name(),
        }
    }

    /// Number of operands.
    pub fn num_qubits(&self) -> usize {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Custom(g) => g.num_qubits(),
        }
    }

    /// The built-in gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match self {
            Gate::Standard(g) => Some(g),
            Gate::Custom(_) => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}
