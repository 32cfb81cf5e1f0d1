//! Dense statevector.

use num_complex::Complex64;

use qgibbs_hal::{HalError, HalResult};
use qgibbs_ir::{Gate, Instruction, InstructionKind, Matrix2, StandardGate};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Index pairs `(i, i | 1 << qubit)` with the bit of `i` clear.
fn pairs(len: usize, qubit: usize) -> impl Iterator<Item = (usize, usize)> {
    let bit = 1usize << qubit;
    (0..len).filter(move |i| i & bit == 0).map(move |i| (i, i | bit))
}

/// `2^n` amplitudes; bit `k` of an index is the value of qubit `k`.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// `|0…0⟩` on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// `|amplitude|²` per basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Apply a gate. Measurements and barriers leave the state alone; the
    /// backend decides what they mean.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        if let Some(&qubit) = instruction
            .qubits
            .iter()
            .find(|q| q.index() >= self.num_qubits)
        {
            return Err(HalError::QubitOutOfRange {
                qubit,
                width: self.num_qubits,
            });
        }
        let InstructionKind::Gate(gate) = &instruction.kind else {
            return Ok(());
        };
        let wires: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();

        match gate {
            Gate::Standard(StandardGate::I) => {}
            Gate::Standard(StandardGate::CX) => self.controlled(wires[0], wires[1], |state, i, j| {
                state.swap(i, j);
            }),
            Gate::Standard(StandardGate::CZ) => self.controlled(wires[0], wires[1], |state, _, j| {
                state[j] = -state[j];
            }),
            Gate::Standard(one_qubit) => {
                if let Some(matrix) = one_qubit.matrix() {
                    self.apply_1q(wires[0], &matrix);
                }
            }
            Gate::Custom(custom) => self.apply_dense(custom.matrix(), &wires),
        }
        Ok(())
    }

    fn apply_1q(&mut self, qubit: usize, m: &Matrix2) {
        for (i, j) in pairs(self.amplitudes.len(), qubit) {
            let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
            self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
            self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
        }
    }

    /// Call `act(state, i, j)` for every target pair whose control bit is set.
    fn controlled(
        &mut self,
        control: usize,
        target: usize,
        act: impl Fn(&mut [Complex64], usize, usize),
    ) {
        for (i, j) in pairs(self.amplitudes.len(), target) {
            if i >> control & 1 == 1 {
                act(&mut self.amplitudes, i, j);
            }
        }
    }

    /// Apply a row-major `2^m × 2^m` matrix whose local bit `k` is `wires[k]`.
    fn apply_dense(&mut self, matrix: &[Complex64], wires: &[usize]) {
        let dim = 1usize << wires.len();
        let scatter: Vec<usize> = (0..dim)
            .map(|local| {
                wires
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| local >> k & 1 == 1)
                    .fold(0, |acc, (_, &w)| acc | 1 << w)
            })
            .collect();
        let occupied = scatter[dim - 1];

        let mut local = vec![ZERO; dim];
        for base in (0..self.amplitudes.len()).filter(|b| b & occupied == 0) {
            for (slot, &offset) in local.iter_mut().zip(&scatter) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, &offset) in matrix.chunks_exact(dim).zip(&scatter) {
                self.amplitudes[base | offset] = row.iter().zip(&local).map(|(m, a)| m * a).sum();
            }
        }
    }
}
