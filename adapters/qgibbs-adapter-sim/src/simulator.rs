//! Simulator backend.

use std::sync::Mutex;
use std::time::Instant;

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use qgibbs_hal::{Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult};
use qgibbs_ir::{Circuit, InstructionKind};

use crate::statevector::Statevector;

/// `2^24` amplitudes take 256 MiB.
const DEFAULT_MAX_QUBITS: u32 = 24;

/// Where each measured qubit is written, in program order.
pub type MeasureMap = Vec<(usize, usize)>;

/// Evolves the statevector once and samples every shot from the final
/// distribution. Measurements must therefore be terminal: no gate may act
/// on a qubit after it has been measured.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self::build(DEFAULT_MAX_QUBITS, StdRng::from_entropy())
    }

    /// Reproducible sampling.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(DEFAULT_MAX_QUBITS, StdRng::seed_from_u64(seed))
    }

    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(max_qubits, StdRng::from_entropy())
    }

    fn build(max_qubits: u32, rng: StdRng) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            rng: Mutex::new(rng),
        }
    }

    /// Run every gate on `|0…0⟩` and collect the measurement map.
    #[instrument(skip_all, fields(circuit = circuit.name(), qubits = circuit.num_qubits()))]
    pub fn final_state(&self, circuit: &Circuit) -> HalResult<(Statevector, MeasureMap)> {
        let limit = self.capabilities.num_qubits;
        if circuit.num_qubits() > limit as usize {
            return Err(HalError::TooManyQubits {
                backend: self.capabilities.name.clone(),
                needed: circuit.num_qubits(),
                limit,
            });
        }

        let mut state = Statevector::new(circuit.num_qubits());
        let mut measured = vec![false; circuit.num_qubits()];
        let mut map = MeasureMap::new();
        for inst in circuit.instructions() {
            match inst.kind {
                InstructionKind::Measure => {
                    let (q, c) = (inst.qubits[0].index(), inst.clbits[0].index());
                    measured[q] = true;
                    map.push((q, c));
                }
                InstructionKind::Barrier => {}
                InstructionKind::Gate(_) => {
                    if let Some(&qubit) = inst.qubits.iter().find(|q| measured[q.index()]) {
                        return Err(HalError::GateAfterMeasure {
                            gate: inst.name().to_owned(),
                            qubit,
                        });
                    }
                    state.apply(inst)?;
                }
            }
        }
        Ok((state, map))
    }
}

/// Render basis index `outcome` as a counts key of `width` characters.
fn bitstring(outcome: usize, map: &[(usize, usize)], width: usize) -> String {
    let mut bits = vec!['0'; width];
    for &(q, c) in map {
        if outcome >> q & 1 == 1 {
            bits[c] = '1';
        }
    }
    bits.into_iter().collect()
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 {
            return Err(HalError::Shots {
                shots,
                max: self.capabilities.max_shots,
            });
        }
        let started = Instant::now();
        let (state, map) = self.final_state(circuit)?;
        let outcomes = WeightedIndex::new(state.probabilities())
            .map_err(|e| HalError::Sampling(e.to_string()))?;

        let mut tally: FxHashMap<usize, u64> = FxHashMap::default();
        {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            for _ in 0..shots {
                *tally.entry(outcomes.sample(&mut *rng)).or_default() += 1;
            }
        }

        let width = circuit.num_clbits();
        let counts: Counts = tally
            .into_iter()
            .map(|(outcome, n)| (bitstring(outcome, &map, width), n))
            .collect();

        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(shots, outcomes = counts.len(), elapsed_ms, "sampled");
        Ok(ExecutionResult::new(counts, shots).with_execution_time(elapsed_ms))
    }
}
