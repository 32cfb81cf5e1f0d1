//! Sampling behaviour of the simulator backend.

use num_complex::Complex64;
use proptest::prelude::*;
use qgibbs_adapter_sim::SimulatorBackend;
use qgibbs_hal::Backend;
use qgibbs_ir::{Circuit, ClbitId, QubitId};

fn ry_circuit(theta: f64) -> Circuit {
    let mut circuit = Circuit::with_size("ry", 1, 1);
    circuit.ry(theta, QubitId(0)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit
}

// ---------------------------------------------------------------------------
// Reproducibility
// ---------------------------------------------------------------------------

#[test]
fn test_same_seed_same_counts() {
    let circuit = ry_circuit(1.1);
    let a = SimulatorBackend::with_seed(134).run(&circuit, 5000).unwrap();
    let b = SimulatorBackend::with_seed(134).run(&circuit, 5000).unwrap();
    assert_eq!(a.counts, b.counts);
}

#[test]
fn test_frequencies_track_probabilities() {
    // P(1) = sin²(θ/2) = 0.25 for θ = 2π/3
    let theta = 2.0 * std::f64::consts::PI / 3.0;
    let result = SimulatorBackend::with_seed(3)
        .run(&ry_circuit(theta), 100_000)
        .unwrap();
    assert!((result.probability("1") - 0.25).abs() < 0.01);
}

// ---------------------------------------------------------------------------
// Dense unitaries agree with standard gates
// ---------------------------------------------------------------------------

#[test]
fn test_custom_unitary_matches_standard_gate() {
    let backend = SimulatorBackend::new();
    let theta: f64 = 0.9;
    let (s, c) = (theta / 2.0).sin_cos();
    let ry = vec![
        Complex64::new(c, 0.0),
        Complex64::new(-s, 0.0),
        Complex64::new(s, 0.0),
        Complex64::new(c, 0.0),
    ];

    let mut custom = Circuit::with_size("custom", 2, 0);
    custom.h(QubitId(1)).unwrap();
    custom.unitary("ry", ry, &[QubitId(0)]).unwrap();

    let mut standard = Circuit::with_size("standard", 2, 0);
    standard.h(QubitId(1)).unwrap();
    standard.ry(theta, QubitId(0)).unwrap();

    let (a, _) = backend.final_state(&custom).unwrap();
    let (b, _) = backend.final_state(&standard).unwrap();
    for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
        assert!((x - y).norm() < 1e-12);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_counts_sum_to_shots(theta in 0.0f64..6.28, shots in 1u32..2000, seed in any::<u64>()) {
        let result = SimulatorBackend::with_seed(seed).run(&ry_circuit(theta), shots).unwrap();
        prop_assert_eq!(result.counts.total_shots(), u64::from(shots));
    }
}
