//! Benchmarks for circuit construction
//!
//! Run with: cargo bench -p qgibbs-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qgibbs_ir::{Circuit, QubitId};
use std::f64::consts::PI;

/// Benchmark building a CNOT-unit network of the kind the variational
/// synthesizer emits.
fn bench_cnot_network(c: &mut Criterion) {
    let mut group = c.benchmark_group("cnot_network");

    for num_qubits in &[2u32, 3, 4, 5] {
        let units = (4usize.pow(*num_qubits) - 3 * *num_qubits as usize - 1).div_ceil(4);
        group.bench_with_input(
            BenchmarkId::new("build", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let mut circuit = Circuit::with_size("network", n, 0);
                    for k in 0..units {
                        let ctrl = QubitId((k as u32) % (n - 1));
                        let tgt = QubitId(ctrl.0 + 1);
                        circuit.cx(ctrl, tgt).unwrap();
                        circuit.ry(black_box(PI / 3.0), ctrl).unwrap();
                        circuit.rz(black_box(PI / 5.0), ctrl).unwrap();
                        circuit.ry(black_box(PI / 7.0), tgt).unwrap();
                        circuit.rx(black_box(PI / 9.0), tgt).unwrap();
                    }
                    circuit
                });
            },
        );
    }

    group.finish();
}

/// Benchmark depth computation on a deep circuit with barriers
fn bench_depth(c: &mut Criterion) {
    let mut circuit = Circuit::with_size("deep", 6, 6);
    for layer in 0..200u32 {
        for q in 0..6 {
            circuit.rz(f64::from(layer) * 0.01, QubitId(q)).unwrap();
        }
        circuit.cx(QubitId(layer % 5), QubitId(layer % 5 + 1)).unwrap();
        if layer % 20 == 0 {
            circuit.barrier_all().unwrap();
        }
    }
    circuit.measure_all().unwrap();

    c.bench_function("depth_deep_circuit", |b| {
        b.iter(|| black_box(&circuit).depth());
    });
}

criterion_group!(benches, bench_cnot_network, bench_depth);
criterion_main!(benches);
