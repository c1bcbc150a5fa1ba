//! Benchmarks for Tessera circuit assembly
//!
//! Run with: cargo bench -p tessera-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessera_ir::{Basis, CircuitAssembler, Operation, Position2D};

/// One round of a rotated-surface-code-like checkerboard of `n x n` plaquettes.
fn fill_round(asm: &mut CircuitAssembler, n: i64, offset: usize) {
    for px in 0..n {
        for py in 0..n {
            let s = Position2D::new(2 * px, 2 * py);
            let pauli = if (px + py) % 2 == 0 { Basis::Z } else { Basis::X };
            asm.add_operation(offset, Operation::reset(Basis::X, s), "bench")
                .unwrap();
            for (step, (dx, dy)) in [(-1, -1), (1, -1), (-1, 1), (1, 1)].into_iter().enumerate() {
                let data = Position2D::new(s.x + dx, s.y + dy);
                // Z-order and N-order keep the checkerboard conflict free.
                let moment = match (pauli, step) {
                    (Basis::X, 1) => 3,
                    (Basis::X, 2) => 2,
                    _ => step + 1,
                };
                asm.add_operation(
                    offset + moment,
                    Operation::controlled_pauli(pauli, s, data),
                    "bench",
                )
                .unwrap();
            }
            asm.add_operation(offset + 5, Operation::measure(Basis::X, s), "bench")
                .unwrap();
        }
    }
}

/// Benchmark assembling and sealing several rounds
fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    for n in &[4_i64, 8, 16] {
        group.bench_with_input(BenchmarkId::new("rounds_3", n), n, |b, &n| {
            b.iter(|| {
                let mut asm = CircuitAssembler::new();
                asm.begin().unwrap();
                for round in 0..3 {
                    fill_round(&mut asm, black_box(n), round * 6);
                }
                asm.seal().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assembly);
criterion_main!(benches);
