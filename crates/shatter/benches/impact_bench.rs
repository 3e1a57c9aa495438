//! Criterion benches for the impact pipeline.
//!
//! - generate: ring construction + tab synthesis + first connectivity pass,
//!   at three grid sizes.
//! - connectivity: flood fill on a fixed generated grid.
//! - drc: full rule pass, and one repair batch on a fresh clone.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use shatter::api::{
    extract_pieces, DrcCfg, Impact, Point, RectangularFrame, ReplayToken, ShatterParams, TabCfg,
};

fn frame() -> RectangularFrame {
    RectangularFrame::new(Point::new(-400.0, -300.0), Point::new(400.0, 300.0))
}

fn params(rings: usize, divisions: usize) -> ShatterParams {
    ShatterParams {
        rings,
        divisions,
        impact_radius: [20.0, 450.0],
        ..ShatterParams::default()
    }
}

fn sample(rings: usize, divisions: usize) -> Impact {
    let mut rng = ReplayToken::generation(42).to_std_rng();
    Impact::generate(frame(), None, &[], &params(rings, divisions), &TabCfg::default(), &mut rng)
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (rings, divisions) in [(6, 16), (10, 24), (14, 36)] {
        let p = params(rings, divisions);
        let id = format!("{rings}x{divisions}");
        group.bench_function(BenchmarkId::new("impact", id), |b| {
            b.iter_batched(
                || ReplayToken::generation(7).to_std_rng(),
                |mut rng| {
                    let _ = Impact::generate(frame(), None, &[], &p, &TabCfg::default(), &mut rng);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_connectivity(c: &mut Criterion) {
    let mut group = c.benchmark_group("connectivity");
    let impact = sample(10, 24);
    group.bench_function("extract_pieces/10x24", |b| {
        b.iter(|| extract_pieces(impact.grid(), impact.ndiv()))
    });
    group.finish();
}

fn bench_drc(c: &mut Criterion) {
    let mut group = c.benchmark_group("drc");
    let impact = sample(10, 24);
    let cfg = DrcCfg::default();
    group.bench_function("check/10x24", |b| {
        b.iter_batched(
            || impact.clone(),
            |mut imp| {
                let _ = imp.drc(&cfg).len();
            },
            BatchSize::SmallInput,
        )
    });
    let mut checked = impact.clone();
    checked.drc(&cfg);
    group.bench_function("repair/10x24", |b| {
        b.iter_batched(
            || (checked.clone(), ReplayToken::repair_pass(3, 0).to_std_rng()),
            |(mut imp, mut rng)| {
                let _ = imp.repair(&TabCfg::default(), &mut rng);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_generate, bench_connectivity, bench_drc);
criterion_main!(benches);
