//! Benchmarks for terrain reduction.
//!
//! Run with: `cargo bench --bench reduce_bench`
//!
//! Build with `--features parallel` to compare the rayon path.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seisterra::{Extent2D, GridReducer, RawRaster};

/// Square raster with a NoData cell every 97 samples.
fn setup_raster(n: usize) -> RawRaster {
    let data = (0..n * n)
        .map(|i| {
            if i % 97 == 0 {
                -9999.0
            } else {
                let (r, c) = ((i / n) as f64, (i % n) as f64);
                300.0 + 20.0 * (r * 0.01).sin() + 15.0 * (c * 0.013).cos()
            }
        })
        .collect();
    RawRaster::new(data, n, n, Extent2D::new(0.0, n as f64 * 30.0, 0.0, n as f64 * 30.0))
        .unwrap()
        .with_nodata(-9999.0)
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_reduce");
    let raster = setup_raster(2048);
    let reducer = GridReducer::default();

    for factor in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("factor", factor), &factor, |b, &k| {
            b.iter(|| reducer.reduce(black_box(&raster), k).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reduce);
criterion_main!(benches);
