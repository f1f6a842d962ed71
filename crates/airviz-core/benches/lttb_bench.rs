use airviz_core::downsample::lttb;
use airviz_core::series::TimePoint;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, black_box};

// One reading per hour, the sampling rate of the air-quality exports.
fn gen_hourly(n: usize) -> Vec<TimePoint> {
    (0..n)
        .map(|i| TimePoint {
            t: i as f64 * 3_600_000.0,
            v: (i as f64 * 0.26).sin() * 400.0 + 1000.0 + (i as f64 * 0.001),
        })
        .collect()
}

fn bench_lttb(c: &mut Criterion) {
    let mut group = c.benchmark_group("lttb");
    for &n in &[9_357usize, 100_000usize] {
        let data = gen_hourly(n);
        for &target in &[928usize, 1_856usize] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_t{target}")), &target, |b, &t| {
                b.iter_batched(
                    || data.clone(),
                    |d| { let _ = black_box(lttb(&d, t)); },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_lttb);
criterion_main!(benches);
