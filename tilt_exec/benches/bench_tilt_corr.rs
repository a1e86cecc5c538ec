//! # Tilt Correction Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tilt_lib::tilt_corr::{correct_trajectory, Params, Sample};

/// A long curving trajectory whose roll changes every few samples, with the
/// first repeated roll near the end so the backward pass covers most of it.
fn build_samples(num_samples: usize) -> Vec<Sample> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 * 0.1;
            let roll_deg = if i + 10 < num_samples {
                (i as f64 * 0.37).sin() * 8.0 + i as f64 * 1e-6
            } else {
                2.0
            };

            Sample::new(
                t,
                t * 500.0,
                (t * 0.2).sin() * 2000.0,
                roll_deg,
                (t * 0.9).cos() * 4.0,
            )
        })
        .collect()
}

fn tilt_corr_benchmark(c: &mut Criterion) {
    let samples = build_samples(10_000);

    c.bench_function("correct 10k samples (recalc)", |b| {
        b.iter(|| correct_trajectory(black_box(&samples), Params::default()).unwrap())
    });

    let no_recalc = Params {
        recalc: false,
        ..Params::default()
    };

    c.bench_function("correct 10k samples (no recalc)", |b| {
        b.iter(|| correct_trajectory(black_box(&samples), no_recalc).unwrap())
    });
}

criterion_group!(benches, tilt_corr_benchmark);
criterion_main!(benches);
