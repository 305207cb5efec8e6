use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use almagest::orbit::kepler::{solve_elliptic, solve_hyperbolic, solve_parabolic};

const SAMPLES: usize = 10_000;

/// Uniform random in (−π, π]
#[inline]
fn rand_mean_anomaly(rng: &mut StdRng) -> f64 {
    (rng.random::<f64>() - 0.5) * std::f64::consts::TAU
}

/// Typical planets and asteroids: e ∈ [0.0, 0.7]
fn bench_elliptic(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    c.bench_function("solve_kepler_equation/elliptic_e<=0.7", |b| {
        b.iter_batched(
            || {
                // Pre-generate inputs to avoid RNG cost in the timed section
                (0..SAMPLES)
                    .map(|_| (rand_mean_anomaly(&mut rng), rng.random_range(0.0..=0.7)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (m, e) in cases {
                    black_box(solve_elliptic(black_box(m), black_box(e)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Comet-like orbits, still elliptic: e ∈ [0.7, 0.99]
fn bench_high_e(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);

    c.bench_function("solve_kepler_equation/high_e_0.7..0.99", |b| {
        b.iter_batched(
            || {
                (0..SAMPLES)
                    .map(|_| (rand_mean_anomaly(&mut rng), rng.random_range(0.7..0.99)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (m, e) in cases {
                    black_box(solve_elliptic(black_box(m), black_box(e)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Interstellar visitors: e ∈ [1.01, 5.0], |M| up to 50 rad
fn bench_hyperbolic(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);

    c.bench_function("solve_kepler_equation/hyperbolic_e_1.01..5", |b| {
        b.iter_batched(
            || {
                (0..SAMPLES)
                    .map(|_| (rng.random_range(-50.0..50.0), rng.random_range(1.01..5.0)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (m, e) in cases {
                    black_box(solve_hyperbolic(black_box(m), black_box(e)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Barker's equation is closed-form; kept as a baseline against the iterative solvers.
fn bench_parabolic(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let cases: Vec<f64> = (0..SAMPLES).map(|_| rng.random_range(-100.0..100.0)).collect();

    c.bench_function("solve_kepler_equation/parabolic", |b| {
        b.iter(|| {
            for &w in &cases {
                black_box(solve_parabolic(black_box(w)));
            }
        })
    });
}

/// Fixed stress case near perihelion at high eccentricity, where the starter is poorest.
fn bench_fixed_stress(c: &mut Criterion) {
    let e = 0.999_f64;
    let m = 1.0e-3_f64;

    c.bench_function("solve_kepler_equation/fixed_stress_case", |b| {
        b.iter(|| black_box(solve_elliptic(black_box(m), black_box(e))))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_elliptic, bench_high_e, bench_hyperbolic, bench_parabolic, bench_fixed_stress
);
criterion_main!(benches);
