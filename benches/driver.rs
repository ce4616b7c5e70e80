//! Criterion benchmarks for the curriculum transition and driver.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gwsim::curriculum::{advance, seed_step, CorruptionMode, CurriculumConfig};
use gwsim::driver::CurriculumDriver;
use gwsim::prng::Prng;

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for (label, mode) in [
        ("clean", CorruptionMode::None),
        ("corrupted", CorruptionMode::Shuffle),
    ] {
        group.bench_function(label, |b| {
            let mut rng = Prng::new(42);
            let cfg = CurriculumConfig {
                corruption_mode: mode,
                ..CurriculumConfig::default()
            };
            let mut step = seed_step(0, &mut rng);
            b.iter(|| {
                step = advance(black_box(&step), cfg, &mut rng);
                step
            });
        });
    }

    group.finish();
}

fn bench_driver_tick(c: &mut Criterion) {
    c.bench_function("driver_tick", |b| {
        let mut driver = CurriculumDriver::new(42);
        driver.play();
        b.iter(|| driver.tick());
    });
}

criterion_group!(benches, bench_advance, bench_driver_tick);
criterion_main!(benches);
