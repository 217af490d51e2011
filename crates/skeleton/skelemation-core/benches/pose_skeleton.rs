//! Benchmarks for posing the built-in figure.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use skelemation_core::{
    kinematics::pose, seed, Address, AnimateEvent, BonePatch, Config, FormulaEngine, Seed,
    SkeletonAnimator,
};

fn bench_pose(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_figure");
    let identity = seed::figure().expect("figure seed");

    let mut driven = identity.clone();
    let addresses: Vec<Address> = driven.walk().map(|(a, _)| a).collect();
    for address in &addresses {
        driven
            .update_bone(address, BonePatch::with_rotation_formula("a + s * 0.25"))
            .expect("figure address");
    }

    for (name, root) in [("identity", &identity), ("wave_driven", &driven)] {
        let mut formulas = FormulaEngine::default();
        group.bench_with_input(BenchmarkId::from_parameter(name), root, |b, root| {
            b.iter(|| pose(black_box(root), black_box(0.5), &mut formulas));
        });
    }
    group.finish();
}

fn bench_animate_frame(c: &mut Criterion) {
    let cfg = Config::default();
    let root = Seed::Figure.build().expect("figure seed");
    let mut animator = SkeletonAnimator::new(root, &cfg);
    let mut formulas = FormulaEngine::new(&cfg.formula);

    c.bench_function("animate_frame", |b| {
        b.iter(|| {
            animator
                .apply(AnimateEvent::Tick { delta_ms: 16.0 }, &mut formulas)
                .expect("tick");
            black_box(animator.frame(&cfg, &mut formulas).expect("frame"));
        });
    });
}

criterion_group!(benches, bench_pose, bench_animate_frame);
criterion_main!(benches);
