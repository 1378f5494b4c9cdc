use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reelkit_core::{
    bake_composition, interpolate, spring, BakingConfig, Composition, Extrapolate,
    InterpolateOptions, SpringConfig,
};
use reelkit_test_fixtures::compositions;

fn bench_resolvers(c: &mut Criterion) {
    let opts = InterpolateOptions::default().extrapolate_right(Extrapolate::Clamp);
    c.bench_function("interpolate_two_point", |b| {
        b.iter(|| {
            for frame in 0..60 {
                black_box(
                    interpolate(black_box(frame as f64), &[0.0, 30.0], &[0.0, 1.0], &opts)
                        .unwrap(),
                );
            }
        })
    });

    let cfg = SpringConfig::default().damping(12.0);
    c.bench_function("spring_60_frames", |b| {
        b.iter(|| {
            for frame in 0..60 {
                black_box(spring(black_box(frame as f64), 30.0, &cfg));
            }
        })
    });

    let text = compositions::json("sequence-timeline").expect("fixture");
    let comp = Composition::from_json(&text).expect("valid fixture");
    c.bench_function("bake_sequence_timeline", |b| {
        b.iter(|| black_box(bake_composition(&comp, &BakingConfig::default()).unwrap()))
    });
}

criterion_group!(benches, bench_resolvers);
criterion_main!(benches);
