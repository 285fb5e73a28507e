use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sheetpose_animation::{AnimationSpec, AnimationType, Animatable, Easing, FrameClock, SpringSpec};

const FRAME_NANOS: u64 = 16_666_667;
const SAMPLES: usize = 240;

fn bench_easing(c: &mut Criterion) {
    let mut group = c.benchmark_group("easing");
    for easing in [Easing::EaseOut, Easing::EaseInOut, Easing::FastOutSlowIn] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{easing:?}")),
            &easing,
            |b, easing| {
                b.iter(|| {
                    let mut acc = 0.0f32;
                    for i in 0..=SAMPLES {
                        acc += easing.transform(black_box(i as f32 / SAMPLES as f32));
                    }
                    acc
                });
            },
        );
    }
    group.finish();
}

fn run_to_rest(animation: AnimationType) {
    let clock = FrameClock::new();
    let animatable = Animatable::new(0.25f32, clock.clone());
    animatable.animate_to(1.0, animation, |_| {});
    let mut frame_time = 0;
    while clock.has_frame_callbacks() {
        frame_time += FRAME_NANOS;
        clock.drain_frame_callbacks(frame_time);
    }
}

fn bench_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle");
    group.bench_function("tween_200ms", |b| {
        b.iter(|| run_to_rest(AnimationType::Tween(AnimationSpec::tween(200, Easing::EaseOut))))
    });
    group.bench_function("spring_default", |b| {
        b.iter(|| run_to_rest(AnimationType::Spring(SpringSpec::default())))
    });
    group.finish();
}

criterion_group!(animation, bench_easing, bench_settle);
criterion_main!(animation);
