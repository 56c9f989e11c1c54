use bellows::render::{SvgRenderOptions, Visualizer, compose, render_scene_svg, solve};
use bellows::{DeformationState, JointTopology, VisualizerConfig};
use criterion::{Criterion, criterion_group, criterion_main};

fn fixtures() -> Vec<(&'static str, JointTopology, DeformationState)> {
    vec![
        (
            "axial",
            JointTopology::Axial,
            DeformationState::new(50.0, 0.0, 0.0).with_cross_section(false),
        ),
        (
            "universal",
            JointTopology::Universal,
            DeformationState::new(-20.0, 75.0, 0.0).with_cross_section(false),
        ),
        (
            "hinged",
            JointTopology::Hinged,
            DeformationState::new(0.0, 0.0, 18.0).with_pressure(30.0),
        ),
        (
            "gimbal",
            JointTopology::Gimbal,
            DeformationState::new(0.0, 0.0, -12.0).with_cross_section(false),
        ),
    ]
}

fn bench_solve_only(c: &mut Criterion) {
    let config = VisualizerConfig::default();
    let mut group = c.benchmark_group("solve_only");
    for (name, topology, state) in fixtures() {
        group.bench_function(name, |b| {
            b.iter(|| {
                let _ = solve(topology, &state, &config).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_compose_only(c: &mut Criterion) {
    let config = VisualizerConfig::default();
    let mut group = c.benchmark_group("compose_only");
    for (name, topology, state) in fixtures() {
        let solved = solve(topology, &state, &config).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                let _ = compose(&solved, &config);
            });
        });
    }
    group.finish();
}

fn bench_render_svg(c: &mut Criterion) {
    let visualizer = Visualizer::new();
    let options = SvgRenderOptions::default();
    let mut group = c.benchmark_group("render_svg");
    for (name, topology, state) in fixtures() {
        group.bench_function(name, |b| {
            b.iter(|| {
                let scene = visualizer.scene(topology, &state).unwrap();
                let _svg = render_scene_svg(&scene, &options);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_solve_only,
    bench_compose_only,
    bench_render_svg
);
criterion_main!(benches);
