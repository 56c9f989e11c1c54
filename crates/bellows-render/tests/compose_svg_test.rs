use bellows_core::{DeformationState, JointTopology, VisualizerConfig};
use bellows_render::compose::{compose, pressure_overlay_opacity};
use bellows_render::kinematics::solve;
use bellows_render::scene::{LayerRole, Primitive, Scene};
use bellows_render::svg::{SvgRenderOptions, path_d, render_scene_svg};
use bellows_render::{render_scene, render_svg};

fn scene(topology: JointTopology, state: DeformationState) -> Scene {
    render_scene(topology, &state, &VisualizerConfig::default()).expect("scene")
}

fn solid(axial: f64, lateral: f64, angular: f64) -> DeformationState {
    DeformationState::new(axial, lateral, angular).with_cross_section(false)
}

#[test]
fn pressure_overlay_follows_pressure_and_mode() {
    let cfg = VisualizerConfig::default();
    assert_eq!(pressure_overlay_opacity(&solid(0.0, 0.0, 0.0), &cfg), None);
    assert_eq!(
        pressure_overlay_opacity(&solid(0.0, 0.0, 0.0).with_pressure(50.0), &cfg),
        Some(0.25)
    );
    let section = DeformationState::default().with_pressure(50.0);
    assert_eq!(pressure_overlay_opacity(&section, &cfg), None);

    for topology in [
        JointTopology::Axial,
        JointTopology::Universal,
        JointTopology::Hinged,
        JointTopology::Gimbal,
    ] {
        let s = scene(topology, solid(0.0, 0.0, 0.0));
        assert!(s.layer(LayerRole::PressureOverlay).is_none());

        let s = scene(topology, solid(0.0, 0.0, 0.0).with_pressure(50.0));
        let layer = s.layer(LayerRole::PressureOverlay).expect("overlay");
        let [Primitive::Glow { opacity, .. }] = layer.primitives.as_slice() else {
            panic!("expected a single glow");
        };
        assert_eq!(*opacity, 0.25);
    }
}

#[test]
fn solid_layers_follow_draw_order() {
    let s = scene(JointTopology::Hinged, solid(0.0, 0.0, 20.0).with_pressure(30.0));
    assert_eq!(
        s.roles(),
        vec![
            LayerRole::BackShading,
            LayerRole::Body,
            LayerRole::Features,
            LayerRole::Highlights,
            LayerRole::Flanges,
            LayerRole::Hardware,
            LayerRole::FlowIndicator,
            LayerRole::PressureOverlay,
        ]
    );
    assert_eq!(s.width, 800.0);
    assert_eq!(s.height, 500.0);
}

#[test]
fn cross_section_drops_shading_and_ribs() {
    let s = scene(JointTopology::Axial, DeformationState::default());
    assert_eq!(
        s.roles(),
        vec![
            LayerRole::Body,
            LayerRole::Highlights,
            LayerRole::Flanges,
            LayerRole::FlowIndicator,
        ]
    );
    let body = s.layer(LayerRole::Body).expect("body");
    assert_eq!(body.primitives.len(), 1);
    let Primitive::Path { data, .. } = &body.primitives[0] else {
        panic!("expected outline path");
    };
    assert!(data.is_closed());
}

#[test]
fn solid_axial_ribs_and_highlights() {
    let s = scene(JointTopology::Axial, solid(0.0, 0.0, 0.0));
    let features = s.layer(LayerRole::Features).expect("features");
    assert_eq!(features.primitives.len(), 19);
    assert_eq!(features.opacity, Some(0.7));
    assert_eq!(s.layer(LayerRole::Highlights).expect("hl").primitives.len(), 2);

    let section = scene(JointTopology::Axial, DeformationState::default());
    assert!(s.primitive_count() >= section.primitive_count() + 19);
}

#[test]
fn universal_draws_two_bellows_and_a_spool() {
    let s = scene(JointTopology::Universal, solid(0.0, 60.0, 0.0));
    let body = s.layer(LayerRole::Body).expect("body");
    let paths = body
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Path { .. }))
        .count();
    let rects = body
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Rect { .. }))
        .count();
    assert_eq!(paths, 2);
    assert_eq!(rects, 2);
    assert!(s.layer(LayerRole::Hardware).is_none());
    assert_eq!(s.layer(LayerRole::Features).expect("ribs").primitives.len(), 18);
}

#[test]
fn flanges_sit_at_the_solved_poses() {
    let cfg = VisualizerConfig::default();
    let state = solid(0.0, 0.0, 15.0);
    let solved = solve(JointTopology::Gimbal, &state, &cfg).expect("solve");
    let s = compose(&solved, &cfg);
    let flanges = s.layer(LayerRole::Flanges).expect("flanges");
    assert_eq!(flanges.primitives.len(), 4);

    let Primitive::Rect { placement, .. } = &flanges.primitives[0] else {
        panic!("rect");
    };
    assert_eq!((placement.x, placement.y, placement.rotation), (225.0, 250.0, 0.0));

    let Primitive::Rect { placement, .. } = &flanges.primitives[2] else {
        panic!("rect");
    };
    assert!((placement.x - (225.0 + solved.far_flange.x)).abs() < 1e-9);
    assert!((placement.y - (250.0 + solved.far_flange.y)).abs() < 1e-9);
    assert_eq!(placement.rotation, solved.far_flange.rotation);
}

#[test]
fn svg_output_contains_defs_and_layers() {
    let svg = render_svg(
        JointTopology::Gimbal,
        &solid(0.0, 0.0, 10.0).with_pressure(40.0),
        &VisualizerConfig::default(),
        &SvgRenderOptions::default(),
    )
    .expect("svg");
    assert!(svg.starts_with(r#"<svg id="bellows""#));
    assert!(svg.contains(r#"viewBox="0 0 800 500""#));
    assert!(svg.contains(r#"<linearGradient id="bellows-metal""#));
    assert!(svg.contains(r#"<pattern id="bellows-hatch""#));
    assert!(svg.contains(r#"fill="url(#bellows-metal)""#));
    assert!(svg.contains(r#"marker-end="url(#bellows-arrowhead)""#));
    assert!(svg.contains(r#"filter="url(#bellows-glow-0)""#));
    assert!(svg.contains(r#"stroke-dasharray="4 2""#));
    assert!(svg.contains(">FLOW</text>"));
    assert!(svg.contains(r#"<g class="pressure-overlay">"#));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(!svg.contains("NaN"));
}

#[test]
fn svg_options_prefix_ids_and_paint_background() {
    let s = scene(JointTopology::Axial, DeformationState::default());
    let svg = render_scene_svg(
        &s,
        &SvgRenderOptions {
            diagram_id: Some("joint-a".to_string()),
            background: Some("#0f172a".to_string()),
            viewbox_padding: 10.0,
        },
    );
    assert!(svg.contains(r#"id="joint-a""#));
    assert!(svg.contains(r#"fill="url(#joint-a-hatch)""#));
    assert!(svg.contains(r##"fill="#0f172a""##));
    assert!(svg.contains(r#"viewBox="-10 -10 820 520""#));
}

#[test]
fn outline_path_data_is_closed_svg() {
    let s = scene(JointTopology::Axial, DeformationState::default());
    let Primitive::Path { data, .. } = &s.layer(LayerRole::Body).expect("body").primitives[0]
    else {
        panic!("path");
    };
    let d = path_d(data);
    assert!(d.starts_with("M225,190C"));
    assert!(d.ends_with('Z'));
    assert_eq!(d.matches('C').count(), 40);
    assert_eq!(d.matches('L').count(), 1);
}

#[test]
fn pressure_balanced_cannot_be_rendered() {
    let err = render_svg(
        JointTopology::PressureBalanced,
        &DeformationState::default(),
        &VisualizerConfig::default(),
        &SvgRenderOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        bellows_render::Error::UnsupportedTopology { .. }
    ));
}
