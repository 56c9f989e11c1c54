//! Assembly compositor: solved segments to a layered [`Scene`] in canvas space.

use crate::convolution::{BoundarySide, ConvolutionProfile, Direction};
use crate::model::{
    FeatureKind, HardwareKind, HardwarePose, LayoutPoint, PathGeometry, Pose, SegmentDescriptor,
    SegmentKind, SolvedAssembly,
};
use crate::scene::{
    Layer, LayerRole, Marker, PathData, Paint, Primitive, Scene, Stroke, Style, TextAnchor,
};
use bellows_core::geom::{Transform, point, vector};
use bellows_core::{DeformationState, VisualizerConfig};

const ACCENT: &str = "#38bdf8";
const SHADOW: &str = "#1e293b";
const EDGE: &str = "#475569";
const DARK_EDGE: &str = "#334155";
const ARM: &str = "#64748b";
const PIN: &str = "#cbd5e1";
const PIN_SIDE: &str = "#94a3b8";
const WHITE: &str = "white";
const BLACK: &str = "black";
const PRESSURE_RED: &str = "#ef4444";

/// Local offset of the back-face shading copy of the body.
const BACK_SHADING_OFFSET: f64 = -3.0;
const FEATURE_LAYER_OPACITY: f64 = 0.7;
const HATCH_OPACITY: f64 = 0.15;

const HINGE_PIN_RADIUS: f64 = 14.0;
const HINGE_PIN_CORE_RADIUS: f64 = 6.0;
/// Arms anchor this far behind the fixed flange face.
const ARM_INSET: f64 = 10.0;
const GIMBAL_RING_HALF_WIDTH: f64 = 40.0;
const GIMBAL_RING_HALF_HEIGHT: f64 = 110.0;
const GIMBAL_PIN_RADIUS: f64 = 8.0;

const FLOW_OFFSET: (f64, f64) = (-80.0, -120.0);
const FLOW_OPACITY: f64 = 0.6;
const PRESSURE_BLUR: f64 = 64.0;

/// Opacity of the pressure glow, or `None` when no overlay is drawn.
///
/// The overlay only accompanies the solid rendering and only for a positive pressure.
pub fn pressure_overlay_opacity(
    state: &DeformationState,
    config: &VisualizerConfig,
) -> Option<f64> {
    if state.pressure > 0.0 && !state.cross_section_mode {
        Some(state.pressure / config.pressure_opacity_divisor)
    } else {
        None
    }
}

/// Canvas placement of a pose given in assembly space.
fn canvas_pose(solved: &SolvedAssembly, pose: &Pose) -> Pose {
    Pose::new(
        solved.origin.x + pose.x,
        solved.origin.y + pose.y,
        pose.rotation,
    )
}

fn canvas_point(solved: &SolvedAssembly, x: f64, y: f64) -> LayoutPoint {
    LayoutPoint::new(solved.origin.x + x, solved.origin.y + y)
}

#[derive(Debug)]
struct Layers {
    back_shading: Layer,
    body: Layer,
    features: Layer,
    highlights: Layer,
    flanges: Layer,
    hardware: Layer,
    flow: Layer,
    pressure: Layer,
}

impl Layers {
    fn new() -> Self {
        Self {
            back_shading: Layer::new(LayerRole::BackShading),
            body: Layer::new(LayerRole::Body),
            features: Layer::new(LayerRole::Features).with_opacity(FEATURE_LAYER_OPACITY),
            highlights: Layer::new(LayerRole::Highlights),
            flanges: Layer::new(LayerRole::Flanges),
            hardware: Layer::new(LayerRole::Hardware),
            flow: Layer::new(LayerRole::FlowIndicator).with_opacity(FLOW_OPACITY),
            pressure: Layer::new(LayerRole::PressureOverlay),
        }
    }

    /// Draw order, back to front; empty layers are dropped.
    fn into_vec(self) -> Vec<Layer> {
        [
            self.back_shading,
            self.body,
            self.features,
            self.highlights,
            self.flanges,
            self.hardware,
            self.flow,
            self.pressure,
        ]
        .into_iter()
        .filter(|l| !l.primitives.is_empty())
        .collect()
    }
}

/// Builds the complete drawing of a solved assembly.
///
/// Segments are walked in traversal order; each one contributes to the shared back-shading,
/// body, feature and highlight layers so the layering holds across segment boundaries.
pub fn compose(solved: &SolvedAssembly, config: &VisualizerConfig) -> Scene {
    let mut layers = Layers::new();
    let profile = ConvolutionProfile::from(config);
    let cross_section = solved.state.cross_section_mode;
    let canvas = solved.canvas_transform();

    for seg in &solved.segments {
        match seg.kind {
            SegmentKind::Bellows => draw_bellows(&mut layers, seg, &profile, &canvas, cross_section),
            SegmentKind::RigidSpool => {
                draw_spool(&mut layers, solved, seg, config, &canvas, cross_section)
            }
        }
    }

    draw_flanges(&mut layers.flanges, solved, config);
    if let Some(hw) = &solved.hardware {
        draw_hardware(&mut layers.hardware, solved, hw, config);
    }
    draw_flow_indicator(&mut layers.flow, solved);

    if let Some(opacity) = pressure_overlay_opacity(&solved.state, config) {
        layers.pressure.primitives.push(Primitive::Glow {
            center: LayoutPoint::new(config.canvas_width / 2.0, config.canvas_height / 2.0),
            rx: config.canvas_width * 0.375,
            ry: config.canvas_height * 0.25,
            color: PRESSURE_RED,
            opacity,
            blur: PRESSURE_BLUR,
        });
    }

    let layers = layers.into_vec();
    tracing::trace!(layers = layers.len(), "composed scene");
    Scene {
        width: config.canvas_width,
        height: config.canvas_height,
        layers,
    }
}

fn stroked_path(geometry: &PathGeometry, stroke: Stroke) -> Primitive {
    Primitive::Path {
        data: PathData::from(geometry),
        style: Style::stroke(stroke),
    }
}

fn draw_bellows(
    layers: &mut Layers,
    seg: &SegmentDescriptor,
    profile: &ConvolutionProfile,
    canvas: &Transform,
    cross_section: bool,
) {
    let to_canvas = seg.transform.to_transform().then(canvas);
    let (len, count, bend) = (seg.length, seg.convolution_count, seg.bend_angle);

    let outline = profile.closed_outline(len, count, bend);
    let top = profile
        .generate_boundary(len, count, BoundarySide::Outer, Direction::Forward, bend)
        .transformed(&to_canvas);
    let bottom = profile
        .generate_boundary(len, count, BoundarySide::Inner, Direction::Forward, bend)
        .transformed(&to_canvas);

    if cross_section {
        layers.body.primitives.push(Primitive::Path {
            data: PathData::from(&outline.transformed(&to_canvas)),
            style: Style::fill(Paint::Hatch).with_opacity(HATCH_OPACITY),
        });
        layers
            .highlights
            .primitives
            .push(stroked_path(&top, Stroke::new(ACCENT, 3.0)));
        layers
            .highlights
            .primitives
            .push(stroked_path(&bottom, Stroke::new(ACCENT, 3.0)));
        return;
    }

    let shaded = Transform::translation(0.0, BACK_SHADING_OFFSET).then(&to_canvas);
    layers.back_shading.primitives.push(Primitive::Path {
        data: PathData::from(&outline.transformed(&shaded)),
        style: Style::fill(Paint::Color(SHADOW)).with_opacity(0.5),
    });
    layers.body.primitives.push(Primitive::Path {
        data: PathData::from(&outline.transformed(&to_canvas)),
        style: Style::fill(Paint::Metal).with_stroke(Stroke::new(EDGE, 1.0)),
    });

    for rib in profile.generate_feature_lines(len, count, bend) {
        let stroke = match rib.kind {
            FeatureKind::Peak => Stroke::new(WHITE, 1.5).with_opacity(0.3),
            FeatureKind::Valley => Stroke::new(BLACK, 1.0).with_opacity(0.3),
        };
        layers.features.primitives.push(Primitive::Line {
            from: to_canvas.transform_point(rib.from.to_point()).into(),
            to: to_canvas.transform_point(rib.to.to_point()).into(),
            stroke,
            marker_end: None,
        });
    }

    layers
        .highlights
        .primitives
        .push(stroked_path(&top, Stroke::new(WHITE, 2.0).with_opacity(0.2)));
    layers
        .highlights
        .primitives
        .push(stroked_path(&bottom, Stroke::new(BLACK, 2.0).with_opacity(0.4)));
}

fn draw_spool(
    layers: &mut Layers,
    solved: &SolvedAssembly,
    seg: &SegmentDescriptor,
    config: &VisualizerConfig,
    canvas: &Transform,
    cross_section: bool,
) {
    let r = config.bellows_radius;
    let len = seg.length;
    let placement = canvas_pose(solved, &seg.transform);

    // Overlaps both neighbouring bellows by a hair to hide the seam.
    layers.body.primitives.push(Primitive::Rect {
        placement,
        x: -2.0,
        y: -r,
        width: len + 4.0,
        height: r * 2.0,
        rx: 0.0,
        style: Style::fill(Paint::Metal).with_stroke(Stroke::new(DARK_EDGE, 1.0)),
    });
    if cross_section {
        return;
    }

    layers.body.primitives.push(Primitive::Rect {
        placement,
        x: 0.0,
        y: -r,
        width: len,
        height: r * 2.0,
        rx: 0.0,
        style: Style::fill(Paint::PipeShine),
    });
    let to_canvas = seg.transform.to_transform().then(canvas);
    let edge = |y: f64| {
        (
            LayoutPoint::from(to_canvas.transform_point(point(0.0, y))),
            LayoutPoint::from(to_canvas.transform_point(point(len, y))),
        )
    };
    for (y, color) in [(-r, WHITE), (r, BLACK)] {
        let (from, to) = edge(y);
        layers.highlights.primitives.push(Primitive::Line {
            from,
            to,
            stroke: Stroke::new(color, 1.0).with_opacity(0.5),
            marker_end: None,
        });
    }
}

fn draw_flanges(layer: &mut Layer, solved: &SolvedAssembly, config: &VisualizerConfig) {
    let h = config.flange_half_height;
    let t = config.flange_thickness;
    let stub = config.flange_stub;
    let r = config.bellows_radius;
    let plate = Style::fill(Paint::Metal).with_stroke(Stroke::new(EDGE, 1.0));
    let pipe = Style::fill(Paint::Color(EDGE));

    let near = canvas_pose(solved, &Pose::IDENTITY);
    let far = canvas_pose(solved, &solved.far_flange);
    // (placement, plate x, stub x): the near flange extends upstream, the far one downstream.
    for (placement, plate_x, stub_x) in [(near, -t, -t - stub), (far, 0.0, t)] {
        layer.primitives.push(Primitive::Rect {
            placement,
            x: plate_x,
            y: -h,
            width: t,
            height: h * 2.0,
            rx: 2.0,
            style: plate,
        });
        layer.primitives.push(Primitive::Rect {
            placement,
            x: stub_x,
            y: -r,
            width: stub,
            height: r * 2.0,
            rx: 0.0,
            style: pipe,
        });
    }
}

fn draw_hardware(
    layer: &mut Layer,
    solved: &SolvedAssembly,
    hw: &HardwarePose,
    config: &VisualizerConfig,
) {
    let placement = canvas_pose(solved, &Pose::new(hw.pivot.x, hw.pivot.y, hw.rotation));
    let pivot = canvas_point(solved, hw.pivot.x, hw.pivot.y);
    let far = solved.far_flange;

    match hw.kind {
        HardwareKind::HingePin => {
            let h = config.flange_half_height;
            let arm = Style::stroke(Stroke::new(ARM, 5.0).round());
            layer.primitives.push(Primitive::Circle {
                placement,
                cx: 0.0,
                cy: 0.0,
                r: HINGE_PIN_RADIUS,
                style: Style::fill(Paint::Color(PIN)).with_stroke(Stroke::new(DARK_EDGE, 2.0)),
            });
            layer.primitives.push(Primitive::Circle {
                placement,
                cx: 0.0,
                cy: 0.0,
                r: HINGE_PIN_CORE_RADIUS,
                style: Style::fill(Paint::Color(DARK_EDGE)),
            });
            layer.primitives.push(Primitive::Path {
                data: PathData::polyline(&[
                    canvas_point(solved, -ARM_INSET, -h),
                    pivot,
                    canvas_point(solved, -ARM_INSET, h),
                ]),
                style: arm,
            });
            layer.primitives.push(Primitive::Path {
                data: PathData::polyline(&[
                    canvas_point(solved, far.x, far.y - h),
                    pivot,
                    canvas_point(solved, far.x, far.y + h),
                ]),
                style: arm,
            });
        }
        HardwareKind::GimbalRing => {
            let (hw_x, hh) = (GIMBAL_RING_HALF_WIDTH, GIMBAL_RING_HALF_HEIGHT);
            layer.primitives.push(Primitive::Rect {
                placement,
                x: -hw_x,
                y: -hh,
                width: hw_x * 2.0,
                height: hh * 2.0,
                rx: 12.0,
                style: Style::stroke(Stroke::new(EDGE, 8.0)),
            });
            for (cx, cy, fill) in [
                (0.0, -hh, PIN),
                (0.0, hh, PIN),
                (-hw_x, 0.0, PIN_SIDE),
                (hw_x, 0.0, PIN_SIDE),
            ] {
                layer.primitives.push(Primitive::Circle {
                    placement,
                    cx,
                    cy,
                    r: GIMBAL_PIN_RADIUS,
                    style: Style::fill(Paint::Color(fill))
                        .with_stroke(Stroke::new(DARK_EDGE, 1.0)),
                });
            }
            let link = Stroke::new(ARM, 4.0).dashed("4 2");
            layer.primitives.push(Primitive::Line {
                from: canvas_point(solved, -ARM_INSET, 0.0),
                to: LayoutPoint::new(pivot.x - hw_x, pivot.y),
                stroke: link,
                marker_end: None,
            });
            layer.primitives.push(Primitive::Line {
                from: canvas_point(solved, far.x + ARM_INSET, far.y),
                to: LayoutPoint::new(pivot.x + hw_x, pivot.y),
                stroke: link,
                marker_end: None,
            });
        }
    }
}

fn draw_flow_indicator(layer: &mut Layer, solved: &SolvedAssembly) {
    let anchor = canvas_point(solved, FLOW_OFFSET.0, FLOW_OFFSET.1);
    let at = |dx: f64, dy: f64| LayoutPoint::from(anchor.to_point() + vector(dx, dy));
    layer.primitives.push(Primitive::Text {
        at: at(0.0, -15.0),
        content: "FLOW".to_string(),
        color: ACCENT,
        font_size: 12.0,
        font_family: "monospace",
        anchor: TextAnchor::Middle,
    });
    layer.primitives.push(Primitive::Line {
        from: at(-30.0, 0.0),
        to: at(30.0, 0.0),
        stroke: Stroke::new(ACCENT, 2.0),
        marker_end: Some(Marker::Arrowhead),
    });
}
