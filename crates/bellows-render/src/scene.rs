//! Renderer-agnostic display list produced by the compositor.
//!
//! Every coordinate is in canvas space (origin top-left, y down). Rects and circles carry a
//! rigid [`Pose`] so that rotated hardware keeps its local dimensions.

use crate::model::{ClosedOutline, LayoutPoint, PathGeometry, Pose};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Back to front.
    pub layers: Vec<Layer>,
}

impl Scene {
    pub fn layer(&self, role: LayerRole) -> Option<&Layer> {
        self.layers.iter().find(|l| l.role == role)
    }

    pub fn roles(&self) -> Vec<LayerRole> {
        self.layers.iter().map(|l| l.role).collect()
    }

    pub fn primitive_count(&self) -> usize {
        self.layers.iter().map(|l| l.primitives.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    BackShading,
    Body,
    Features,
    Highlights,
    Flanges,
    Hardware,
    FlowIndicator,
    PressureOverlay,
}

impl LayerRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BackShading => "back-shading",
            Self::Body => "body",
            Self::Features => "features",
            Self::Highlights => "highlights",
            Self::Flanges => "flanges",
            Self::Hardware => "hardware",
            Self::FlowIndicator => "flow-indicator",
            Self::PressureOverlay => "pressure-overlay",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub role: LayerRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    pub primitives: Vec<Primitive>,
}

impl Layer {
    pub fn new(role: LayerRole) -> Self {
        Self {
            role,
            opacity: None,
            primitives: Vec::new(),
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// Paint servers known to the SVG writer's `<defs>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    /// Vertical brushed-metal gradient.
    Metal,
    /// Specular band of the rigid spool.
    PipeShine,
    /// Diagonal line pattern of the cut face.
    Hatch,
    Color(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
    pub round_cap: bool,
}

impl Stroke {
    pub fn new(color: &'static str, width: f64) -> Self {
        Self {
            color,
            width,
            opacity: None,
            dash: None,
            round_cap: false,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn dashed(mut self, dash: &'static str) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn round(mut self) -> Self {
        self.round_cap = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Style {
    pub fn fill(paint: Paint) -> Self {
        Self {
            fill: Some(paint),
            ..Self::default()
        }
    }

    pub fn stroke(stroke: Stroke) -> Self {
        Self {
            stroke: Some(stroke),
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(LayoutPoint),
    LineTo(LayoutPoint),
    CubicTo {
        ctrl1: LayoutPoint,
        ctrl2: LayoutPoint,
        to: LayoutPoint,
    },
    Close,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    pub fn polyline(points: &[LayoutPoint]) -> Self {
        let mut commands = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            commands.push(if i == 0 {
                PathCommand::MoveTo(*p)
            } else {
                PathCommand::LineTo(*p)
            });
        }
        Self { commands }
    }

    fn push_cubics(&mut self, geometry: &PathGeometry) {
        self.commands
            .extend(geometry.segments.iter().map(|s| PathCommand::CubicTo {
                ctrl1: s.ctrl1,
                ctrl2: s.ctrl2,
                to: s.to,
            }));
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }
}

impl From<&PathGeometry> for PathData {
    fn from(geometry: &PathGeometry) -> Self {
        let mut out = Self {
            commands: vec![PathCommand::MoveTo(geometry.start)],
        };
        out.push_cubics(geometry);
        out
    }
}

impl From<&ClosedOutline> for PathData {
    fn from(outline: &ClosedOutline) -> Self {
        let mut out = Self::from(&outline.forward);
        out.commands
            .push(PathCommand::LineTo(outline.closing_line().1));
        out.push_cubics(&outline.backward);
        out.commands.push(PathCommand::Close);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Arrowhead,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Path {
        data: PathData,
        style: Style,
    },
    Rect {
        placement: Pose,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
        style: Style,
    },
    Circle {
        placement: Pose,
        cx: f64,
        cy: f64,
        r: f64,
        style: Style,
    },
    Line {
        from: LayoutPoint,
        to: LayoutPoint,
        stroke: Stroke,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker_end: Option<Marker>,
    },
    Text {
        at: LayoutPoint,
        content: String,
        color: &'static str,
        font_size: f64,
        font_family: &'static str,
        anchor: TextAnchor,
    },
    /// Soft blurred ellipse.
    Glow {
        center: LayoutPoint,
        rx: f64,
        ry: f64,
        color: &'static str,
        opacity: f64,
        blur: f64,
    },
}
