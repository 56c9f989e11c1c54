use crate::arc::ArcFrame;
use bellows_core::geom::{Point, Transform, placement, point};
use bellows_core::{DeformationState, JointTopology};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        point(self.x, self.y)
    }

    pub fn distance_to(self, other: LayoutPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Point> for LayoutPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One cubic Bezier piece: two control points and an endpoint. The start is implied by the
/// previous piece (or the owning path's `start`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicSegment {
    pub ctrl1: LayoutPoint,
    pub ctrl2: LayoutPoint,
    pub to: LayoutPoint,
}

/// An open chain of cubic segments describing one boundary of a bellows segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathGeometry {
    pub start: LayoutPoint,
    pub segments: Vec<CubicSegment>,
}

impl PathGeometry {
    pub fn end(&self) -> LayoutPoint {
        self.segments.last().map(|s| s.to).unwrap_or(self.start)
    }

    /// Exact reverse traversal: same curve, opposite direction.
    pub fn reversed(&self) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len());
        let mut from = self.start;
        let mut forward: Vec<(LayoutPoint, &CubicSegment)> = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            forward.push((from, seg));
            from = seg.to;
        }
        for (seg_start, seg) in forward.into_iter().rev() {
            segments.push(CubicSegment {
                ctrl1: seg.ctrl2,
                ctrl2: seg.ctrl1,
                to: seg_start,
            });
        }
        Self {
            start: self.end(),
            segments,
        }
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        let map = |p: LayoutPoint| LayoutPoint::from(t.transform_point(p.to_point()));
        Self {
            start: map(self.start),
            segments: self
                .segments
                .iter()
                .map(|s| CubicSegment {
                    ctrl1: map(s.ctrl1),
                    ctrl2: map(s.ctrl2),
                    to: map(s.to),
                })
                .collect(),
        }
    }

    /// The start point followed by every segment endpoint (the on-curve points).
    pub fn junctions(&self) -> Vec<LayoutPoint> {
        std::iter::once(self.start)
            .chain(self.segments.iter().map(|s| s.to))
            .collect()
    }

    /// Every on-curve and control point, in path order.
    pub fn all_points(&self) -> impl Iterator<Item = LayoutPoint> + '_ {
        std::iter::once(self.start).chain(
            self.segments
                .iter()
                .flat_map(|s| [s.ctrl1, s.ctrl2, s.to]),
        )
    }

    /// Bounding box of the control polygon, which always contains the curve.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.all_points().map(|p| (p.x, p.y)))
    }
}

/// Closed fill outline of one bellows segment: forward outer wall, a straight closing line at
/// the far end, then the inner wall traversed backwards. The path closes back onto
/// `forward.start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedOutline {
    pub forward: PathGeometry,
    pub backward: PathGeometry,
}

impl ClosedOutline {
    pub fn closing_line(&self) -> (LayoutPoint, LayoutPoint) {
        (self.forward.end(), self.backward.start)
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            forward: self.forward.transformed(t),
            backward: self.backward.transformed(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Peak,
    Valley,
}

/// A straight cross-sectional rib line drawn across the solid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureLine {
    pub kind: FeatureKind,
    /// Convolution index the line belongs to.
    pub index: usize,
    pub from: LayoutPoint,
    pub to: LayoutPoint,
}

/// Rigid placement (rotation in radians, then translation).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
    };

    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    pub fn position(&self) -> LayoutPoint {
        LayoutPoint::new(self.x, self.y)
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }

    pub fn to_transform(&self) -> Transform {
        placement(self.x, self.y, self.rotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Bellows,
    RigidSpool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub kind: SegmentKind,
    pub length: f64,
    /// Total sweep in radians; always 0 for spools.
    pub bend_angle: f64,
    /// 0 for spools.
    pub convolution_count: usize,
    /// Places the segment's local frame in assembly space.
    pub transform: Pose,
}

impl SegmentDescriptor {
    pub fn frame(&self, epsilon: f64) -> ArcFrame {
        ArcFrame::with_epsilon(self.length, self.bend_angle, epsilon)
    }

    /// Local centerline endpoint mapped into assembly space.
    pub fn end_point(&self, epsilon: f64) -> LayoutPoint {
        let local = self.frame(epsilon).end_point();
        LayoutPoint::from(self.transform.to_transform().transform_point(local))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareKind {
    HingePin,
    GimbalRing,
}

/// Pivot hardware placement; derived from the bent segment, never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardwarePose {
    pub kind: HardwareKind,
    pub pivot: LayoutPoint,
    /// Half the bend angle, in radians.
    pub rotation: f64,
}

/// Output of the kinematics solver, in assembly space (origin at the fixed flange face,
/// x along the flow axis, y down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedAssembly {
    pub topology: JointTopology,
    /// The state actually solved, after capability filtering.
    pub state: DeformationState,
    /// Flange-to-flange length along the (unbent) axis.
    pub total_length: f64,
    /// Common tilt of the universal topology's spool, radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt_angle: Option<f64>,
    pub segments: Vec<SegmentDescriptor>,
    pub far_flange: Pose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<HardwarePose>,
    /// Canvas position of the assembly origin.
    pub origin: LayoutPoint,
}

impl SolvedAssembly {
    /// Assembly-to-canvas transform.
    pub fn canvas_transform(&self) -> Transform {
        placement(self.origin.x, self.origin.y, 0.0)
    }
}
