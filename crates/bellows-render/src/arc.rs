//! Bending of a straight local frame onto a circular arc.
//!
//! The local frame has `x` along the segment axis (`0..=length`) and `y` perpendicular to it
//! (radial offset from the tube centerline, canvas convention: positive `y` points down).
//! A positive bend angle curves the axis towards positive `y`; the center of curvature sits at
//! `(0, R)` with `R = length / bend_angle`.

use bellows_core::geom::{Point, point};

/// Bend angles at or below this magnitude (radians) are treated as straight.
pub const DEFAULT_BEND_EPSILON: f64 = 1e-3;

/// Maps `(local_x, local_y)` onto the arc of total sweep `bend_angle` over `segment_length`.
pub fn transform(local_x: f64, local_y: f64, segment_length: f64, bend_angle: f64) -> Point {
    ArcFrame::new(segment_length, bend_angle).transform(local_x, local_y)
}

/// A segment's bending frame, reusable for every point of the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcFrame {
    length: f64,
    bend_angle: f64,
    /// `None` when the frame is straight.
    radius: Option<f64>,
}

impl ArcFrame {
    pub fn new(length: f64, bend_angle: f64) -> Self {
        Self::with_epsilon(length, bend_angle, DEFAULT_BEND_EPSILON)
    }

    pub fn with_epsilon(length: f64, bend_angle: f64, epsilon: f64) -> Self {
        let bent = bend_angle.is_finite()
            && bend_angle.abs() > epsilon
            && length.is_finite()
            && length.abs() > f64::EPSILON;
        Self {
            length,
            bend_angle,
            radius: bent.then(|| length / bend_angle),
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn bend_angle(&self) -> f64 {
        self.bend_angle
    }

    pub fn is_bent(&self) -> bool {
        self.radius.is_some()
    }

    /// Signed radius of curvature, `None` for the straight case.
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    /// Uses `r = R - local_y`. The textbook `R + local_y` mirrors the walls (`y -> -y`) and does
    /// not reduce to the identity as the bend angle goes to zero.
    pub fn transform(&self, local_x: f64, local_y: f64) -> Point {
        let Some(r0) = self.radius else {
            return point(local_x, local_y);
        };
        let theta = (local_x / self.length) * self.bend_angle;
        // Offsets towards the center of curvature shrink the radius; arc length along the axis
        // and distance from the axis are both preserved.
        let r = r0 - local_y;
        let (sin, cos) = theta.sin_cos();
        point(r * sin, r0 - r * cos)
    }

    pub fn transform_point(&self, p: Point) -> Point {
        self.transform(p.x, p.y)
    }

    /// Centerline position at the far end of the segment.
    pub fn end_point(&self) -> Point {
        self.transform(self.length, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_frame_is_identity() {
        let f = ArcFrame::new(350.0, 0.0);
        assert!(!f.is_bent());
        assert_eq!(f.transform(12.5, -60.0), point(12.5, -60.0));
        assert_eq!(f.end_point(), point(350.0, 0.0));
    }

    #[test]
    fn epsilon_guard_is_inclusive() {
        assert!(!ArcFrame::new(100.0, DEFAULT_BEND_EPSILON).is_bent());
        assert!(!ArcFrame::new(100.0, -DEFAULT_BEND_EPSILON).is_bent());
        assert!(ArcFrame::new(100.0, 2.0 * DEFAULT_BEND_EPSILON).is_bent());
        assert!(!ArcFrame::new(0.0, 0.5).is_bent());
    }

    #[test]
    fn quarter_turn_lands_on_the_circle() {
        let len = 100.0;
        let angle = std::f64::consts::FRAC_PI_2;
        let r = len / angle;
        let end = ArcFrame::new(len, angle).end_point();
        assert!((end.x - r).abs() < 1e-9);
        assert!((end.y - r).abs() < 1e-9);
    }
}
