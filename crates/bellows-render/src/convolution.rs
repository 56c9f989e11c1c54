//! Convolution boundary curves of one bellows segment.
//!
//! Every convolution is two cubic pieces: a rise from the base radius to the peak at the
//! convolution midpoint, and a fall back to the base radius. Points are laid out in the
//! unbent local frame and then mapped through the segment's [`ArcFrame`].

use crate::arc::{ArcFrame, DEFAULT_BEND_EPSILON};
use crate::model::{ClosedOutline, CubicSegment, LayoutPoint, PathGeometry};
use bellows_core::VisualizerConfig;
use serde::{Deserialize, Serialize};

/// Which wall of the tube a boundary follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundarySide {
    /// The wall on the negative local `y` side (drawn on top when unbent).
    Outer,
    /// The wall on the positive local `y` side.
    Inner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From the segment start (`x = 0`) to its far end.
    Forward,
    /// From the far end back to the start.
    Backward,
}

/// Cross-section profile shared by every convolution of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvolutionProfile {
    pub radius: f64,
    pub height: f64,
    /// Handle length as a fraction of one convolution's width. 0.35 gives the squared "U".
    pub handle_ratio: f64,
    pub bend_epsilon: f64,
}

impl Default for ConvolutionProfile {
    fn default() -> Self {
        Self {
            radius: 60.0,
            height: 25.0,
            handle_ratio: 0.35,
            bend_epsilon: DEFAULT_BEND_EPSILON,
        }
    }
}

impl From<&VisualizerConfig> for ConvolutionProfile {
    fn from(cfg: &VisualizerConfig) -> Self {
        Self {
            radius: cfg.bellows_radius,
            height: cfg.convolution_height,
            handle_ratio: cfg.handle_ratio,
            bend_epsilon: cfg.bend_epsilon,
        }
    }
}

/// Boundary with the default profile. See [`ConvolutionProfile::generate_boundary`].
pub fn generate_boundary(
    length: f64,
    count: usize,
    side: BoundarySide,
    direction: Direction,
    bend_angle: f64,
) -> PathGeometry {
    ConvolutionProfile::default().generate_boundary(length, count, side, direction, bend_angle)
}

impl ConvolutionProfile {
    pub fn peak_radius(&self) -> f64 {
        self.radius + self.height
    }

    /// `(base_y, peak_y)` of a side in the local frame.
    fn side_offsets(&self, side: BoundarySide) -> (f64, f64) {
        match side {
            BoundarySide::Outer => (-self.radius, -self.peak_radius()),
            BoundarySide::Inner => (self.radius, self.peak_radius()),
        }
    }

    pub fn frame(&self, length: f64, bend_angle: f64) -> ArcFrame {
        ArcFrame::with_epsilon(length, bend_angle, self.bend_epsilon)
    }

    /// Generates one wall of a segment of `length` with `count` convolutions.
    ///
    /// `count == 0` degenerates to a single straight span along the base radius.
    pub fn generate_boundary(
        &self,
        length: f64,
        count: usize,
        side: BoundarySide,
        direction: Direction,
        bend_angle: f64,
    ) -> PathGeometry {
        let frame = self.frame(length, bend_angle);
        let (base_y, peak_y) = self.side_offsets(side);
        let at = |x: f64, y: f64| LayoutPoint::from(frame.transform(x, y));

        if count == 0 {
            let (x0, x1) = match direction {
                Direction::Forward => (0.0, length),
                Direction::Backward => (length, 0.0),
            };
            let third = (x1 - x0) / 3.0;
            return PathGeometry {
                start: at(x0, base_y),
                segments: vec![CubicSegment {
                    ctrl1: at(x0 + third, base_y),
                    ctrl2: at(x1 - third, base_y),
                    to: at(x1, base_y),
                }],
            };
        }

        let w = length / count as f64;
        let handle = w * self.handle_ratio;
        // Convolution boundaries; the last one is pinned to `length` so the pieces sum exactly.
        let x_at = |k: usize| if k == count { length } else { k as f64 * w };

        let mut segments = Vec::with_capacity(count * 2);
        match direction {
            Direction::Forward => {
                for i in 0..count {
                    let x0 = x_at(i);
                    let x_peak = x0 + w * 0.5;
                    let x_end = x_at(i + 1);
                    segments.push(CubicSegment {
                        ctrl1: at(x0 + handle, base_y),
                        ctrl2: at(x_peak - handle, peak_y),
                        to: at(x_peak, peak_y),
                    });
                    segments.push(CubicSegment {
                        ctrl1: at(x_peak + handle, peak_y),
                        ctrl2: at(x_end - handle, base_y),
                        to: at(x_end, base_y),
                    });
                }
                PathGeometry {
                    start: at(0.0, base_y),
                    segments,
                }
            }
            Direction::Backward => {
                for i in (0..count).rev() {
                    let x_end = x_at(i);
                    let x_peak = x_end + w * 0.5;
                    let x_start = x_at(i + 1);
                    segments.push(CubicSegment {
                        ctrl1: at(x_start - handle, base_y),
                        ctrl2: at(x_peak + handle, peak_y),
                        to: at(x_peak, peak_y),
                    });
                    segments.push(CubicSegment {
                        ctrl1: at(x_peak - handle, peak_y),
                        ctrl2: at(x_end + handle, base_y),
                        to: at(x_end, base_y),
                    });
                }
                PathGeometry {
                    start: at(length, base_y),
                    segments,
                }
            }
        }
    }

    /// Closed fill outline: forward outer wall, closing line, backward inner wall.
    pub fn closed_outline(&self, length: f64, count: usize, bend_angle: f64) -> ClosedOutline {
        ClosedOutline {
            forward: self.generate_boundary(
                length,
                count,
                BoundarySide::Outer,
                Direction::Forward,
                bend_angle,
            ),
            backward: self.generate_boundary(
                length,
                count,
                BoundarySide::Inner,
                Direction::Backward,
                bend_angle,
            ),
        }
    }
}
