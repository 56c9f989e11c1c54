//! Joint kinematics: deformation state + topology to an ordered chain of placed segments.

use crate::model::{
    HardwareKind, HardwarePose, LayoutPoint, Pose, SegmentDescriptor, SegmentKind,
    SolvedAssembly,
};
use crate::{Error, Result};
use bellows_core::{DeformationState, JointTopology, VisualizerConfig};

/// Length share of each bellows in the universal topology; the spool takes the rest.
pub const UNIVERSAL_BELLOWS_SHARE: f64 = 0.25;
pub const UNIVERSAL_SPOOL_SHARE: f64 = 0.5;

/// The closed set of kinematic solvers, one per solvable topology family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointSolver {
    /// One bellows segment bent by the angular input, optional lateral shear of the far end.
    Single { hardware: Option<HardwareKind> },
    /// Bellows, tilted spool, bellows: an S-curve with zero net rotation.
    Universal,
}

impl JointSolver {
    pub fn for_topology(topology: JointTopology) -> Option<Self> {
        match topology {
            JointTopology::Axial => Some(Self::Single { hardware: None }),
            JointTopology::Hinged => Some(Self::Single {
                hardware: Some(HardwareKind::HingePin),
            }),
            JointTopology::Gimbal => Some(Self::Single {
                hardware: Some(HardwareKind::GimbalRing),
            }),
            JointTopology::Universal => Some(Self::Universal),
            JointTopology::PressureBalanced => None,
        }
    }
}

/// Solves `topology` under `state`.
///
/// The state is clamped to its documented ranges, then fields the topology's capability set
/// does not allow are zeroed. The result is a pure function of the arguments.
pub fn solve(
    topology: JointTopology,
    state: &DeformationState,
    config: &VisualizerConfig,
) -> Result<SolvedAssembly> {
    let Some(solver) = JointSolver::for_topology(topology) else {
        return Err(Error::UnsupportedTopology { topology });
    };
    let state = state.clamped(config).for_topology(topology);
    let drive = Drive::new(&state, config);

    let mut solved = match solver {
        JointSolver::Single { hardware } => solve_single(&drive, hardware, config),
        JointSolver::Universal => solve_universal(&drive, config),
    };
    solved.topology = topology;
    solved.state = state;
    tracing::debug!(
        %topology,
        total_length = solved.total_length,
        far_x = solved.far_flange.x,
        far_y = solved.far_flange.y,
        far_rotation = solved.far_flange.rotation,
        "solved joint"
    );
    Ok(solved)
}

/// Inputs converted from percentages/degrees to canvas units/radians.
#[derive(Debug, Clone, Copy)]
struct Drive {
    total_length: f64,
    lateral: f64,
    angular: f64,
    origin: LayoutPoint,
}

impl Drive {
    fn new(state: &DeformationState, config: &VisualizerConfig) -> Self {
        let total_length = config.base_length + (state.axial / 100.0) * config.axial_travel;
        Self {
            total_length,
            lateral: (state.lateral / 100.0) * config.lateral_travel,
            angular: state.angular_radians(),
            origin: LayoutPoint::new(
                (config.canvas_width - total_length) / 2.0,
                config.canvas_height / 2.0,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    kind: SegmentKind,
    length: f64,
    bend_angle: f64,
    convolution_count: usize,
}

impl Link {
    fn bellows(length: f64, bend_angle: f64, convolution_count: usize) -> Self {
        Self {
            kind: SegmentKind::Bellows,
            length,
            bend_angle,
            convolution_count,
        }
    }

    fn spool(length: f64) -> Self {
        Self {
            kind: SegmentKind::RigidSpool,
            length,
            bend_angle: 0.0,
            convolution_count: 0,
        }
    }
}

/// Places each link at the end pose of the previous one and returns the final end pose.
///
/// The heading accumulates the links' bend angles exactly, so a chain whose angles cancel ends
/// with rotation `0.0`.
fn chain(links: &[Link], epsilon: f64) -> (Vec<SegmentDescriptor>, Pose) {
    let mut pose = Pose::IDENTITY;
    let mut segments = Vec::with_capacity(links.len());
    for link in links {
        let seg = SegmentDescriptor {
            kind: link.kind,
            length: link.length,
            bend_angle: link.bend_angle,
            convolution_count: link.convolution_count,
            transform: pose,
        };
        tracing::trace!(
            kind = ?seg.kind,
            x = pose.x,
            y = pose.y,
            rotation = pose.rotation,
            "placed segment"
        );
        let end = seg.end_point(epsilon);
        pose = Pose::new(end.x, end.y, pose.rotation + link.bend_angle);
        segments.push(seg);
    }
    (segments, pose)
}

fn solve_single(
    drive: &Drive,
    hardware: Option<HardwareKind>,
    config: &VisualizerConfig,
) -> SolvedAssembly {
    let link = Link::bellows(drive.total_length, drive.angular, config.single_convolutions);
    let (segments, end) = chain(&[link], config.bend_epsilon);

    // Lateral input shears the far end; it is not a bend of the segment itself.
    let far_flange = Pose::new(end.x, end.y + drive.lateral, end.rotation);

    let hardware = hardware.map(|kind| {
        let frame = segments[0].frame(config.bend_epsilon);
        // Pivot sits on the arc at half the sweep, not on the chord midpoint.
        let mid = frame.transform(drive.total_length / 2.0, 0.0);
        HardwarePose {
            kind,
            pivot: LayoutPoint::new(mid.x, mid.y + drive.lateral / 2.0),
            rotation: drive.angular / 2.0,
        }
    });

    SolvedAssembly {
        topology: JointTopology::Axial,
        state: DeformationState::default(),
        total_length: drive.total_length,
        tilt_angle: None,
        segments,
        far_flange,
        hardware,
        origin: drive.origin,
    }
}

/// Common tilt of the universal spool for a lateral offset over `total_length`.
///
/// The `asin` argument is clamped to `±limit`.
pub fn universal_tilt(lateral: f64, total_length: f64, limit: f64) -> f64 {
    let ratio = lateral / total_length;
    let clamped = if ratio.is_finite() {
        ratio.clamp(-limit, limit)
    } else {
        0.0
    };
    if clamped != ratio {
        tracing::debug!(ratio, limit, "universal tilt clamp engaged");
    }
    clamped.asin()
}

fn solve_universal(drive: &Drive, config: &VisualizerConfig) -> SolvedAssembly {
    let bellows_len = drive.total_length * UNIVERSAL_BELLOWS_SHARE;
    let spool_len = drive.total_length * UNIVERSAL_SPOOL_SHARE;
    let effective_len = bellows_len * 2.0 + spool_len;
    let theta = universal_tilt(drive.lateral, effective_len, config.universal_tilt_limit);

    let n = config.universal_convolutions;
    let (segments, far_flange) = chain(
        &[
            Link::bellows(bellows_len, theta, n),
            Link::spool(spool_len),
            Link::bellows(bellows_len, -theta, n),
        ],
        config.bend_epsilon,
    );

    SolvedAssembly {
        topology: JointTopology::Universal,
        state: DeformationState::default(),
        total_length: drive.total_length,
        tilt_angle: Some(theta),
        segments,
        far_flange,
        hardware: None,
        origin: drive.origin,
    }
}
