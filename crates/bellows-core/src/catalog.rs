use crate::topology::{AllowedDeformation, JointTopology};
use serde::Serialize;

/// Static description of one joint type, as shown in a joint picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JointConfig {
    pub id: JointTopology,
    pub name: &'static str,
    pub description: &'static str,
    pub allowed_deformation: AllowedDeformation,
    pub features: &'static [&'static str],
}

pub static JOINT_CATALOG: [JointConfig; 4] = [
    JointConfig {
        id: JointTopology::Axial,
        name: "Single Axial",
        description: "The simplest expansion joint. Absorbs axial movement (compression and \
                      extension) of the pipe section it is installed in.",
        allowed_deformation: AllowedDeformation {
            axial: true,
            lateral: false,
            angular: false,
        },
        features: &[
            "Low cost",
            "Simple design",
            "Requires main anchors",
            "Cannot absorb lateral offset",
        ],
    },
    JointConfig {
        id: JointTopology::Universal,
        name: "Universal",
        description: "Two bellows joined by a center spool. Absorbs large lateral deflection in \
                      addition to axial movement.",
        allowed_deformation: AllowedDeformation {
            axial: true,
            lateral: true,
            angular: false,
        },
        features: &[
            "Absorbs large lateral offset",
            "Absorbs axial movement",
            "Tie rods can carry pressure thrust",
        ],
    },
    JointConfig {
        id: JointTopology::Hinged,
        name: "Hinged",
        description: "A single bellows restrained by a pair of pins through hinge plates, \
                      allowing angular rotation in one plane only.",
        allowed_deformation: AllowedDeformation {
            axial: false,
            lateral: false,
            angular: true,
        },
        features: &[
            "Absorbs angular rotation",
            "Carries pressure thrust",
            "Usually installed in pairs or sets",
        ],
    },
    JointConfig {
        id: JointTopology::Gimbal,
        name: "Gimbal",
        description: "Two pairs of hinges fixed to a common floating gimbal ring, allowing \
                      angular rotation in any plane.",
        allowed_deformation: AllowedDeformation {
            axial: false,
            lateral: false,
            angular: true,
        },
        features: &[
            "Multi-plane rotation",
            "Carries pressure thrust",
            "Robust construction",
        ],
    },
];
