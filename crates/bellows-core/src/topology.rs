use crate::catalog::{JOINT_CATALOG, JointConfig};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of joint topologies the visualizer knows about.
///
/// `PressureBalanced` is part of the vocabulary but has no catalog entry and no kinematic solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JointTopology {
    Axial,
    /// Dual bellows joined by a rigid spool ("lateral" joint).
    #[serde(alias = "lateral")]
    Universal,
    Hinged,
    Gimbal,
    PressureBalanced,
}

impl JointTopology {
    pub const ALL: [JointTopology; 5] = [
        JointTopology::Axial,
        JointTopology::Universal,
        JointTopology::Hinged,
        JointTopology::Gimbal,
        JointTopology::PressureBalanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JointTopology::Axial => "axial",
            JointTopology::Universal => "universal",
            JointTopology::Hinged => "hinged",
            JointTopology::Gimbal => "gimbal",
            JointTopology::PressureBalanced => "pressure-balanced",
        }
    }

    /// Static catalog record, if this topology has one.
    pub fn config(self) -> Option<&'static JointConfig> {
        JOINT_CATALOG.iter().find(|c| c.id == self)
    }

    /// Like [`JointTopology::config`], but reports a missing entry as an error.
    pub fn require_config(self) -> Result<&'static JointConfig> {
        self.config()
            .ok_or(Error::MissingCatalogEntry { topology: self })
    }

    /// Deformation fields that are kinematically meaningful for this topology.
    ///
    /// Topologies without a catalog entry accept nothing.
    pub fn capabilities(self) -> AllowedDeformation {
        self.config()
            .map(|c| c.allowed_deformation)
            .unwrap_or(AllowedDeformation::NONE)
    }
}

impl fmt::Display for JointTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointTopology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        match norm.as_str() {
            "axial" | "single-axial" => Ok(Self::Axial),
            "universal" | "lateral" => Ok(Self::Universal),
            "hinged" => Ok(Self::Hinged),
            "gimbal" => Ok(Self::Gimbal),
            "pressure-balanced" | "pressurebalanced" => Ok(Self::PressureBalanced),
            _ => Err(Error::UnknownTopology {
                name: s.to_string(),
            }),
        }
    }
}

/// Capability set of a joint: which deformation inputs it mechanically absorbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllowedDeformation {
    /// Compression / extension.
    pub axial: bool,
    /// Offset perpendicular to the flow axis.
    pub lateral: bool,
    /// Rotation.
    pub angular: bool,
}

impl AllowedDeformation {
    pub const NONE: AllowedDeformation = AllowedDeformation {
        axial: false,
        lateral: false,
        angular: false,
    };
}
