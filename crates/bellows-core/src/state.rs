use crate::config::VisualizerConfig;
use crate::topology::{AllowedDeformation, JointTopology};
use serde::{Deserialize, Serialize};

/// Pressure above which the pressure status lamp turns to its warning state (bar).
pub const PRESSURE_WARNING_BAR: f64 = 20.0;

/// Live deformation inputs, owned by the control surface and read-only to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeformationState {
    /// Signed percentage (-100..=100) of the nominal axial travel. Positive extends.
    pub axial: f64,
    /// Percentage (0..=100) of the nominal lateral travel.
    pub lateral: f64,
    /// Signed rotation in degrees.
    pub angular: f64,
    /// Internal pressure in bar (0..=50). Cosmetic only.
    pub pressure: f64,
    /// `true` draws the cut-open outline, `false` the opaque solid body.
    #[serde(alias = "showCrossSection")]
    pub cross_section_mode: bool,
}

impl Default for DeformationState {
    fn default() -> Self {
        Self {
            axial: 0.0,
            lateral: 0.0,
            angular: 0.0,
            pressure: 0.0,
            cross_section_mode: true,
        }
    }
}

/// The three status lamps of the info bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadStatus {
    pub axial_load: bool,
    pub shear: bool,
    pub pressure_high: bool,
}

impl DeformationState {
    pub fn new(axial: f64, lateral: f64, angular: f64) -> Self {
        Self {
            axial,
            lateral,
            angular,
            ..Self::default()
        }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_cross_section(mut self, cross_section_mode: bool) -> Self {
        self.cross_section_mode = cross_section_mode;
        self
    }

    /// Zeroes every kinematic field the capability set does not allow.
    ///
    /// `pressure` and `cross_section_mode` are presentation inputs and pass through untouched.
    pub fn restricted_to(&self, allowed: AllowedDeformation) -> Self {
        let mut out = *self;
        if !allowed.axial && out.axial != 0.0 {
            tracing::debug!(axial = out.axial, "axial input ignored by topology");
            out.axial = 0.0;
        }
        if !allowed.lateral && out.lateral != 0.0 {
            tracing::debug!(lateral = out.lateral, "lateral input ignored by topology");
            out.lateral = 0.0;
        }
        if !allowed.angular && out.angular != 0.0 {
            tracing::debug!(angular = out.angular, "angular input ignored by topology");
            out.angular = 0.0;
        }
        out
    }

    /// Convenience for `restricted_to(topology.capabilities())`.
    pub fn for_topology(&self, topology: JointTopology) -> Self {
        self.restricted_to(topology.capabilities())
    }

    /// Clamps every field to its documented range. Non-finite values become 0.
    pub fn clamped(&self, config: &VisualizerConfig) -> Self {
        fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
            if v.is_finite() { v.clamp(lo, hi) } else { 0.0 }
        }
        let max_angular = config.max_angular_deg.abs();
        Self {
            axial: clamp(self.axial, -100.0, 100.0),
            lateral: clamp(self.lateral, 0.0, 100.0),
            angular: clamp(self.angular, -max_angular, max_angular),
            pressure: clamp(self.pressure, 0.0, 50.0),
            cross_section_mode: self.cross_section_mode,
        }
    }

    pub fn load_status(&self) -> LoadStatus {
        LoadStatus {
            axial_load: self.axial != 0.0,
            shear: self.lateral != 0.0,
            pressure_high: self.pressure > PRESSURE_WARNING_BAR,
        }
    }

    /// Rotation input in radians.
    pub fn angular_radians(&self) -> f64 {
        self.angular.to_radians()
    }
}
