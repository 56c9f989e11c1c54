use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on convolutions per bellows accepted by [`VisualizerConfig::validate`].
pub const MAX_CONVOLUTIONS: usize = 1000;

/// Drawing and kinematic constants of the visualizer.
///
/// All lengths are logical canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizerConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Base (valley) radius of the corrugated wall.
    pub bellows_radius: f64,
    /// Peak amplitude above `bellows_radius`.
    pub convolution_height: f64,
    /// Nominal flange-to-flange length.
    pub base_length: f64,
    /// Length change at 100 % axial.
    pub axial_travel: f64,
    /// Lateral offset at 100 % lateral.
    pub lateral_travel: f64,
    pub single_convolutions: usize,
    pub universal_convolutions: usize,
    /// Bend angles at or below this magnitude are drawn straight.
    pub bend_epsilon: f64,
    /// Bezier handle length as a fraction of one convolution's width.
    pub handle_ratio: f64,
    /// Clamp applied to the `asin` argument of the universal tilt solve.
    pub universal_tilt_limit: f64,
    pub max_angular_deg: f64,
    pub flange_half_height: f64,
    pub flange_thickness: f64,
    pub flange_stub: f64,
    pub pressure_opacity_divisor: f64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 500.0,
            bellows_radius: 60.0,
            convolution_height: 25.0,
            base_length: 350.0,
            axial_travel: 40.0,
            lateral_travel: 80.0,
            single_convolutions: 10,
            universal_convolutions: 5,
            bend_epsilon: 1e-3,
            handle_ratio: 0.35,
            universal_tilt_limit: 0.8,
            max_angular_deg: 20.0,
            flange_half_height: 90.0,
            flange_thickness: 20.0,
            flange_stub: 20.0,
            pressure_opacity_divisor: 200.0,
        }
    }
}

impl VisualizerConfig {
    /// Deep-merges `overrides` onto the defaults and validates the result.
    pub fn from_value(overrides: &Value) -> Result<Self> {
        Self::default().with_overrides(overrides)
    }

    /// Parses a JSON or YAML document (YAML is a superset, so one parser covers both).
    pub fn from_str_any(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn with_overrides(&self, overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        deep_merge_value(&mut base, overrides);
        let merged: Self = serde_json::from_value(base).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("bellows_radius", self.bellows_radius),
            ("base_length", self.base_length),
            ("pressure_opacity_divisor", self.pressure_opacity_divisor),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a positive number, got {v}"),
                });
            }
        }
        if !(self.bend_epsilon.is_finite() && self.bend_epsilon >= 0.0) {
            return Err(Error::InvalidConfig {
                message: format!("bend_epsilon must be >= 0, got {}", self.bend_epsilon),
            });
        }
        if !(self.universal_tilt_limit > 0.0 && self.universal_tilt_limit <= 1.0) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "universal_tilt_limit must be in (0, 1], got {}",
                    self.universal_tilt_limit
                ),
            });
        }
        for (name, count) in [
            ("single_convolutions", self.single_convolutions),
            ("universal_convolutions", self.universal_convolutions),
        ] {
            if count > MAX_CONVOLUTIONS {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be at most {MAX_CONVOLUTIONS}, got {count}"),
                });
            }
        }
        // The axial range must never collapse the assembly.
        if self.base_length - self.axial_travel <= 0.0 {
            return Err(Error::InvalidConfig {
                message: "axial_travel must be shorter than base_length".to_string(),
            });
        }
        Ok(())
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
