//! Auto-oscillation demo driver.
//!
//! The clock lives outside the geometry engine: it only produces fresh [`DeformationState`]
//! values, which the owner feeds to the solver at whatever cadence it refreshes the display.

use crate::state::DeformationState;
use crate::topology::AllowedDeformation;

/// Phase advance per display tick.
pub const DEFAULT_PHASE_STEP: f64 = 0.03;

/// Peak axial swing, in percent.
pub const AXIAL_AMPLITUDE: f64 = 40.0;
/// Peak lateral swing, in percent (one-sided).
pub const LATERAL_AMPLITUDE: f64 = 60.0;
/// Peak angular swing, in degrees.
pub const ANGULAR_AMPLITUDE: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    phase: f64,
    step: f64,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(DEFAULT_PHASE_STEP)
    }
}

impl Oscillator {
    pub fn new(step: f64) -> Self {
        Self { phase: 0.0, step }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Rewinds to phase 0 (done whenever the selected joint changes).
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advances the phase by one step and returns the next state derived from `prev`.
    pub fn tick(&mut self, allowed: AllowedDeformation, prev: &DeformationState) -> DeformationState {
        self.phase += self.step;
        Self::sample(self.phase, allowed, prev)
    }

    /// State at an arbitrary phase; pure, so frames can be computed out of order.
    pub fn sample(
        phase: f64,
        allowed: AllowedDeformation,
        prev: &DeformationState,
    ) -> DeformationState {
        let s = phase.sin();
        DeformationState {
            axial: if allowed.axial { s * AXIAL_AMPLITUDE } else { 0.0 },
            lateral: if allowed.lateral {
                s.abs() * LATERAL_AMPLITUDE
            } else {
                0.0
            },
            angular: if allowed.angular {
                s * ANGULAR_AMPLITUDE
            } else {
                0.0
            },
            ..*prev
        }
    }
}
