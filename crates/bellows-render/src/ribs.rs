//! Peak and valley rib lines for the opaque (non cross-section) rendering.

use crate::convolution::ConvolutionProfile;
use crate::model::{FeatureKind, FeatureLine, LayoutPoint};

/// Rib lines with the default profile. See [`ConvolutionProfile::generate_feature_lines`].
pub fn generate_feature_lines(length: f64, count: usize, bend_angle: f64) -> Vec<FeatureLine> {
    ConvolutionProfile::default().generate_feature_lines(length, count, bend_angle)
}

impl ConvolutionProfile {
    /// One peak line per convolution (spanning the peak radius on both walls) and one valley
    /// line per interior convolution boundary (spanning the base radius).
    ///
    /// The boundary at `x = 0` gets no valley line: it coincides with the flange seam.
    pub fn generate_feature_lines(
        &self,
        length: f64,
        count: usize,
        bend_angle: f64,
    ) -> Vec<FeatureLine> {
        if count == 0 {
            return Vec::new();
        }
        let frame = self.frame(length, bend_angle);
        let at = |x: f64, y: f64| LayoutPoint::from(frame.transform(x, y));
        let w = length / count as f64;
        let peak = self.peak_radius();

        let mut out = Vec::with_capacity(count * 2);
        for i in 0..count {
            let x_valley = i as f64 * w;
            let x_peak = x_valley + w * 0.5;
            out.push(FeatureLine {
                kind: FeatureKind::Peak,
                index: i,
                from: at(x_peak, -peak),
                to: at(x_peak, peak),
            });
            if i > 0 {
                out.push(FeatureLine {
                    kind: FeatureKind::Valley,
                    index: i,
                    from: at(x_valley, -self.radius),
                    to: at(x_valley, self.radius),
                });
            }
        }
        out
    }
}
