//! Easing Curves
//!
//! Progress mapping used by the color cycler and by surfaces that fade glyphs.

use serde::{Deserialize, Serialize};

/// Easing functions for smooth animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing (constant speed)
    Linear,

    /// Slow start, fast end
    EaseIn,

    /// Fast start, slow end
    EaseOut,

    /// Slow start and end
    #[default]
    EaseInOut,

    /// Cubic ease in and out
    EaseInOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
