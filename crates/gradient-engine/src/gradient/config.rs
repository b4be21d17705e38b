use std::time::Duration;

use crate::animation::cycle::{reference_intermediate, reference_primary};
use crate::animation::{DEFAULT_FRAMES_IN_FLIGHT, TimingPreset};
use crate::coords::ControlPoint;
use crate::paint::GradientColor;

/// Configuration for one gradient instance.
///
/// Owned by whoever composes the render driver and passed explicitly; there is
/// no process-wide settings object.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientConfig {
    /// Resting colors, one per control point.
    pub colors: Vec<GradientColor>,

    /// Base layout shown at startup; odd steps of the layout cycle rotate it.
    pub primary_points: Vec<ControlPoint>,

    /// Second base layout used on even cycle steps.
    pub intermediate_points: Vec<ControlPoint>,

    /// Easing applied to every transition.
    pub timing: TimingPreset,

    /// Length of one position or color transition.
    pub transition_duration: Duration,

    /// Frames allowed in flight on the GPU; also the session ring size.
    pub frames_in_flight: usize,

    /// Standard deviation of the Gaussian blur, in pixels. `0` disables it.
    pub blur_sigma: f32,

    /// Clear color behind the gradient pass.
    pub clear_color: GradientColor,
}

/// Default palette: cream, forest, straw, sage.
pub fn reference_colors() -> Vec<GradientColor> {
    vec![
        GradientColor::from_rgba_u8(254, 244, 202, 255),
        GradientColor::from_rgba_u8(66, 109, 87, 255),
        GradientColor::from_rgba_u8(247, 227, 139, 255),
        GradientColor::from_rgba_u8(135, 162, 132, 255),
    ]
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            colors: reference_colors(),
            primary_points: reference_primary(),
            intermediate_points: reference_intermediate(),
            timing: TimingPreset::EaseOut,
            transition_duration: Duration::from_millis(450),
            frames_in_flight: DEFAULT_FRAMES_IN_FLIGHT,
            blur_sigma: 35.0,
            clear_color: GradientColor::white(),
        }
    }
}
