use thiserror::Error;

use crate::animation::AnimationError;
use crate::render::MAX_CONTROL_POINTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GradientError {
    /// Colors and control points must pair up one-to-one.
    #[error("expected {expected} colors (one per control point), got {actual}")]
    ColorCount { expected: usize, actual: usize },

    /// The uniform block has a fixed number of slots.
    #[error("at most {max} control points are supported, got {0}", max = MAX_CONTROL_POINTS)]
    TooManyPoints(usize),

    #[error(transparent)]
    Animation(#[from] AnimationError),
}
