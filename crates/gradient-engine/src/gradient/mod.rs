//! Gradient state owner.
//!
//! Holds the resting colors and control points, the layout cycle, and at most
//! one active [`AnimationSession`](crate::animation::AnimationSession) per
//! animatable quantity. The render driver pulls one resolved frame from here
//! per tick.

mod config;
mod error;
mod state;

pub use config::{GradientConfig, reference_colors};
pub use error::GradientError;
pub use state::Gradient;
