//! Gradient animation core.
//!
//! - `timing`: cubic-bezier easing (x→y solve and direct-t evaluation)
//! - `cycle`: deterministic rotation of control-point layouts
//! - `interpolate`: per-element lerp of color and point sequences
//! - `session`: one in-flight transition with a ring of output buffers

pub mod cycle;
pub mod interpolate;
pub mod session;
pub mod timing;

mod error;

pub use cycle::GradientLayoutCycle;
pub use error::AnimationError;
pub use interpolate::{Interpolate, interpolate, interpolate_into};
pub use session::{AnimationSession, SessionFrame, SessionState};
pub use timing::{TimingCurve, TimingPreset};

/// Default number of frames allowed in flight on the GPU.
///
/// Sizes both the frame gate and each session's output ring.
pub const DEFAULT_FRAMES_IN_FLIGHT: usize = 3;
