//! Coordinate types shared by the animation core and the renderer.
//!
//! Two spaces are in play:
//! - normalized view space, `[0, 1] x [0, 1]`, origin top-left, +Y down
//!   (control points live here while they animate)
//! - surface pixel space, the same orientation scaled by the drawable size
//!   (what the fragment shader compares against)

mod vec2;
mod viewport;

pub use vec2::{ControlPoint, Vec2};
pub use viewport::Viewport;
