//! Animated multi-color gradient engine.
//!
//! A fixed set of control points cycles through a deterministic sequence of
//! layouts while their colors blend toward new palettes, both eased through
//! a cubic-bezier timing curve. Frames are rendered with wgpu under a
//! counting gate that bounds how many are in flight on the GPU.

pub mod animation;
pub mod coords;
pub mod gradient;
pub mod paint;
pub mod render;

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod window;
