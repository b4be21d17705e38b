//! Frame submission and GPU rendering.
//!
//! [`RenderDriver`] sequences each frame against any [`FrameBackend`];
//! [`WgpuBackend`] is the window-surface implementation, drawing with
//! [`GradientRenderer`] followed by a separable Gaussian blur.
//!
//! Convention: control points reach the GPU in surface pixels (top-left
//! origin, +Y down).

mod backend;
mod blur;
mod ctx;
mod driver;
mod gate;
mod gradient;
mod uniforms;

pub use backend::WgpuBackend;
pub use blur::{gaussian_kernel, BlurRenderer, MAX_BLUR_RADIUS};
pub use ctx::{RenderCtx, RenderTarget};
pub use driver::{CompletionHandler, FrameBackend, RenderDriver, TickOutcome};
pub use gate::{FrameGate, FramePermit};
pub use gradient::GradientRenderer;
pub use uniforms::{FrameUniforms, GradientUniformBlock, MAX_CONTROL_POINTS, QUAD_VERTICES};
