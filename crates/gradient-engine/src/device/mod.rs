//! GPU device and window surface.
//!
//! [`Gpu`] owns the wgpu device, queue and surface, hands out one
//! [`GpuFrame`] per tick and reports submitted-work completion back through
//! a callback.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
