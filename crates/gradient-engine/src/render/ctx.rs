use crate::coords::Viewport;
use crate::device::{Gpu, GpuFrame};

/// Device handles and drawable size for encoding one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    /// Borrows `gpu` for a pass over `frame`'s drawable.
    pub fn for_frame(gpu: &'a Gpu<'_>, frame: &GpuFrame) -> Self {
        Self {
            device: gpu.device(),
            queue: gpu.queue(),
            surface_format: gpu.surface_format(),
            viewport: frame.viewport(),
        }
    }

    /// Size offscreen targets must match.
    #[inline]
    pub fn drawable_size(&self) -> (u32, u32) {
        self.viewport.texture_extent()
    }
}

/// Encoder plus the view the final pass of a frame writes to.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    /// Targets the swap-chain view of `frame`.
    pub fn for_frame(frame: &'a mut GpuFrame) -> Self {
        Self {
            encoder: &mut frame.encoder,
            color_view: &frame.view,
        }
    }
}
