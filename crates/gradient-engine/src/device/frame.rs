use crate::coords::Viewport;

/// One acquired drawable with its command encoder.
///
/// Holding it blocks acquisition of later drawables; hand it to
/// [`Gpu::submit`](super::Gpu::submit) promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Drawable size in physical pixels.
    pub fn viewport(&self) -> Viewport {
        let texture = &self.surface_texture.texture;
        Viewport::from_pixels(texture.width(), texture.height())
    }
}
