/// Options for creating a [`Gpu`](super::Gpu).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when available.
    ///
    /// Off by default: gradient colors are authored in display space and
    /// written to the drawable as-is.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Used only if the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Surface latency hint. Backends may ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Matches the surface latency hint to the number of frames the render
    /// driver keeps in flight.
    pub fn with_frames_in_flight(mut self, frames: usize) -> Self {
        self.desired_maximum_frame_latency = frames.clamp(1, u32::MAX as usize) as u32;
        self
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
