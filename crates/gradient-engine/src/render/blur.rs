use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{RenderCtx, RenderTarget};

/// Taps on either side of the center are capped here regardless of sigma.
pub const MAX_BLUR_RADIUS: u32 = 128;

/// Normalized 1D Gaussian weights, center tap in the middle.
///
/// Radius is `ceil(3 * sigma)` capped at [`MAX_BLUR_RADIUS`]. A non-positive
/// or non-finite sigma yields the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = ((sigma * 3.0).ceil() as u32).min(MAX_BLUR_RADIUS) as i32;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct BlurParams {
    direction: [i32; 2],
    radius: i32,
    _pad: i32,
}

/// Offscreen textures sized to the current drawable.
struct BlurTargets {
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    _source: wgpu::Texture,
    source_view: wgpu::TextureView,
    _intermediate: wgpu::Texture,
    intermediate_view: wgpu::TextureView,
    horizontal: wgpu::BindGroup,
    vertical: wgpu::BindGroup,
}

/// Separable Gaussian blur applied after the gradient pass.
///
/// The gradient is drawn into `source`, blurred along X into
/// `intermediate`, then along Y into the caller's color view.
pub struct BlurRenderer {
    sigma: f32,
    kernel: Vec<f32>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    weights_sbo: Option<wgpu::Buffer>,
    params_h: Option<wgpu::Buffer>,
    params_v: Option<wgpu::Buffer>,

    targets: Option<BlurTargets>,
}

impl BlurRenderer {
    pub fn new(sigma: f32) -> Self {
        Self {
            sigma,
            kernel: gaussian_kernel(sigma),
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            weights_sbo: None,
            params_h: None,
            params_v: None,
            targets: None,
        }
    }

    #[inline]
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// A sigma of zero disables the blur; the gradient then draws straight
    /// into the drawable.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.kernel.len() > 1
    }

    /// Prepares GPU resources for the drawable and returns the view the
    /// gradient pass should render into.
    pub(crate) fn prepare(&mut self, ctx: &RenderCtx<'_>) -> Option<&wgpu::TextureView> {
        let (width, height) = ctx.drawable_size();
        self.ensure_pipeline(ctx);
        self.ensure_buffers(ctx);
        self.ensure_targets(ctx, width, height);
        self.targets.as_ref().map(|t| &t.source_view)
    }

    /// Encodes both blur passes, ending in `target.color_view`.
    pub(crate) fn encode(&mut self, target: &mut RenderTarget<'_>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(targets) = self.targets.as_ref() else { return };

        blur_pass(
            target.encoder,
            pipeline,
            &targets.horizontal,
            &targets.intermediate_view,
            "gradient blur horizontal",
        );
        blur_pass(
            target.encoder,
            pipeline,
            &targets.vertical,
            target.color_view,
            "gradient blur vertical",
        );
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gradient blur shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blur.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("gradient blur bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: true },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("gradient blur pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gradient blur pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        // bind groups reference the old layout
        self.targets = None;
    }

    fn ensure_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.weights_sbo.is_some() && self.params_h.is_some() && self.params_v.is_some() {
            return;
        }
        let radius = (self.kernel.len() / 2) as i32;

        self.weights_sbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gradient blur weights"),
            contents: bytemuck::cast_slice(&self.kernel),
            usage: wgpu::BufferUsages::STORAGE,
        }));

        let params = |direction: [i32; 2], label| {
            ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&BlurParams {
                    direction,
                    radius,
                    _pad: 0,
                }),
                usage: wgpu::BufferUsages::UNIFORM,
            })
        };
        self.params_h = Some(params([1, 0], "gradient blur params h"));
        self.params_v = Some(params([0, 1], "gradient blur params v"));
        self.targets = None;
    }

    fn ensure_targets(&mut self, ctx: &RenderCtx<'_>, width: u32, height: u32) {
        if let Some(t) = &self.targets {
            if t.width == width && t.height == height && t.format == ctx.surface_format {
                return;
            }
        }
        let (Some(bgl), Some(weights), Some(params_h), Some(params_v)) = (
            self.bind_group_layout.as_ref(),
            self.weights_sbo.as_ref(),
            self.params_h.as_ref(),
            self.params_v.as_ref(),
        ) else {
            return;
        };

        let offscreen = |label| {
            let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: ctx.surface_format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        };
        let (source, source_view) = offscreen("gradient blur source");
        let (intermediate, intermediate_view) = offscreen("gradient blur intermediate");

        let bind = |view: &wgpu::TextureView, params: &wgpu::Buffer, label| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: weights.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params.as_entire_binding(),
                    },
                ],
            })
        };
        let horizontal = bind(&source_view, params_h, "gradient blur bind group h");
        let vertical = bind(&intermediate_view, params_v, "gradient blur bind group v");

        log::debug!("blur targets resized to {width}x{height}");
        self.targets = Some(BlurTargets {
            width,
            height,
            format: ctx.surface_format,
            _source: source,
            source_view,
            _intermediate: intermediate,
            intermediate_view,
            horizontal,
            vertical,
        });
    }
}

fn blur_pass(
    encoder: &mut wgpu::CommandEncoder,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
    view: &wgpu::TextureView,
    label: &str,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
    rpass.set_pipeline(pipeline);
    rpass.set_bind_group(0, bind_group, &[]);
    rpass.draw(0..3, 0..1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for sigma in [0.5_f32, 2.0, 35.0] {
            let k = gaussian_kernel(sigma);
            assert_eq!(k.len() % 2, 1);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "sigma {sigma}: sum {sum}");
            for i in 0..k.len() / 2 {
                assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn kernel_peaks_at_center() {
        let k = gaussian_kernel(35.0);
        let mid = k.len() / 2;
        assert_eq!(mid, 105);
        assert!(k.iter().all(|w| *w <= k[mid]));
        assert!(k[0] < k[mid / 2]);
    }

    #[test]
    fn radius_is_capped() {
        let k = gaussian_kernel(1000.0);
        assert_eq!(k.len(), (MAX_BLUR_RADIUS * 2 + 1) as usize);
    }

    #[test]
    fn degenerate_sigma_is_identity() {
        assert_eq!(gaussian_kernel(0.0), vec![1.0]);
        assert_eq!(gaussian_kernel(-3.0), vec![1.0]);
        assert_eq!(gaussian_kernel(f32::NAN), vec![1.0]);
        assert!(!BlurRenderer::new(0.0).is_enabled());
        assert!(BlurRenderer::new(35.0).is_enabled());
    }
}
