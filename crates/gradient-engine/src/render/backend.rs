use anyhow::{bail, Result};
use winit::window::Window;

use crate::coords::Viewport;
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};

use super::{CompletionHandler, FrameBackend, FrameUniforms, GradientRenderer, RenderCtx, RenderTarget};

/// [`FrameBackend`] over a window surface.
///
/// Borrowed for the duration of one tick.
pub struct WgpuBackend<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    renderer: &'a mut GradientRenderer,
    window: Option<&'a Window>,
}

impl<'a, 'w> WgpuBackend<'a, 'w> {
    pub fn new(gpu: &'a mut Gpu<'w>, renderer: &'a mut GradientRenderer) -> Self {
        Self {
            gpu,
            renderer,
            window: None,
        }
    }

    /// Notifies `window` right before each present.
    pub fn with_window(mut self, window: &'a Window) -> Self {
        self.window = Some(window);
        self
    }
}

impl FrameBackend for WgpuBackend<'_, '_> {
    type Frame = GpuFrame;

    fn acquire_frame(&mut self) -> Result<Option<GpuFrame>> {
        let err = match self.gpu.begin_frame() {
            Ok(frame) => return Ok(Some(frame)),
            Err(err) => err,
        };

        log::debug!("surface acquire failed: {err}");
        match self.gpu.handle_surface_error(err) {
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => Ok(None),
            SurfaceErrorAction::Fatal => {
                log::error!("surface out of memory");
                bail!("surface out of memory")
            }
        }
    }

    fn viewport(&self, frame: &GpuFrame) -> Viewport {
        frame.viewport()
    }

    fn encode_gradient(&mut self, frame: &mut GpuFrame, uniforms: &FrameUniforms) {
        let ctx = RenderCtx::for_frame(self.gpu, frame);
        let mut target = RenderTarget::for_frame(frame);
        self.renderer.encode_gradient(&ctx, &mut target, uniforms);
    }

    fn encode_blur(&mut self, frame: &mut GpuFrame) {
        let mut target = RenderTarget::for_frame(frame);
        self.renderer.encode_blur(&mut target);
    }

    fn commit(&mut self, frame: GpuFrame, on_complete: CompletionHandler) {
        if let Some(window) = self.window {
            window.pre_present_notify();
        }
        self.gpu.submit(frame, on_complete);
    }

    fn pump_completions(&mut self) {
        self.gpu.poll();
    }
}
