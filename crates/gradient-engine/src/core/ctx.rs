use std::time::Instant;

use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::gradient::Gradient;
use crate::input::InputFrame;
use crate::render::{GradientRenderer, RenderDriver, TickOutcome, WgpuBackend};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Window handle plus immutable metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Inner size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// `'a` is the callback, `'w` the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input_frame: &'a InputFrame,
    /// Timestamp of this frame. Animation sessions are evaluated at it.
    pub now: Instant,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Schedules another frame after this one.
    pub fn request_redraw(&mut self) {
        self.runtime.request_redraw();
    }

    /// Renders one frame of `gradient` through `driver`.
    ///
    /// Keeps redrawing while any session is active. A fatal surface error
    /// returns [`AppControl::Exit`].
    pub fn render_gradient(
        &mut self,
        driver: &mut RenderDriver,
        renderer: &mut GradientRenderer,
        gradient: &mut Gradient,
    ) -> AppControl {
        let now = self.now;
        let mut backend = WgpuBackend::new(self.gpu, renderer).with_window(self.window.window);

        let control = match driver.tick(&mut backend, gradient, now) {
            Ok(TickOutcome::Submitted { .. }) => AppControl::Continue,
            Ok(TickOutcome::Skipped) => {
                // a minimized window keeps failing to acquire; wait for a resize
                let (w, h) = self.window.physical_size();
                if w > 0 && h > 0 {
                    self.runtime.request_redraw();
                }
                AppControl::Continue
            }
            Err(e) => {
                log::error!("render failed: {e:#}");
                AppControl::Exit
            }
        };

        if gradient.is_animating() {
            self.runtime.request_redraw();
        }
        control
    }
}
