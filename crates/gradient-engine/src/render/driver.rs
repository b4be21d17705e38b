use std::time::{Duration, Instant};

use anyhow::Result;

use crate::coords::Viewport;
use crate::gradient::Gradient;

use super::{FrameGate, FramePermit, FrameUniforms};

/// How long the driver waits on the gate before pumping completions again.
const GATE_WAIT_SLICE: Duration = Duration::from_millis(4);

/// Invoked once the GPU has finished executing a committed frame.
pub type CompletionHandler = Box<dyn FnOnce() + Send + 'static>;

/// GPU-side operations the driver sequences each tick.
///
/// Implemented by the wgpu backend and by test doubles.
pub trait FrameBackend {
    /// A drawable plus whatever command recording state the backend needs.
    type Frame;

    /// Returns `Ok(None)` when no drawable is available this tick.
    fn acquire_frame(&mut self) -> Result<Option<Self::Frame>>;

    /// Drawable size in pixels.
    fn viewport(&self, frame: &Self::Frame) -> Viewport;

    fn encode_gradient(&mut self, frame: &mut Self::Frame, uniforms: &FrameUniforms);

    fn encode_blur(&mut self, frame: &mut Self::Frame);

    /// Presents and submits `frame`. `on_complete` must run exactly once,
    /// after the GPU has finished with the frame, possibly on another thread.
    fn commit(&mut self, frame: Self::Frame, on_complete: CompletionHandler);

    /// Gives the backend a chance to deliver pending completions while the
    /// driver is blocked on the gate.
    fn pump_completions(&mut self) {}
}

/// Result of one [`RenderDriver::tick`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    /// Frame committed; `frame_index` counts committed frames from zero.
    Submitted { frame_index: u64 },
    /// No drawable was available; the gate slot was returned.
    Skipped,
}

/// Sequences gate, session polling and GPU encoding for each frame.
///
/// At most `frames_in_flight` committed frames are unfinished on the GPU at
/// any time, which is what lets animation sessions reuse a ring of the same
/// size for their output buffers.
#[derive(Debug)]
pub struct RenderDriver {
    gate: FrameGate,
    uniforms: FrameUniforms,
    submitted: u64,
    skipped: u64,
}

impl RenderDriver {
    pub fn new(frames_in_flight: usize) -> Self {
        Self {
            gate: FrameGate::new(frames_in_flight),
            uniforms: FrameUniforms::default(),
            submitted: 0,
            skipped: 0,
        }
    }

    #[inline]
    pub fn gate(&self) -> &FrameGate {
        &self.gate
    }

    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.submitted
    }

    #[inline]
    pub fn frames_skipped(&self) -> u64 {
        self.skipped
    }

    /// Uniforms of the most recent tick that reached encoding.
    #[inline]
    pub fn last_uniforms(&self) -> &FrameUniforms {
        &self.uniforms
    }

    /// Renders one frame of `gradient` as of `now`.
    ///
    /// Blocks while all gate slots are taken. Errors from the backend are
    /// returned after the slot has been released.
    pub fn tick<B: FrameBackend>(
        &mut self,
        backend: &mut B,
        gradient: &mut Gradient,
        now: Instant,
    ) -> Result<TickOutcome> {
        let permit = self.acquire_slot(backend);

        let Some(mut frame) = backend.acquire_frame()? else {
            drop(permit);
            self.skipped += 1;
            log::debug!("no drawable available; frame skipped");
            return Ok(TickOutcome::Skipped);
        };

        let viewport = backend.viewport(&frame);
        gradient.resolve_frame(now, viewport, &mut self.uniforms);

        backend.encode_gradient(&mut frame, &self.uniforms);
        backend.encode_blur(&mut frame);
        backend.commit(frame, Box::new(move || permit.release()));

        let frame_index = self.submitted;
        self.submitted += 1;
        Ok(TickOutcome::Submitted { frame_index })
    }

    fn acquire_slot<B: FrameBackend>(&self, backend: &mut B) -> FramePermit {
        if let Some(permit) = self.gate.try_acquire() {
            return permit;
        }
        log::trace!("all {} frame slots in flight; waiting", self.gate.capacity());
        loop {
            backend.pump_completions();
            if let Some(permit) = self.gate.acquire_timeout(GATE_WAIT_SLICE) {
                return permit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::gradient::GradientConfig;
    use crate::paint::GradientColor;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Acquire,
        Gradient(FrameUniforms),
        Blur,
        Commit,
    }

    struct MockFrame {
        index: u64,
    }

    /// Records calls and hands completions to the test instead of firing them.
    struct MockBackend {
        calls: Arc<Mutex<Vec<Call>>>,
        acquired: Sender<u64>,
        completions: Sender<CompletionHandler>,
        drawables: Vec<bool>,
        next: u64,
        fail_acquire: bool,
    }

    impl MockBackend {
        fn new() -> (Self, Receiver<u64>, Receiver<CompletionHandler>) {
            let (acquired, acquired_rx) = mpsc::channel();
            let (completions, completions_rx) = mpsc::channel();
            let backend = Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                acquired,
                completions,
                drawables: Vec::new(),
                next: 0,
                fail_acquire: false,
            };
            (backend, acquired_rx, completions_rx)
        }
    }

    impl FrameBackend for MockBackend {
        type Frame = MockFrame;

        fn acquire_frame(&mut self) -> Result<Option<MockFrame>> {
            self.calls.lock().unwrap().push(Call::Acquire);
            if self.fail_acquire {
                anyhow::bail!("surface out of memory");
            }
            if !self.drawables.is_empty() && !self.drawables.remove(0) {
                return Ok(None);
            }
            self.next += 1;
            let _ = self.acquired.send(self.next);
            Ok(Some(MockFrame { index: self.next }))
        }

        fn viewport(&self, _frame: &MockFrame) -> Viewport {
            Viewport::new(100.0, 50.0)
        }

        fn encode_gradient(&mut self, _frame: &mut MockFrame, uniforms: &FrameUniforms) {
            self.calls.lock().unwrap().push(Call::Gradient(uniforms.clone()));
        }

        fn encode_blur(&mut self, _frame: &mut MockFrame) {
            self.calls.lock().unwrap().push(Call::Blur);
        }

        fn commit(&mut self, frame: MockFrame, on_complete: CompletionHandler) {
            assert!(frame.index > 0);
            self.calls.lock().unwrap().push(Call::Commit);
            let _ = self.completions.send(on_complete);
        }
    }

    fn gradient() -> Gradient {
        Gradient::new(&GradientConfig::default()).unwrap()
    }

    #[test]
    fn tick_runs_steps_in_order() {
        let (mut backend, _acq, done) = MockBackend::new();
        let calls = Arc::clone(&backend.calls);
        let mut driver = RenderDriver::new(3);
        let mut g = gradient();

        let out = driver.tick(&mut backend, &mut g, Instant::now()).unwrap();
        assert_eq!(out, TickOutcome::Submitted { frame_index: 0 });

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], Call::Acquire);
        assert!(matches!(calls[1], Call::Gradient(_)));
        assert_eq!(calls[2], Call::Blur);
        assert_eq!(calls[3], Call::Commit);

        // slot stays taken until the GPU reports completion
        assert_eq!(driver.gate().in_flight(), 1);
        done.recv().unwrap()();
        assert_eq!(driver.gate().in_flight(), 0);
    }

    #[test]
    fn uniforms_carry_resting_values_in_pixels() {
        let (mut backend, _acq, _done) = MockBackend::new();
        let mut driver = RenderDriver::new(3);
        let mut g = gradient();
        driver.tick(&mut backend, &mut g, Instant::now()).unwrap();

        let u = driver.last_uniforms();
        assert_eq!(u.colors, g.resting_colors());
        let expected: Vec<Vec2> = g
            .resting_points()
            .iter()
            .map(|p| Vec2::new(p.x * 100.0, p.y * 50.0))
            .collect();
        assert_eq!(u.points, expected);
    }

    #[test]
    fn missing_drawable_skips_and_frees_slot() {
        let (mut backend, _acq, _done) = MockBackend::new();
        backend.drawables = vec![false, true];
        let calls = Arc::clone(&backend.calls);
        let mut driver = RenderDriver::new(3);
        let mut g = gradient();

        let out = driver.tick(&mut backend, &mut g, Instant::now()).unwrap();
        assert_eq!(out, TickOutcome::Skipped);
        assert_eq!(driver.gate().available(), 3);
        assert_eq!(driver.frames_skipped(), 1);
        assert_eq!(calls.lock().unwrap().as_slice(), &[Call::Acquire]);

        let out = driver.tick(&mut backend, &mut g, Instant::now()).unwrap();
        assert_eq!(out, TickOutcome::Submitted { frame_index: 0 });
    }

    #[test]
    fn backend_error_releases_slot() {
        let (mut backend, _acq, _done) = MockBackend::new();
        backend.fail_acquire = true;
        let mut driver = RenderDriver::new(2);
        let mut g = gradient();

        assert!(driver.tick(&mut backend, &mut g, Instant::now()).is_err());
        assert_eq!(driver.gate().available(), 2);
        assert_eq!(driver.frames_submitted(), 0);
    }

    #[test]
    fn fourth_tick_waits_for_first_completion() {
        let (mut backend, acquired, done) = MockBackend::new();
        let wait = Duration::from_secs(5);
        let short = Duration::from_millis(100);

        let render = thread::spawn(move || {
            let mut driver = RenderDriver::new(3);
            let mut g = gradient();
            for _ in 0..5 {
                driver.tick(&mut backend, &mut g, Instant::now()).unwrap();
            }
            driver
        });

        for k in 1..=3 {
            assert_eq!(acquired.recv_timeout(wait), Ok(k));
        }
        // tick 4 is parked on the gate
        assert!(acquired.recv_timeout(short).is_err());

        let first = done.recv_timeout(wait).unwrap();
        first();
        assert_eq!(acquired.recv_timeout(wait), Ok(4));

        assert!(acquired.recv_timeout(short).is_err());
        let second = done.recv_timeout(wait).unwrap();
        thread::spawn(second).join().unwrap();
        assert_eq!(acquired.recv_timeout(wait), Ok(5));

        let driver = render.join().unwrap();
        assert_eq!(driver.frames_submitted(), 5);
        assert_eq!(driver.gate().in_flight(), 3);

        // drain the rest; every slot comes back
        for handler in done.try_iter() {
            handler();
        }
        assert_eq!(driver.gate().available(), 3);
    }

    #[test]
    fn active_session_feeds_interpolated_colors() {
        let (mut backend, _acq, done) = MockBackend::new();
        let mut driver = RenderDriver::new(3);
        let mut g = gradient();
        let t0 = Instant::now();
        let d = Duration::from_millis(450);
        let target = vec![GradientColor::black(); 4];
        g.animate_colors(target.clone(), t0, d, crate::animation::TimingCurve::LINEAR)
            .unwrap();

        driver.tick(&mut backend, &mut g, t0 + d / 2).unwrap();
        assert_ne!(driver.last_uniforms().colors, target);
        assert!(g.is_animating());

        driver.tick(&mut backend, &mut g, t0 + d).unwrap();
        assert_eq!(driver.last_uniforms().colors, target);
        assert!(!g.is_animating());

        for handler in done.try_iter() {
            handler();
        }
    }
}
