use std::time::{Duration, Instant};

use super::{AnimationError, Interpolate, TimingCurve, interpolate_into};

/// Lifecycle of an [`AnimationSession`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
    Active,
    /// Terminal. Every later poll returns the target values.
    Finished,
}

/// Result of polling a session once.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SessionFrame<'a, T> {
    /// Interpolated values written into the session's current ring slot.
    Active(&'a [T]),
    /// Elapsed time reached the duration; carries the target verbatim.
    Finished(&'a [T]),
}

impl<'a, T> SessionFrame<'a, T> {
    #[inline]
    pub fn values(&self) -> &'a [T] {
        match *self {
            SessionFrame::Active(v) | SessionFrame::Finished(v) => v,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionFrame::Finished(_))
    }
}

/// One in-flight transition of a color or control-point sequence.
///
/// Polled once per render tick. Each active poll writes into the next slot of
/// a fixed ring sized to the number of frames the GPU may still be reading,
/// so a buffer handed to frame `k` is not rewritten until frame
/// `k + ring_len`.
///
/// Progress is `elapsed / duration`, eased through [`TimingCurve::solve`] on
/// every poll. Recomputing from the start instant keeps the result correct
/// under irregular frame pacing.
#[derive(Debug, Clone)]
pub struct AnimationSession<T> {
    start: Instant,
    duration: Duration,
    curve: TimingCurve,
    from: Vec<T>,
    to: Vec<T>,
    ring: Vec<Vec<T>>,
    cursor: usize,
    state: SessionState,
}

impl<T: Interpolate> AnimationSession<T> {
    pub fn new(
        start: Instant,
        duration: Duration,
        curve: TimingCurve,
        from: Vec<T>,
        to: Vec<T>,
        ring_len: usize,
    ) -> Result<Self, AnimationError> {
        if ring_len == 0 {
            return Err(AnimationError::ZeroRing);
        }
        if from.is_empty() {
            return Err(AnimationError::Empty);
        }
        if from.len() != to.len() {
            return Err(AnimationError::LengthMismatch {
                expected: from.len(),
                actual: to.len(),
            });
        }

        let ring = (0..ring_len).map(|_| Vec::with_capacity(from.len())).collect();

        Ok(Self {
            start,
            duration,
            curve,
            from,
            to,
            ring,
            cursor: 0,
            state: SessionState::Active,
        })
    }

    /// Elapsed fraction of the duration at `now`. Not clamped above 1.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        now.saturating_duration_since(self.start).as_secs_f64() / self.duration.as_secs_f64()
    }

    /// Advances the session to `now`.
    pub fn next_buffer(&mut self, now: Instant) -> SessionFrame<'_, T> {
        if self.state == SessionState::Finished {
            return SessionFrame::Finished(&self.to);
        }

        let t = self.progress(now);
        if t >= 1.0 {
            self.state = SessionState::Finished;
            log::debug!("animation session finished after {:?}", self.duration);
            return SessionFrame::Finished(&self.to);
        }

        let ratio = self.curve.solve(t as f32);
        let slot = self.cursor;
        self.cursor = (self.cursor + 1) % self.ring.len();

        if let Err(e) = interpolate_into(&self.from, &self.to, ratio, &mut self.ring[slot]) {
            log::warn!("animation session aborted: {e}");
            self.state = SessionState::Finished;
            return SessionFrame::Finished(&self.to);
        }

        SessionFrame::Active(&self.ring[slot])
    }
}

impl<T> AnimationSession<T> {
    #[inline]
    pub fn start(&self) -> Instant {
        self.start
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[inline]
    pub fn curve(&self) -> TimingCurve {
        self.curve
    }

    #[inline]
    pub fn from_value(&self) -> &[T] {
        &self.from
    }

    #[inline]
    pub fn to_value(&self) -> &[T] {
        &self.to
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Number of output buffers in the ring.
    #[inline]
    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }

    /// Ring slot the next active poll will write.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Contents of a ring slot; empty until the slot is first written.
    pub fn buffer(&self, slot: usize) -> Option<&[T]> {
        self.ring.get(slot).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::GradientColor;

    const D: Duration = Duration::from_millis(450);

    fn points_session(start: Instant, curve: TimingCurve) -> AnimationSession<Vec2> {
        AnimationSession::new(
            start,
            D,
            curve,
            vec![Vec2::new(0.1, 0.9), Vec2::new(0.8, 0.2)],
            vec![Vec2::new(0.7, 0.3), Vec2::new(0.2, 0.6)],
            3,
        )
        .unwrap()
    }

    fn dist(a: Vec2, b: Vec2) -> f32 {
        ((a.x - b.x).abs()).max((a.y - b.y).abs())
    }

    #[test]
    fn polls_before_duration_approach_target_monotonically() {
        let t0 = Instant::now();
        for curve in [TimingCurve::EASE_OUT, TimingCurve::LINEAR, TimingCurve::EASE_IN_EASE_OUT] {
            let mut s = points_session(t0, curve);
            let target = s.to_value().to_vec();
            let mut prev: Vec<f32> = s.from_value().iter().zip(&target).map(|(a, b)| dist(*a, *b)).collect();

            for ms in (15..450).step_by(15) {
                let frame = s.next_buffer(t0 + Duration::from_millis(ms));
                assert!(!frame.is_finished(), "finished early at {ms}ms");
                let now: Vec<f32> = frame.values().iter().zip(&target).map(|(a, b)| dist(*a, *b)).collect();
                for (n, p) in now.iter().zip(&prev) {
                    assert!(*n <= *p + 1e-6, "moved away from target at {ms}ms ({curve:?})");
                }
                prev = now;
            }
        }
    }

    #[test]
    fn poll_at_duration_returns_target_and_finishes() {
        let t0 = Instant::now();
        let mut s = points_session(t0, TimingCurve::EASE_OUT);
        let target = s.to_value().to_vec();

        let frame = s.next_buffer(t0 + D);
        assert!(frame.is_finished());
        assert_eq!(frame.values(), target.as_slice());
        assert_eq!(s.state(), SessionState::Finished);

        // later polls stay finished
        let again = s.next_buffer(t0 + D * 3);
        assert_eq!(again, SessionFrame::Finished(target.as_slice()));
    }

    #[test]
    fn poll_before_start_yields_from_values() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut s = points_session(t0, TimingCurve::LINEAR);
        let from = s.from_value().to_vec();
        assert_eq!(s.next_buffer(Instant::now()).values(), from.as_slice());
    }

    #[test]
    fn ring_rotates_and_keeps_older_frames_intact() {
        let t0 = Instant::now();
        let mut s = points_session(t0, TimingCurve::LINEAR);

        let first = s.next_buffer(t0 + Duration::from_millis(50)).values().to_vec();
        assert_eq!(s.cursor(), 1);
        s.next_buffer(t0 + Duration::from_millis(100));
        s.next_buffer(t0 + Duration::from_millis(150));
        assert_eq!(s.cursor(), 0);

        // slot 0 still holds the first frame until it comes around again
        assert_eq!(s.buffer(0), Some(first.as_slice()));
        s.next_buffer(t0 + Duration::from_millis(200));
        assert_ne!(s.buffer(0), Some(first.as_slice()));
        assert_eq!(s.ring_len(), 3);
    }

    #[test]
    fn active_frame_matches_sequence_interpolation() {
        let t0 = Instant::now();
        let mut s = points_session(t0, TimingCurve::EASE_OUT);
        let at = t0 + Duration::from_millis(180);
        let ratio = TimingCurve::EASE_OUT.solve(s.progress(at) as f32);
        let expected = crate::animation::interpolate(s.from_value(), s.to_value(), ratio).unwrap();

        assert_eq!(s.next_buffer(at), SessionFrame::Active(expected.as_slice()));
    }

    #[test]
    fn zero_duration_finishes_on_first_poll() {
        let t0 = Instant::now();
        let mut s = AnimationSession::new(
            t0,
            Duration::ZERO,
            TimingCurve::LINEAR,
            vec![GradientColor::white()],
            vec![GradientColor::black()],
            3,
        )
        .unwrap();
        assert_eq!(s.next_buffer(t0), SessionFrame::Finished(&[GradientColor::black()][..]));
    }

    #[test]
    fn color_session_midpoint_uses_eased_ratio() {
        let t0 = Instant::now();
        let mut s = AnimationSession::new(
            t0,
            Duration::from_secs(1),
            TimingCurve::LINEAR,
            vec![GradientColor::black()],
            vec![GradientColor::white()],
            2,
        )
        .unwrap();
        let v = s.next_buffer(t0 + Duration::from_millis(500)).values()[0];
        let expected = TimingCurve::LINEAR.solve(0.5);
        assert!((v.r - expected).abs() < 1e-6);
        assert_eq!(v.a, 1.0);
    }

    #[test]
    fn invalid_construction_is_rejected() {
        let t0 = Instant::now();
        let mismatch = AnimationSession::new(
            t0,
            D,
            TimingCurve::LINEAR,
            vec![Vec2::zero(); 4],
            vec![Vec2::zero(); 3],
            3,
        );
        assert_eq!(
            mismatch.unwrap_err(),
            AnimationError::LengthMismatch { expected: 4, actual: 3 }
        );

        let no_ring =
            AnimationSession::new(t0, D, TimingCurve::LINEAR, vec![Vec2::zero()], vec![Vec2::zero()], 0);
        assert_eq!(no_ring.unwrap_err(), AnimationError::ZeroRing);

        let empty = AnimationSession::<Vec2>::new(t0, D, TimingCurve::LINEAR, vec![], vec![], 3);
        assert_eq!(empty.unwrap_err(), AnimationError::Empty);
    }
}
