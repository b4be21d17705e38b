use std::time::{Duration, Instant};

use crate::animation::{AnimationError, AnimationSession, GradientLayoutCycle, TimingCurve};
use crate::coords::{ControlPoint, Viewport};
use crate::paint::GradientColor;
use crate::render::{FrameUniforms, MAX_CONTROL_POINTS};

use super::{GradientConfig, GradientError};

/// Animatable state of one gradient.
///
/// Resting values are authoritative whenever no session of that kind runs.
/// Starting a session moves the resting value to the target immediately, so
/// layout-level readers see where the gradient is heading while rendering
/// still goes through the interpolated buffers.
///
/// All mutation happens on the render thread; nothing here is shared.
#[derive(Debug)]
pub struct Gradient {
    cycle: GradientLayoutCycle,

    points: Vec<ControlPoint>,
    colors: Vec<GradientColor>,

    positions: Option<AnimationSession<ControlPoint>>,
    color_transition: Option<AnimationSession<GradientColor>>,

    ring_len: usize,
}

impl Gradient {
    pub fn new(config: &GradientConfig) -> Result<Self, GradientError> {
        let cycle = GradientLayoutCycle::new(
            config.primary_points.clone(),
            config.intermediate_points.clone(),
        )?;

        if cycle.len() > MAX_CONTROL_POINTS {
            return Err(GradientError::TooManyPoints(cycle.len()));
        }
        if config.colors.len() != cycle.len() {
            return Err(GradientError::ColorCount {
                expected: cycle.len(),
                actual: config.colors.len(),
            });
        }
        if config.frames_in_flight == 0 {
            return Err(AnimationError::ZeroRing.into());
        }

        Ok(Self {
            points: cycle.primary().to_vec(),
            cycle,
            colors: config.colors.clone(),
            positions: None,
            color_transition: None,
            ring_len: config.frames_in_flight,
        })
    }

    /// Starts moving the control points to the next layout of the cycle.
    ///
    /// Returns `false` without touching any state when a position transition
    /// is already running.
    pub fn animate_positions(
        &mut self,
        now: Instant,
        duration: Duration,
        curve: TimingCurve,
    ) -> bool {
        if self.positions.is_some() {
            log::debug!("position transition already running; request dropped");
            return false;
        }

        let next = self.cycle.peek();
        match AnimationSession::new(
            now,
            duration,
            curve,
            self.points.clone(),
            next.clone(),
            self.ring_len,
        ) {
            Ok(session) => {
                self.cycle.advance();
                self.points = next;
                log::debug!("position transition started (step {})", self.cycle.step());
                self.positions = Some(session);
                true
            }
            Err(e) => {
                log::error!("position transition rejected: {e}");
                false
            }
        }
    }

    /// Starts blending the colors toward `target`.
    ///
    /// Returns `Ok(false)` when a color transition is already running and
    /// `Err` when `target` does not have one color per control point.
    pub fn animate_colors(
        &mut self,
        target: Vec<GradientColor>,
        now: Instant,
        duration: Duration,
        curve: TimingCurve,
    ) -> Result<bool, GradientError> {
        self.check_color_count(&target)?;

        if self.color_transition.is_some() {
            log::debug!("color transition already running; request dropped");
            return Ok(false);
        }

        let session = AnimationSession::new(
            now,
            duration,
            curve,
            self.colors.clone(),
            target.clone(),
            self.ring_len,
        )?;
        self.colors = target;
        self.color_transition = Some(session);
        log::debug!("color transition started");
        Ok(true)
    }

    #[inline]
    pub fn resting_points(&self) -> &[ControlPoint] {
        &self.points
    }

    #[inline]
    pub fn resting_colors(&self) -> &[GradientColor] {
        &self.colors
    }

    #[inline]
    pub fn position_session(&self) -> Option<&AnimationSession<ControlPoint>> {
        self.positions.as_ref()
    }

    #[inline]
    pub fn color_session(&self) -> Option<&AnimationSession<GradientColor>> {
        self.color_transition.as_ref()
    }

    /// True while any session still needs per-tick polling.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.positions.is_some() || self.color_transition.is_some()
    }

    /// Resolves the values to draw at `now` into `out`.
    ///
    /// Colors come from the active color session or the resting colors;
    /// points likewise, then get projected onto `viewport`. A session whose
    /// poll reports completion is dropped here.
    pub fn resolve_frame(&mut self, now: Instant, viewport: Viewport, out: &mut FrameUniforms) {
        out.colors.clear();
        let color_done = match self.color_transition.as_mut() {
            Some(session) => {
                let frame = session.next_buffer(now);
                out.colors.extend_from_slice(frame.values());
                frame.is_finished()
            }
            None => {
                out.colors.extend_from_slice(&self.colors);
                false
            }
        };
        if color_done {
            self.color_transition = None;
        }

        out.points.clear();
        let positions_done = match self.positions.as_mut() {
            Some(session) => {
                let frame = session.next_buffer(now);
                out.points
                    .extend(frame.values().iter().map(|p| p.to_pixels(viewport)));
                frame.is_finished()
            }
            None => {
                out.points
                    .extend(self.points.iter().map(|p| p.to_pixels(viewport)));
                false
            }
        };
        if positions_done {
            self.positions = None;
        }
    }

    fn check_color_count(&self, colors: &[GradientColor]) -> Result<(), GradientError> {
        if colors.len() != self.points.len() {
            return Err(GradientError::ColorCount {
                expected: self.points.len(),
                actual: colors.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::cycle::{reference_intermediate, reference_primary};
    use crate::coords::Vec2;

    const D: Duration = Duration::from_millis(450);

    fn gradient() -> Gradient {
        Gradient::new(&GradientConfig::default()).unwrap()
    }

    fn rgby() -> Vec<GradientColor> {
        vec![
            GradientColor::rgb(1.0, 0.0, 0.0),
            GradientColor::rgb(0.0, 1.0, 0.0),
            GradientColor::rgb(0.0, 0.0, 1.0),
            GradientColor::rgb(1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn starts_at_primary_layout_and_config_colors() {
        let g = gradient();
        assert_eq!(g.resting_points(), reference_primary().as_slice());
        assert_eq!(g.resting_colors(), GradientConfig::default().colors.as_slice());
        assert!(!g.is_animating());
    }

    #[test]
    fn animate_positions_moves_resting_value_to_target() {
        let mut g = gradient();
        let t0 = Instant::now();
        assert!(g.animate_positions(t0, D, TimingCurve::EASE_OUT));

        let session = g.position_session().unwrap();
        assert_eq!(session.from_value(), reference_primary().as_slice());
        assert_eq!(session.to_value(), reference_intermediate().as_slice());
        assert_eq!(g.resting_points(), reference_intermediate().as_slice());
    }

    #[test]
    fn second_position_request_leaves_first_session_untouched() {
        let mut g = gradient();
        let t0 = Instant::now();
        assert!(g.animate_positions(t0, D, TimingCurve::EASE_OUT));
        let (from, to, start) = {
            let s = g.position_session().unwrap();
            (s.from_value().to_vec(), s.to_value().to_vec(), s.start())
        };
        let step = g.cycle.step();

        assert!(!g.animate_positions(t0 + Duration::from_millis(100), D * 2, TimingCurve::LINEAR));

        let s = g.position_session().unwrap();
        assert_eq!(s.from_value(), from.as_slice());
        assert_eq!(s.to_value(), to.as_slice());
        assert_eq!(s.start(), start);
        assert_eq!(s.duration(), D);
        assert_eq!(g.cycle.step(), step, "dropped request must not advance the cycle");
    }

    #[test]
    fn second_color_request_is_dropped() {
        let mut g = gradient();
        let t0 = Instant::now();
        assert_eq!(g.animate_colors(rgby(), t0, D, TimingCurve::LINEAR), Ok(true));
        let mut other = rgby();
        other.reverse();
        assert_eq!(g.animate_colors(other, t0, D, TimingCurve::LINEAR), Ok(false));
        assert_eq!(g.color_session().unwrap().to_value(), rgby().as_slice());
        assert_eq!(g.resting_colors(), rgby().as_slice());
    }

    #[test]
    fn color_count_mismatch_is_rejected_without_side_effects() {
        let mut g = gradient();
        let before = g.resting_colors().to_vec();
        let err = g.animate_colors(vec![GradientColor::black()], Instant::now(), D, TimingCurve::LINEAR);
        assert_eq!(err, Err(GradientError::ColorCount { expected: 4, actual: 1 }));
        assert!(g.color_session().is_none());
        assert_eq!(g.resting_colors(), before.as_slice());
    }

    #[test]
    fn rejected_position_session_leaves_layout_untouched() {
        let mut g = gradient();
        g.ring_len = 0;
        let points = g.resting_points().to_vec();
        let step = g.cycle.step();

        assert!(!g.animate_positions(Instant::now(), D, TimingCurve::LINEAR));
        assert!(g.position_session().is_none());
        assert_eq!(g.resting_points(), points.as_slice());
        assert_eq!(g.cycle.step(), step);
    }

    #[test]
    fn resolve_frame_scales_points_to_viewport() {
        let mut g = gradient();
        let mut out = FrameUniforms::default();
        g.resolve_frame(Instant::now(), Viewport::new(200.0, 100.0), &mut out);

        let expected: Vec<Vec2> = reference_primary()
            .into_iter()
            .map(|p| Vec2::new(p.x * 200.0, p.y * 100.0))
            .collect();
        assert_eq!(out.points, expected);
        assert_eq!(out.colors, GradientConfig::default().colors);
    }

    #[test]
    fn resolve_frame_clears_finished_sessions() {
        let mut g = gradient();
        let t0 = Instant::now();
        let viewport = Viewport::new(1.0, 1.0);
        let mut out = FrameUniforms::default();

        g.animate_positions(t0, D, TimingCurve::EASE_OUT);
        g.animate_colors(rgby(), t0, D, TimingCurve::EASE_OUT).unwrap();

        g.resolve_frame(t0 + D / 2, viewport, &mut out);
        assert!(g.is_animating());
        assert_ne!(out.colors, rgby());

        g.resolve_frame(t0 + D, viewport, &mut out);
        assert!(!g.is_animating());
        assert_eq!(out.colors, rgby());
        assert_eq!(out.points, reference_intermediate());

        // next position request continues the cycle
        assert!(g.animate_positions(t0 + D, D, TimingCurve::EASE_OUT));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut cfg = GradientConfig::default();
        cfg.colors.pop();
        assert_eq!(
            Gradient::new(&cfg).unwrap_err(),
            GradientError::ColorCount { expected: 4, actual: 3 }
        );

        let mut cfg = GradientConfig::default();
        cfg.frames_in_flight = 0;
        assert!(matches!(Gradient::new(&cfg), Err(GradientError::Animation(_))));

        let mut cfg = GradientConfig::default();
        cfg.primary_points = vec![Vec2::zero(); MAX_CONTROL_POINTS + 1];
        cfg.intermediate_points = cfg.primary_points.clone();
        cfg.colors = vec![GradientColor::white(); MAX_CONTROL_POINTS + 1];
        assert_eq!(
            Gradient::new(&cfg).unwrap_err(),
            GradientError::TooManyPoints(MAX_CONTROL_POINTS + 1)
        );
    }
}
