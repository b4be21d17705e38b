//! Cubic-bezier timing curves.
//!
//! A curve runs from `(0, 0)` to `(1, 1)` through two user control points.
//! Two evaluation modes exist and are kept separate:
//!
//! - [`TimingCurve::solve`] maps an elapsed-time fraction `x` to progress `y` by
//!   searching for the curve parameter `t` with `x(t) = x`. Animation sessions
//!   use this mode.
//! - [`TimingCurve::ratio_at`] evaluates `y(t)` directly for a caller-supplied
//!   parameter `t`. No root finding happens.

use crate::coords::Vec2;

/// Convergence tolerance on `x` for [`TimingCurve::solve`].
///
/// Coarse on purpose: one 60 Hz frame of a sub-second transition.
pub const SOLVE_EPSILON: f32 = 1.0 / 80.0;

/// Upper bound on bisection steps.
///
/// A monotonic curve converges well before this; the bound only matters for
/// non-finite input or curves built with [`TimingCurve::from_raw`].
pub const MAX_SOLVE_ITERATIONS: u32 = 32;

/// Cubic Bezier easing curve with fixed endpoints `(0, 0)` and `(1, 1)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimingCurve {
    p1: Vec2,
    p2: Vec2,
}

impl TimingCurve {
    pub const LINEAR: TimingCurve = TimingCurve::from_raw(0.0, 0.0, 1.0, 1.0);
    pub const EASE_IN: TimingCurve = TimingCurve::from_raw(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: TimingCurve = TimingCurve::from_raw(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_EASE_OUT: TimingCurve = TimingCurve::from_raw(0.42, 0.0, 0.58, 1.0);

    /// Creates a curve from control points `(x1, y1)` and `(x2, y2)`.
    ///
    /// `x1` and `x2` are clamped to `[0, 1]`, which keeps `x(t)` monotonic.
    /// Finite `y` components are kept as given, allowing overshoot. NaN and
    /// infinite components become `0`.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let clamp_x = |x: f32| if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let finite_y = |y: f32| if y.is_finite() { y } else { 0.0 };
        Self::from_raw(clamp_x(x1), finite_y(y1), clamp_x(x2), finite_y(y2))
    }

    /// Creates a curve without clamping `x` components.
    ///
    /// `x(t)` may be non-monotonic; [`solve`](Self::solve) still terminates but
    /// returns a best estimate.
    pub const fn from_raw(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            p1: Vec2::new(x1, y1),
            p2: Vec2::new(x2, y2),
        }
    }

    /// Creates a curve from `[x1, y1, x2, y2]`.
    pub fn from_array(values: [f32; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    #[inline]
    pub fn p1(&self) -> Vec2 {
        self.p1
    }

    #[inline]
    pub fn p2(&self) -> Vec2 {
        self.p2
    }

    /// Returns `[x1, y1, x2, y2]`.
    pub fn to_array(&self) -> [f32; 4] {
        [self.p1.x, self.p1.y, self.p2.x, self.p2.y]
    }

    /// Point on the curve at parameter `t`.
    ///
    /// `B(t) = 3(1-t)^2 t p1 + 3(1-t) t^2 p2 + t^3 (1, 1)`
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        Vec2::new(
            bezier_component(self.p1.x, self.p2.x, t),
            bezier_component(self.p1.y, self.p2.y, t),
        )
    }

    /// Direct-t mode: `y(t)` of the closed-form curve.
    ///
    /// For callers that already own the curve parameter. Not the same as
    /// [`solve`](Self::solve) unless the curve is the identity.
    #[inline]
    pub fn ratio_at(&self, t: f32) -> f32 {
        bezier_component(self.p1.y, self.p2.y, t)
    }

    /// Maps elapsed-time fraction `x` to eased progress.
    ///
    /// Inputs outside `[0, 1]` are clamped; `NaN` maps to `0`.
    pub fn solve(&self, x: f32) -> f32 {
        if x.is_nan() || x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.ratio_at(self.solve_parameter(x))
    }

    /// Finds `t` with `|x(t) - x| <= SOLVE_EPSILON` by bisection.
    ///
    /// Stops after [`MAX_SOLVE_ITERATIONS`] and returns the last midpoint.
    pub fn solve_parameter(&self, x: f32) -> f32 {
        let mut lower = 0.0f32;
        let mut upper = 1.0f32;
        let mut t = 0.5f32;

        for _ in 0..MAX_SOLVE_ITERATIONS {
            let current = bezier_component(self.p1.x, self.p2.x, t);
            if (x - current).abs() <= SOLVE_EPSILON {
                return t;
            }
            if current < x {
                lower = t;
            } else {
                upper = t;
            }
            t = 0.5 * (lower + upper);
        }

        log::trace!("timing curve solve hit iteration bound for x={x}");
        t
    }
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::EASE_OUT
    }
}

#[inline]
fn bezier_component(c1: f32, c2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * c1 + 3.0 * u * t * t * c2 + t * t * t
}

/// Named timing curves offered by the settings picker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TimingPreset {
    Linear,
    EaseIn,
    EaseOut,
    EaseInEaseOut,
    Custom(TimingCurve),
}

impl TimingPreset {
    /// Built-in presets in picker order (`Custom` excluded).
    pub const BUILT_IN: [TimingPreset; 4] = [
        TimingPreset::Linear,
        TimingPreset::EaseIn,
        TimingPreset::EaseOut,
        TimingPreset::EaseInEaseOut,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TimingPreset::Linear => "Linear",
            TimingPreset::EaseIn => "Ease In",
            TimingPreset::EaseOut => "Ease Out",
            TimingPreset::EaseInEaseOut => "Ease In Ease Out",
            TimingPreset::Custom(_) => "Custom",
        }
    }

    pub fn curve(&self) -> TimingCurve {
        match self {
            TimingPreset::Linear => TimingCurve::LINEAR,
            TimingPreset::EaseIn => TimingCurve::EASE_IN,
            TimingPreset::EaseOut => TimingCurve::EASE_OUT,
            TimingPreset::EaseInEaseOut => TimingCurve::EASE_IN_EASE_OUT,
            TimingPreset::Custom(curve) => *curve,
        }
    }

    /// Resolves a stored name.
    ///
    /// `"Custom"` takes its points from `custom`; unknown names yield `None`.
    pub fn from_name(name: &str, custom: TimingCurve) -> Option<Self> {
        match name {
            "Custom" => Some(TimingPreset::Custom(custom)),
            _ => Self::BUILT_IN.into_iter().find(|p| p.name() == name),
        }
    }

    /// Next built-in preset in picker order; `Custom` wraps to `Linear`.
    pub fn next(&self) -> Self {
        let idx = Self::BUILT_IN.iter().position(|p| p == self);
        match idx {
            Some(i) => Self::BUILT_IN[(i + 1) % Self::BUILT_IN.len()],
            None => TimingPreset::Linear,
        }
    }
}

impl Default for TimingPreset {
    fn default() -> Self {
        TimingPreset::EaseOut
    }
}
