use crate::coords::ControlPoint;

use super::AnimationError;

/// Number of layouts produced before the cycle repeats.
pub const DEFAULT_STEPS_COUNT: usize = 8;

/// Deterministic sequence of control-point layouts.
///
/// Alternates between two base shapes (intermediate on even steps, primary on
/// odd steps) while rotating which slot each point occupies. Rotation never
/// changes set membership, only order, so the gradient appears to tumble
/// rather than jump to random positions.
#[derive(Debug, Clone)]
pub struct GradientLayoutCycle {
    primary: Vec<ControlPoint>,
    intermediate: Vec<ControlPoint>,
    step: usize,
    steps_count: usize,
}

impl GradientLayoutCycle {
    /// Creates a cycle over two equally sized point sets.
    pub fn new(
        primary: Vec<ControlPoint>,
        intermediate: Vec<ControlPoint>,
    ) -> Result<Self, AnimationError> {
        Self::with_steps(primary, intermediate, DEFAULT_STEPS_COUNT)
    }

    /// Like [`new`](Self::new) with a custom cycle length (minimum 1).
    pub fn with_steps(
        primary: Vec<ControlPoint>,
        intermediate: Vec<ControlPoint>,
        steps_count: usize,
    ) -> Result<Self, AnimationError> {
        if primary.is_empty() {
            return Err(AnimationError::Empty);
        }
        if primary.len() != intermediate.len() {
            return Err(AnimationError::LengthMismatch {
                expected: primary.len(),
                actual: intermediate.len(),
            });
        }
        Ok(Self {
            primary,
            intermediate,
            step: 0,
            steps_count: steps_count.max(1),
        })
    }

    /// Number of points per layout.
    #[inline]
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Resting layout shown before the first transition.
    #[inline]
    pub fn primary(&self) -> &[ControlPoint] {
        &self.primary
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// The layout [`advance`](Self::advance) would return, without moving.
    pub fn peek(&self) -> Vec<ControlPoint> {
        let source = if self.step % 2 == 0 {
            &self.intermediate
        } else {
            &self.primary
        };
        let shift = (self.step + 1) / 2;

        let mut next = source.clone();
        let n = next.len();
        if shift != 0 && n != 0 {
            next.rotate_left(shift % n);
        }
        next
    }

    /// Returns the next target layout and moves the cycle forward one step.
    pub fn advance(&mut self) -> Vec<ControlPoint> {
        let next = self.peek();
        self.step = (self.step + 1) % self.steps_count;
        next
    }

    /// Rewinds to step zero.
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

/// Primary layout of the reference gradient.
pub fn reference_primary() -> Vec<ControlPoint> {
    vec![
        ControlPoint::new(0.361, 0.249),
        ControlPoint::new(0.185, 0.92),
        ControlPoint::new(0.648, 0.757),
        ControlPoint::new(0.824, 0.082),
    ]
}

/// Intermediate layout of the reference gradient.
pub fn reference_intermediate() -> Vec<ControlPoint> {
    vec![
        ControlPoint::new(0.266, 0.582),
        ControlPoint::new(0.413, 0.836),
        ControlPoint::new(0.734, 0.419),
        ControlPoint::new(0.588, 0.165),
    ]
}

impl Default for GradientLayoutCycle {
    fn default() -> Self {
        Self {
            primary: reference_primary(),
            intermediate: reference_intermediate(),
            step: 0,
            steps_count: DEFAULT_STEPS_COUNT,
        }
    }
}
