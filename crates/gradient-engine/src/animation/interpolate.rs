use crate::coords::Vec2;
use crate::paint::GradientColor;

use super::AnimationError;

/// Values that can be blended between a start and a target.
///
/// `ratio = 0` must return `from`, `ratio = 1` must return `to`.
pub trait Interpolate: Copy {
    fn interpolate(from: Self, to: Self, ratio: f32) -> Self;
}

impl Interpolate for GradientColor {
    #[inline]
    fn interpolate(from: Self, to: Self, ratio: f32) -> Self {
        from.mix(to, ratio)
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn interpolate(from: Self, to: Self, ratio: f32) -> Self {
        from.lerp(to, ratio)
    }
}

/// Blends two index-aligned sequences into a new vector.
pub fn interpolate<T: Interpolate>(
    from: &[T],
    to: &[T],
    ratio: f32,
) -> Result<Vec<T>, AnimationError> {
    let mut out = Vec::with_capacity(from.len());
    interpolate_into(from, to, ratio, &mut out)?;
    Ok(out)
}

/// Blends two index-aligned sequences into `out`, reusing its allocation.
///
/// On length mismatch `out` is left untouched.
pub fn interpolate_into<T: Interpolate>(
    from: &[T],
    to: &[T],
    ratio: f32,
    out: &mut Vec<T>,
) -> Result<(), AnimationError> {
    if from.len() != to.len() {
        return Err(AnimationError::LengthMismatch {
            expected: from.len(),
            actual: to.len(),
        });
    }
    out.clear();
    out.extend(from.iter().zip(to).map(|(&a, &b)| T::interpolate(a, b, ratio)));
    Ok(())
}
