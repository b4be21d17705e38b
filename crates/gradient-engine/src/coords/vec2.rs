use core::ops::{Add, Mul, Sub};

use super::Viewport;

/// 2D vector.
///
/// Used both for normalized control points and for their pixel-space
/// projection; the type does not track which space it is in.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// A gradient anchor in normalized `[0, 1]` view space.
pub type ControlPoint = Vec2;

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Per-axis linear blend, exact at `t = 0` and `t = 1`.
    #[inline]
    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        self * (1.0 - t) + to * t
    }

    /// Projects a normalized point onto a surface of `viewport` pixels.
    #[inline]
    pub fn to_pixels(self, viewport: Viewport) -> Vec2 {
        Vec2::new(self.x * viewport.width, self.y * viewport.height)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for Vec2 {
    #[inline]
    fn from([x, y]: [f32; 2]) -> Self {
        Vec2::new(x, y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}
