/// Drawable size in physical pixels.
///
/// Normalized control points are multiplied by this before upload.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Whole-pixel size for sizing textures, never smaller than 1x1.
    pub fn texture_extent(self) -> (u32, u32) {
        let side = |v: f32| if v.is_finite() { v.max(1.0) as u32 } else { 1 };
        (side(self.width), side(self.height))
    }
}
