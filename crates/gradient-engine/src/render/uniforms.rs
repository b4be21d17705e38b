use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::GradientColor;

/// Upper bound on control points the gradient shader accepts.
pub const MAX_CONTROL_POINTS: usize = 8;

/// Full-screen quad as two triangles, clip-space `(x, y, z, w)`.
pub const QUAD_VERTICES: [[f32; 4]; 6] = [
    [-1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, 1.0],
];

/// Per-frame input of the gradient draw.
///
/// `points` are in surface pixels (top-left origin, +Y down). Both vectors
/// are reused across ticks by the driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameUniforms {
    pub colors: Vec<GradientColor>,
    pub points: Vec<Vec2>,
}

impl FrameUniforms {
    #[inline]
    pub fn vertices(&self) -> &'static [[f32; 4]; 6] {
        &QUAD_VERTICES
    }

    /// Number of color/point pairs the shader will read.
    #[inline]
    pub fn count(&self) -> usize {
        self.colors.len().min(self.points.len()).min(MAX_CONTROL_POINTS)
    }

    /// Packs into the std140-compatible uniform block.
    ///
    /// Extra entries beyond [`MAX_CONTROL_POINTS`] are ignored.
    pub fn to_block(&self) -> GradientUniformBlock {
        let mut block = GradientUniformBlock::zeroed();
        let n = self.count();
        for (slot, c) in block.colors.iter_mut().zip(&self.colors[..n]) {
            *slot = c.to_array();
        }
        for (slot, p) in block.points.iter_mut().zip(&self.points[..n]) {
            *slot = [p.x, p.y, 0.0, 0.0];
        }
        block.count = n as u32;
        block
    }
}

/// GPU layout of the gradient uniform buffer. Mirrors `Gradient` in
/// `shaders/gradient.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct GradientUniformBlock {
    pub colors: [[f32; 4]; MAX_CONTROL_POINTS],
    /// `xy` used; `zw` padding.
    pub points: [[f32; 4]; MAX_CONTROL_POINTS],
    pub count: u32,
    pub _pad: [u32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<GradientUniformBlock>() % 16, 0);
        assert_eq!(std::mem::size_of::<GradientUniformBlock>(), 272);
    }

    #[test]
    fn to_block_packs_pairs_in_order() {
        let u = FrameUniforms {
            colors: vec![GradientColor::rgb(1.0, 0.0, 0.0), GradientColor::rgb(0.0, 0.0, 1.0)],
            points: vec![Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0)],
        };
        let b = u.to_block();
        assert_eq!(b.count, 2);
        assert_eq!(b.colors[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(b.colors[1], [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(b.points[1], [30.0, 40.0, 0.0, 0.0]);
        assert_eq!(b.colors[2], [0.0; 4]);
    }

    #[test]
    fn count_is_capped() {
        let u = FrameUniforms {
            colors: vec![GradientColor::white(); MAX_CONTROL_POINTS + 3],
            points: vec![Vec2::zero(); MAX_CONTROL_POINTS + 3],
        };
        assert_eq!(u.to_block().count as usize, MAX_CONTROL_POINTS);
    }

    #[test]
    fn quad_covers_clip_space() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| v[1]).collect();
        assert!(xs.contains(&-1.0) && xs.contains(&1.0));
        assert!(ys.contains(&-1.0) && ys.contains(&1.0));
        assert!(QUAD_VERTICES.iter().all(|v| v[2] == 0.0 && v[3] == 1.0));
    }
}
