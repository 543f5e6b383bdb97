use super::{Rect, Vec2};

/// Viewport size in logical pixels.
///
/// Renderers upload this to convert logical px positions to NDC in shaders.
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
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The whole viewport as a rectangle at the origin.
    #[inline]
    pub fn bounds(self) -> Rect {
        Rect::from_origin_size(Vec2::zero(), Vec2::new(self.width, self.height))
    }

    /// Maps a logical point to normalized device coordinates (+Y up).
    pub fn to_ndc(self, p: Vec2) -> [f32; 2] {
        if !self.is_valid() {
            return [0.0, 0.0];
        }
        [p.x / self.width * 2.0 - 1.0, 1.0 - p.y / self.height * 2.0]
    }
}
