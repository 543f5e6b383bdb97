use crate::geometry::{Edge, Rect, Vec2};

/// Per-frame deformation parameters, in renderer-ready units.
///
/// Positions are stored raw (logical px) and normalised on read so the view
/// can change its frame without re-deriving every field.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformState {
    pub frame: Rect,
    pub edge: Edge,
    /// Drag point in frame-local px.
    pub touch: Vec2,
    /// Shift vector in px.
    pub shift: Vec2,
    pub fold_alpha: f32,
    pub overlay_alpha: f32,
    pub shadow_opacity: f32,
    pub shadow_radius: f32,
}

impl Default for UniformState {
    fn default() -> Self {
        Self {
            frame: Rect::default(),
            edge: Edge::Left,
            touch: Vec2::zero(),
            shift: Vec2::zero(),
            fold_alpha: 0.2,
            overlay_alpha: 0.0,
            shadow_opacity: 0.3,
            shadow_radius: 5.0,
        }
    }
}

impl UniformState {
    /// Touch normalised by the frame-local max corner, y flipped
    /// (`[x/maxX, 1 - y/maxY]`).
    pub fn normalized_touch(&self) -> [f32; 2] {
        [
            safe_div(self.touch.x, self.frame.width()),
            1.0 - safe_div(self.touch.y, self.frame.height()),
        ]
    }

    /// Shift normalised by frame size, y flipped (`[sx/w, -sy/h]`).
    pub fn normalized_shift(&self) -> [f32; 2] {
        [
            safe_div(self.shift.x, self.frame.width()),
            -safe_div(self.shift.y, self.frame.height()),
        ]
    }

    /// 1 for top/bottom edges: the shader swaps axes so every edge is
    /// handled as a horizontal one.
    #[inline]
    pub fn transpose(&self) -> f32 {
        match self.edge {
            Edge::Top | Edge::Bottom => 1.0,
            Edge::Left | Edge::Right => 0.0,
        }
    }

    #[inline]
    pub fn flip(&self) -> f32 {
        match self.edge {
            Edge::Bottom | Edge::Left => 1.0,
            Edge::Top | Edge::Right => 0.0,
        }
    }
}

#[inline]
fn safe_div(n: f32, d: f32) -> f32 {
    if d.abs() > f32::EPSILON && d.is_finite() { n / d } else { 0.0 }
}
