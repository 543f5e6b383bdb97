use super::{Rect, Vec2};

/// Screen boundary a transition gesture starts from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Axis a gesture from a given edge travels along.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    #[inline]
    pub const fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
        }
    }

    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
        }
    }

    /// Projects `p` onto the boundary of `bounds` that a fully opened
    /// transition from this edge rests against.
    ///
    /// The cross-axis coordinate of `p` is kept unchanged.
    #[inline]
    pub fn opened_target(self, p: Vec2, bounds: Rect) -> Vec2 {
        let (min, max) = (bounds.min(), bounds.max());
        match self {
            Edge::Left => Vec2::new(max.x, p.y),
            Edge::Right => Vec2::new(min.x, p.y),
            Edge::Top => Vec2::new(p.x, max.y),
            Edge::Bottom => Vec2::new(p.x, min.y),
        }
    }

    /// Projection onto the boundary a closed transition rests against.
    #[inline]
    pub fn closed_target(self, p: Vec2, bounds: Rect) -> Vec2 {
        self.opposite().opened_target(p, bounds)
    }
}
