use crate::geometry::{Edge, Rect, Vec2};

/// Below this, a target distance is treated as zero and ratios collapse to 0.
const DEGENERATE_DISTANCE: f32 = 1e-4;

/// Terminal outcome of a released transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Commit,
    Cancel,
}

/// Target geometry of one transition: where the shift point rests when the
/// transition is closed, opened, not yet started or finished.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetFrame {
    pub bounds: Rect,
    pub edge: Edge,
    pub appearing: bool,
}

impl TargetFrame {
    pub fn new(bounds: Rect, edge: Edge, appearing: bool) -> Self {
        Self { bounds, edge, appearing }
    }

    #[inline]
    pub fn closed(&self, p: Vec2) -> Vec2 {
        self.edge.closed_target(p, self.bounds)
    }

    #[inline]
    pub fn opened(&self, p: Vec2) -> Vec2 {
        self.edge.opened_target(p, self.bounds)
    }

    /// An appearing transition finishes closed; a disappearing one finishes opened.
    #[inline]
    pub fn target(&self, p: Vec2, finished: bool) -> Vec2 {
        if self.appearing == finished {
            self.closed(p)
        } else {
            self.opened(p)
        }
    }

    /// Fraction of the way from the initial to the final target.
    ///
    /// Not clamped. Returns 0 when the two targets coincide.
    pub fn progress(&self, current: Vec2) -> f32 {
        let initial = self.target(current, false);
        let finished = self.target(current, true);
        ratio(current.distance(initial), finished.distance(initial))
    }

    /// How far the view is from covering the container: 0 when opened,
    /// 1 when closed. Drives overlay and shadow strength.
    pub fn overlay_progress(&self, current: Vec2) -> f32 {
        let closed = self.closed(current);
        let opened = self.opened(current);
        ratio(current.distance(opened), closed.distance(opened))
    }

    /// Commit if `shift` is strictly closer to its finished target; ties cancel.
    pub fn decide(&self, shift: Vec2) -> Outcome {
        let to_finished = shift.distance(self.target(shift, true));
        let to_unfinished = shift.distance(self.target(shift, false));
        if to_finished < to_unfinished {
            Outcome::Commit
        } else {
            Outcome::Cancel
        }
    }
}

#[inline]
fn ratio(num: f32, den: f32) -> f32 {
    if den > DEGENERATE_DISTANCE && den.is_finite() {
        num / den
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(edge: Edge, appearing: bool) -> TargetFrame {
        TargetFrame::new(Rect::new(0.0, 0.0, 300.0, 600.0), edge, appearing)
    }

    #[test]
    fn progress_is_zero_at_initial_and_one_at_final() {
        for edge in Edge::ALL {
            for appearing in [false, true] {
                let f = frame(edge, appearing);
                let p = Vec2::new(120.0, 340.0);
                let initial = f.target(p, false);
                let finished = f.target(p, true);
                assert_eq!(f.progress(initial), 0.0, "{edge:?} appearing={appearing}");
                assert!((f.progress(finished) - 1.0).abs() < 1e-6, "{edge:?} appearing={appearing}");
            }
        }
    }

    #[test]
    fn left_edge_drag_progress_rises_towards_opened_target() {
        let f = frame(Edge::Left, false);
        let mut last = -1.0;
        for x in (0..=300).step_by(10) {
            let p = f.progress(Vec2::new(x as f32, 300.0));
            assert!(p > last, "progress not increasing at x={x}");
            last = p;
        }
        assert!((last - 1.0).abs() < 1e-6);
        assert_eq!(f.target(Vec2::new(42.0, 300.0), true), Vec2::new(300.0, 300.0));
    }

    #[test]
    fn appearing_swaps_initial_and_final() {
        let f = frame(Edge::Right, true);
        let p = Vec2::new(10.0, 10.0);
        assert_eq!(f.target(p, false), f.opened(p));
        assert_eq!(f.target(p, true), f.closed(p));
    }

    #[test]
    fn zero_area_bounds_report_zero_progress() {
        let f = TargetFrame::new(Rect::new(50.0, 50.0, 0.0, 0.0), Edge::Left, false);
        assert_eq!(f.progress(Vec2::new(50.0, 50.0)), 0.0);
        assert_eq!(f.overlay_progress(Vec2::new(50.0, 50.0)), 0.0);
    }

    #[test]
    fn overlay_progress_is_one_when_closed() {
        let f = frame(Edge::Left, false);
        assert!((f.overlay_progress(Vec2::new(0.0, 10.0)) - 1.0).abs() < 1e-6);
        assert_eq!(f.overlay_progress(Vec2::new(300.0, 10.0)), 0.0);
    }

    #[test]
    fn decide_prefers_the_nearer_target() {
        let f = frame(Edge::Left, false);
        assert_eq!(f.decide(Vec2::new(320.0, 300.0)), Outcome::Commit);
        assert_eq!(f.decide(Vec2::new(-20.0, 300.0)), Outcome::Cancel);
    }

    #[test]
    fn decide_tie_cancels() {
        let f = frame(Edge::Left, false);
        assert_eq!(f.decide(Vec2::new(150.0, 300.0)), Outcome::Cancel);
    }
}
