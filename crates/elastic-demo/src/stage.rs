//! The demo's navigation container.

use std::collections::HashSet;

use elastic_core::{AnimationHost, Edge, Rect, ViewId};

/// Page stack shown full-window, one page per `ViewId(index)`.
pub struct Stage {
    bounds: Rect,
    top: usize,
    hidden: HashSet<ViewId>,
    finished: bool,
}

/// A navigation in flight.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Page drawn by the elastic view.
    pub moving: ViewId,
    /// Page shown behind it.
    pub under: usize,
    /// Top of the stack once committed.
    pub destination: usize,
}

impl Stage {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            top: 0,
            hidden: HashSet::new(),
            finished: false,
        }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn top(&self) -> usize {
        self.top
    }

    #[cfg(test)]
    pub fn is_hidden(&self, view: ViewId) -> bool {
        self.hidden.contains(&view)
    }

    /// Pop (`appearing == false`) or push navigation from the current top.
    /// Popping needs a page underneath.
    pub fn navigation(&self, appearing: bool) -> Option<Navigation> {
        if appearing {
            let next = self.top + 1;
            Some(Navigation {
                moving: ViewId(next as u64),
                under: self.top,
                destination: next,
            })
        } else {
            let below = self.top.checked_sub(1)?;
            Some(Navigation {
                moving: ViewId(self.top as u64),
                under: below,
                destination: below,
            })
        }
    }

    /// Applies `nav` if the host was told to finish. Returns whether the
    /// top changed.
    pub fn settle(&mut self, nav: Navigation) -> bool {
        let committed = std::mem::take(&mut self.finished);
        if committed {
            self.top = nav.destination;
        }
        committed
    }

    /// Completes `nav` without animation.
    pub fn jump(&mut self, nav: Navigation) {
        self.hidden.remove(&nav.moving);
        self.finished = false;
        self.top = nav.destination;
    }

    /// Strip along `edge` where a pan may start.
    pub fn edge_strip(&self, edge: Edge, width: f32) -> Rect {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        let w = width.min(self.bounds.width()).min(self.bounds.height());
        match edge {
            Edge::Left => Rect::new(min.x, min.y, w, self.bounds.height()),
            Edge::Right => Rect::new(max.x - w, min.y, w, self.bounds.height()),
            Edge::Top => Rect::new(min.x, min.y, self.bounds.width(), w),
            Edge::Bottom => Rect::new(min.x, max.y - w, self.bounds.width(), w),
        }
    }
}

impl AnimationHost for Stage {
    fn container_bounds(&self) -> Rect {
        self.bounds
    }

    fn frame_of(&self, _view: ViewId) -> Option<Rect> {
        Some(self.bounds)
    }

    fn hide(&mut self, view: ViewId) {
        self.hidden.insert(view);
    }

    fn unhide(&mut self, view: ViewId) {
        self.hidden.remove(&view);
    }

    fn update_progress(&mut self, progress: f32) {
        log::trace!("navigation progress {progress:.3}");
    }

    fn finish(&mut self) {
        log::info!("navigation committed");
        self.finished = true;
    }

    fn cancel(&mut self) {
        log::info!("navigation cancelled");
        self.finished = false;
    }
}
