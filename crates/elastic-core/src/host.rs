//! Collaborators the controller talks to: the navigation host, gestures and
//! snapshot capture.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{Edge, Rect, Vec2};
use crate::snapshot::Snapshot;

/// Opaque identity of a host view.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// The transition engine hosting the elastic effect.
pub trait AnimationHost {
    /// Bounds of the transition container; also the physics boundary.
    fn container_bounds(&self) -> Rect;

    /// Frame of `view` in container space.
    fn frame_of(&self, view: ViewId) -> Option<Rect>;

    fn hide(&mut self, view: ViewId);

    fn unhide(&mut self, view: ViewId);

    /// Transition progress, 0 at the initial target and 1 at the final one.
    /// Not clamped.
    fn update_progress(&mut self, progress: f32);

    /// Completes the transition. The host calls `clean` afterwards.
    fn finish(&mut self);

    /// Reverts the transition. The host calls `clean` afterwards.
    fn cancel(&mut self);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl GesturePhase {
    /// Began or Changed.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, GesturePhase::Began | GesturePhase::Changed)
    }
}

/// A pan gesture as seen by the controller.
pub trait GestureSource {
    fn phase(&self) -> GesturePhase;

    /// Current location in container space.
    fn location(&self) -> Vec2;

    /// Velocity in px/s; meaningful once the gesture has ended.
    fn velocity(&self) -> Vec2;
}

impl<T: GestureSource> GestureSource for RefCell<T> {
    fn phase(&self) -> GesturePhase {
        self.borrow().phase()
    }

    fn location(&self) -> Vec2 {
        self.borrow().location()
    }

    fn velocity(&self) -> Vec2 {
        self.borrow().velocity()
    }
}

/// Shared gesture handle. The input layer keeps one clone and mutates it
/// through interior mutability; the controller reads another.
pub type GestureHandle = Rc<dyn GestureSource>;

pub trait SnapshotSource {
    /// Rasterizes the current appearance of `view`.
    fn capture(&mut self, view: ViewId) -> Option<Snapshot>;
}

impl<F> SnapshotSource for F
where
    F: FnMut(ViewId) -> Option<Snapshot>,
{
    fn capture(&mut self, view: ViewId) -> Option<Snapshot> {
        self(view)
    }
}

/// Edge attachment of a gesture to a view.
#[derive(Clone)]
pub struct ElasticModifier {
    pub edge: Edge,
    pub gesture: GestureHandle,
}

impl ElasticModifier {
    pub fn new(edge: Edge, gesture: GestureHandle) -> Self {
        Self { edge, gesture }
    }
}

impl std::fmt::Debug for ElasticModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticModifier")
            .field("edge", &self.edge)
            .field("phase", &self.gesture.phase())
            .finish()
    }
}
