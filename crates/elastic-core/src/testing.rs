//! In-memory collaborators shared by unit tests.

use std::cell::Cell;

use crate::error::RenderError;
use crate::geometry::{Rect, Vec2};
use crate::host::{AnimationHost, GesturePhase, GestureSource, ViewId};
use crate::mesh::MeshGeometry;
use crate::renderer::{MeshRenderer, PresentCallback};
use crate::snapshot::Snapshot;
use crate::uniform::UniformState;

#[derive(Default)]
pub(crate) struct Recorder {
    pub resizes: Vec<(u32, u32, Rect)>,
    pub uniforms: Vec<UniformState>,
    pub texture: bool,
    pub fail: bool,
    pub draws: usize,
    pub presented: Vec<PresentCallback>,
}

impl Recorder {
    /// Signals presentation of every successfully drawn frame so far.
    pub fn present_all(&mut self) {
        for cb in self.presented.drain(..) {
            cb();
        }
    }
}

impl MeshRenderer for Recorder {
    type Target<'a>
        = ()
    where
        Self: 'a;

    fn resize(&mut self, mesh: &MeshGeometry, frame: Rect) {
        self.resizes.push((mesh.columns(), mesh.rows(), frame));
    }

    fn upload_uniform(&mut self, uniform: &UniformState) {
        self.uniforms.push(*uniform);
    }

    fn set_texture(&mut self, _snapshot: &Snapshot) {
        self.texture = true;
    }

    fn release_texture(&mut self) {
        self.texture = false;
    }

    fn draw(
        &mut self,
        _target: &mut (),
        on_presented: Option<PresentCallback>,
    ) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError::Backend("device lost".into()));
        }
        self.draws += 1;
        self.presented.extend(on_presented);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HostCall {
    Hide(ViewId),
    Unhide(ViewId),
    Progress(f32),
    Finish,
    Cancel,
}

pub(crate) struct Host {
    pub bounds: Rect,
    pub calls: Vec<HostCall>,
}

impl Host {
    pub fn new() -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, 300.0, 600.0),
            calls: Vec::new(),
        }
    }

    pub fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl AnimationHost for Host {
    fn container_bounds(&self) -> Rect {
        self.bounds
    }

    fn frame_of(&self, _view: ViewId) -> Option<Rect> {
        Some(self.bounds)
    }

    fn hide(&mut self, view: ViewId) {
        self.calls.push(HostCall::Hide(view));
    }

    fn unhide(&mut self, view: ViewId) {
        self.calls.push(HostCall::Unhide(view));
    }

    fn update_progress(&mut self, progress: f32) {
        self.calls.push(HostCall::Progress(progress));
    }

    fn finish(&mut self) {
        self.calls.push(HostCall::Finish);
    }

    fn cancel(&mut self) {
        self.calls.push(HostCall::Cancel);
    }
}

/// Gesture whose state the test sets directly.
pub(crate) struct Scripted {
    pub phase: Cell<GesturePhase>,
    pub location: Cell<Vec2>,
    pub velocity: Cell<Vec2>,
}

impl Scripted {
    pub fn new(phase: GesturePhase, location: Vec2) -> Self {
        Self {
            phase: Cell::new(phase),
            location: Cell::new(location),
            velocity: Cell::new(Vec2::zero()),
        }
    }
}

impl GestureSource for Scripted {
    fn phase(&self) -> GesturePhase {
        self.phase.get()
    }

    fn location(&self) -> Vec2 {
        self.location.get()
    }

    fn velocity(&self) -> Vec2 {
        self.velocity.get()
    }
}
