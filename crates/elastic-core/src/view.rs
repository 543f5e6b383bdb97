use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::config::ElasticConfig;
use crate::error::RenderError;
use crate::geometry::{Edge, Rect, Vec2};
use crate::mesh::MeshGeometry;
use crate::renderer::{MeshRenderer, PresentCallback};
use crate::snapshot::Snapshot;
use crate::uniform::UniformState;

type FrameHandler = Box<dyn FnOnce() + 'static>;

/// CPU-side model of the deforming view.
///
/// Owns the mesh, the snapshot, the uniform state and the renderer that
/// turns them into pixels. All setters are cheap; GPU work happens in
/// [`ElasticView::draw`].
pub struct ElasticView<R: MeshRenderer> {
    renderer: R,

    frame: Rect,
    cell_size: f32,
    mesh: Option<MeshGeometry>,
    mesh_dirty: bool,

    uniform: UniformState,
    max_overlay_alpha: f32,
    shadow_base: f32,
    shadow_range: f32,

    snapshot: Option<Snapshot>,

    // Handlers waiting for the next drawn frame, and those attached to a
    // submitted frame keyed by sequence number.
    pending: Vec<FrameHandler>,
    in_flight: HashMap<u64, Vec<FrameHandler>>,
    next_seq: u64,
    presented_tx: Sender<u64>,
    presented_rx: Receiver<u64>,
}

impl<R: MeshRenderer> ElasticView<R> {
    pub fn new(renderer: R, frame: Rect, config: &ElasticConfig) -> Self {
        let (presented_tx, presented_rx) = mpsc::channel();
        Self {
            renderer,
            frame,
            cell_size: config.cell_size,
            mesh: None,
            mesh_dirty: true,
            uniform: UniformState {
                frame,
                fold_alpha: config.fold_alpha,
                shadow_opacity: config.initial_shadow_opacity,
                shadow_radius: config.shadow_radius,
                ..UniformState::default()
            },
            max_overlay_alpha: config.max_overlay_alpha,
            shadow_base: config.shadow_base,
            shadow_range: config.shadow_range,
            snapshot: None,
            pending: Vec::new(),
            in_flight: HashMap::new(),
            next_seq: 0,
            presented_tx,
            presented_rx,
        }
    }

    #[inline]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    #[inline]
    pub fn uniform(&self) -> &UniformState {
        &self.uniform
    }

    #[inline]
    pub fn mesh(&self) -> Option<&MeshGeometry> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Moves the view. The mesh is only rebuilt when the size changes.
    pub fn set_frame(&mut self, frame: Rect) {
        if frame.size != self.frame.size {
            self.mesh_dirty = true;
        } else if frame.origin != self.frame.origin {
            // Same tessellation, new placement.
            if let Some(mesh) = self.mesh.as_ref() {
                self.renderer.resize(mesh, frame);
            }
        }
        self.frame = frame;
        self.uniform.frame = frame;
    }

    pub fn set_edge(&mut self, edge: Edge) {
        self.uniform.edge = edge;
    }

    pub fn set_shift(&mut self, shift: Vec2) {
        self.uniform.shift = shift;
    }

    /// `touch` is in container space.
    pub fn set_touch_position(&mut self, touch: Vec2) {
        self.uniform.touch = touch - self.frame.origin;
    }

    /// Sets overlay alpha and shadow opacity from a 0..1 coverage value.
    pub fn set_overlay_progress(&mut self, progress: f32) {
        let p = if progress.is_finite() { progress } else { 0.0 };
        self.uniform.overlay_alpha = self.max_overlay_alpha * p;
        self.uniform.shadow_opacity = self.shadow_base + self.shadow_range * p;
    }

    pub fn set_fold_alpha(&mut self, alpha: f32) {
        self.uniform.fold_alpha = alpha;
    }

    pub fn set_shadow_opacity(&mut self, opacity: f32) {
        self.uniform.shadow_opacity = opacity;
    }

    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.renderer.set_texture(&snapshot);
        self.snapshot = Some(snapshot);
    }

    pub fn release_snapshot(&mut self) {
        if self.snapshot.take().is_some() {
            self.renderer.release_texture();
        }
    }

    /// Draws one frame.
    ///
    /// Handlers registered with [`ElasticView::on_next_frame`] are attached
    /// to this frame if it succeeds and kept for the next one otherwise.
    pub fn draw(&mut self, target: &mut R::Target<'_>) -> Result<(), RenderError> {
        match self.snapshot.as_ref() {
            None => return Err(RenderError::MissingTexture),
            Some(s) if s.is_empty() => {
                return Err(RenderError::EmptySnapshot {
                    width: s.width(),
                    height: s.height(),
                });
            }
            Some(_) => {}
        }

        if self.mesh_dirty || self.mesh.is_none() {
            let mesh = MeshGeometry::for_size(self.frame.size, self.cell_size);
            log::debug!(
                "elastic mesh rebuilt: {}x{} cells for {:?}",
                mesh.columns(),
                mesh.rows(),
                self.frame.size
            );
            self.renderer.resize(&mesh, self.frame);
            self.mesh = Some(mesh);
            self.mesh_dirty = false;
        }

        self.renderer.upload_uniform(&self.uniform);

        let attached = if self.pending.is_empty() {
            None
        } else {
            let seq = self.next_seq;
            self.next_seq = self.next_seq.wrapping_add(1);
            self.in_flight.insert(seq, std::mem::take(&mut self.pending));
            Some(seq)
        };

        let callback = attached.map(|seq| {
            let tx = self.presented_tx.clone();
            Box::new(move || {
                // Receiver gone means the view was dropped; nothing to run.
                let _ = tx.send(seq);
            }) as PresentCallback
        });

        let result = self.renderer.draw(target, callback);

        if result.is_err() {
            if let Some(mut handlers) = attached.and_then(|seq| self.in_flight.remove(&seq)) {
                handlers.append(&mut self.pending);
                self.pending = handlers;
            }
        }
        result
    }

    /// Runs `handler` once the next successfully drawn frame is presented.
    ///
    /// Presentation may be observed on another thread; the handler itself
    /// only runs from [`ElasticView::poll_presented`].
    pub fn on_next_frame(&mut self, handler: impl FnOnce() + 'static) {
        self.pending.push(Box::new(handler));
    }

    /// Runs handlers of frames presented since the last poll. Returns how many ran.
    pub fn poll_presented(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(seq) = self.presented_rx.try_recv() {
            if let Some(handlers) = self.in_flight.remove(&seq) {
                for handler in handlers {
                    handler();
                    ran += 1;
                }
            }
        }
        ran
    }

    /// Handlers not yet run (pending or in flight).
    pub fn outstanding_handlers(&self) -> usize {
        self.pending.len() + self.in_flight.values().map(Vec::len).sum::<usize>()
    }

    /// Container-space hit test on the deformed view.
    ///
    /// Returns the point moved back by the current shift if it lands inside
    /// the frame.
    pub fn hit_test(&self, point: Vec2) -> Option<Vec2> {
        let p = point - self.uniform.shift;
        self.frame.contains(p).then_some(p)
    }

    /// Releases the snapshot and hands the renderer back for reuse.
    pub fn into_renderer(mut self) -> R {
        self.release_snapshot();
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::Recorder;

    fn view() -> ElasticView<Recorder> {
        let mut v = ElasticView::new(
            Recorder::default(),
            Rect::new(0.0, 0.0, 300.0, 600.0),
            &ElasticConfig::default(),
        );
        v.set_snapshot(Snapshot::solid(300, 600, [255; 4]));
        v
    }

    fn present_all(v: &mut ElasticView<Recorder>) {
        v.renderer_mut().present_all();
    }

    #[test]
    fn draw_without_snapshot_fails() {
        let mut v = ElasticView::new(
            Recorder::default(),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            &ElasticConfig::default(),
        );
        assert_eq!(v.draw(&mut ()), Err(RenderError::MissingTexture));
    }

    #[test]
    fn empty_snapshot_fails() {
        let mut v = view();
        v.set_snapshot(Snapshot::solid(0, 5, [0; 4]));
        assert_eq!(
            v.draw(&mut ()),
            Err(RenderError::EmptySnapshot { width: 0, height: 5 })
        );
    }

    #[test]
    fn mesh_rebuilt_once_per_size_change() {
        let mut v = view();
        v.draw(&mut ()).unwrap();
        v.draw(&mut ()).unwrap();
        assert_eq!(v.renderer().resizes.len(), 1);
        assert_eq!(v.renderer().resizes[0].0, 30);

        v.set_frame(Rect::new(0.0, 0.0, 200.0, 600.0));
        v.set_frame(Rect::new(0.0, 0.0, 100.0, 600.0));
        v.draw(&mut ()).unwrap();
        assert_eq!(v.renderer().resizes.len(), 2);
        assert_eq!(v.renderer().resizes[1].0, 10);
        assert_eq!(v.renderer().uniforms.len(), 3);
    }

    #[test]
    fn next_frame_handler_runs_after_presentation() {
        let mut v = view();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        v.on_next_frame(move || h.set(h.get() + 1));

        v.draw(&mut ()).unwrap();
        assert_eq!(v.poll_presented(), 0);
        assert_eq!(hits.get(), 0);

        present_all(&mut v);
        assert_eq!(v.poll_presented(), 1);
        assert_eq!(hits.get(), 1);

        // One-shot.
        v.draw(&mut ()).unwrap();
        present_all(&mut v);
        assert_eq!(v.poll_presented(), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn failed_frame_keeps_handler_for_next_one() {
        let mut v = view();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        v.on_next_frame(move || h.set(h.get() + 1));

        v.renderer_mut().fail = true;
        assert!(v.draw(&mut ()).is_err());
        assert_eq!(v.outstanding_handlers(), 1);

        v.renderer_mut().fail = false;
        v.draw(&mut ()).unwrap();
        present_all(&mut v);
        v.poll_presented();
        assert_eq!(hits.get(), 1);
        assert_eq!(v.outstanding_handlers(), 0);
    }

    #[test]
    fn hit_test_offsets_by_shift() {
        let mut v = view();
        v.set_shift(Vec2::new(100.0, 0.0));
        assert_eq!(v.hit_test(Vec2::new(150.0, 20.0)), Some(Vec2::new(50.0, 20.0)));
        assert_eq!(v.hit_test(Vec2::new(50.0, 20.0)), None);
    }

    #[test]
    fn overlay_progress_drives_overlay_and_shadow() {
        let mut v = view();
        assert!((v.uniform().shadow_opacity - 0.3).abs() < 1e-6);
        v.set_overlay_progress(1.0);
        assert!((v.uniform().overlay_alpha - 0.08).abs() < 1e-6);
        assert!((v.uniform().shadow_opacity - 0.3).abs() < 1e-6);
        v.set_overlay_progress(0.0);
        assert_eq!(v.uniform().overlay_alpha, 0.0);
        assert!((v.uniform().shadow_opacity - 0.1).abs() < 1e-6);
    }

    #[test]
    fn touch_is_stored_frame_local() {
        let mut v = view();
        v.set_frame(Rect::new(20.0, 40.0, 300.0, 600.0));
        v.set_touch_position(Vec2::new(120.0, 140.0));
        assert_eq!(v.uniform().touch, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn into_renderer_releases_texture() {
        let v = view();
        assert!(v.renderer().texture);
        let r = v.into_renderer();
        assert!(!r.texture);
    }
}
