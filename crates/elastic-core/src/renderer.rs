//! Backend-neutral interface of the deformation renderer.
//!
//! `ElasticView` owns the CPU-side state and drives a `MeshRenderer`;
//! the wgpu implementation lives in `elastic-engine`.

use crate::error::RenderError;
use crate::geometry::Rect;
use crate::mesh::MeshGeometry;
use crate::snapshot::Snapshot;
use crate::uniform::UniformState;

/// Called once the frame it was attached to has been handed to the display.
///
/// May run on any thread.
pub type PresentCallback = Box<dyn FnOnce() + Send + 'static>;

pub trait MeshRenderer {
    /// Per-frame draw destination (encoder, colour view, ...).
    type Target<'a>
    where
        Self: 'a;

    /// Replaces the mesh and the frame it covers (logical px).
    fn resize(&mut self, mesh: &MeshGeometry, frame: Rect);

    fn upload_uniform(&mut self, uniform: &UniformState);

    fn set_texture(&mut self, snapshot: &Snapshot);

    fn release_texture(&mut self);

    /// Draws the whole mesh once with the bound texture.
    ///
    /// `on_presented` must be invoked exactly once if the draw succeeds and
    /// dropped without being called if it fails.
    fn draw(
        &mut self,
        target: &mut Self::Target<'_>,
        on_presented: Option<PresentCallback>,
    ) -> Result<(), RenderError>;
}
