//! Error types for the deformation renderer.

use thiserror::Error;

/// A frame that could not be drawn.
///
/// Every variant is per-frame: the frame is skipped and the next tick tries
/// again. The controller counts consecutive failures to decide when to give
/// up on the elastic effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No snapshot texture is bound.
    #[error("no snapshot texture bound")]
    MissingTexture,

    /// Snapshot has a zero dimension.
    #[error("snapshot is empty ({width}x{height})")]
    EmptySnapshot { width: u32, height: u32 },

    /// Snapshot exceeds the device's 2D texture limit.
    #[error("snapshot {width}x{height} exceeds texture limit {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },

    /// Mesh has no triangles (zero-sized frame).
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// Backend-specific failure.
    #[error("render backend error: {0}")]
    Backend(String),
}
