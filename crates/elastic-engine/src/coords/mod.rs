//! Coordinate types shared by the runtime, input and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! `Rect` and `Vec2` come from `elastic-core` so physics, input and
//! rendering agree on one set of types.

mod viewport;

pub use elastic_core::geometry::{Rect, Vec2};
pub use viewport::Viewport;
