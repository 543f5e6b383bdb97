//! Geometry types shared by the simulator, the view model and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down

mod edge;
mod rect;
mod vec2;

pub use edge::{Axis, Edge};
pub use rect::Rect;
pub use vec2::Vec2;
