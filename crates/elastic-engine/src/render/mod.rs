//! GPU rendering subsystem.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using the viewport in their uniform.

mod ctx;
pub mod mesh;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{ElasticMeshRenderer, MeshPass};
