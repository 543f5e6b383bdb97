//! Elastic edge transition core.
//!
//! Backend-free pieces of the effect: the edge/geometry model, the two-point
//! physics simulation, the deforming view model and the transition
//! controller. GPU drawing is delegated to a [`renderer::MeshRenderer`].

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod mesh;
pub mod physics;
pub mod renderer;
pub mod snapshot;
pub mod uniform;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{ElasticConfig, PhysicsConfig};
pub use controller::{AnimationDuration, ElasticController, TickReport, TransitionState};
pub use error::RenderError;
pub use geometry::{Axis, Edge, Rect, Vec2};
pub use host::{
    AnimationHost, ElasticModifier, GestureHandle, GesturePhase, GestureSource, SnapshotSource,
    ViewId,
};
pub use physics::Outcome;
pub use snapshot::Snapshot;
