//! Two-point elastic physics.
//!
//! The drag point follows the finger; the shift point trails it through a
//! soft link and is what the renderer and the host progress are derived
//! from. Everything is plain data stepped at a fixed rate, so tests can run
//! whole gestures without a display loop.

mod body;
mod simulation;
mod spring;
mod stepper;
mod targets;

pub use body::PointMass;
pub use simulation::{release_direction, Simulation, StepDelta};
pub use spring::Spring;
pub use stepper::FixedStep;
pub use targets::{Outcome, TargetFrame};
