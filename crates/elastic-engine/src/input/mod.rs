//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform::winit` translates window events into `InputEvent`s, and
//! [`PanTracker`] turns pointer/touch streams into an edge pan gesture.

mod frame;
mod pan;
mod state;
mod types;

pub mod platform;

pub use frame::InputFrame;
pub use pan::PanTracker;
pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent, TouchEvent, TouchPhase,
};
