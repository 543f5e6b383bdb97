//! Elastic engine crate.
//!
//! Platform + GPU runtime for the elastic transition: window loop, device,
//! input and pan tracking, frame timing, logging and the wgpu mesh renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
