//! Time subsystem.
//!
//! - one `FrameClock` per window
//! - call `tick()` once per frame to obtain `FrameTime`
//!
//! `FrameTime::elapsed` is the timestamp fed to gesture velocity tracking.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
