//! Platform abstraction layer
//!
//! Host-agnostic pieces the browser shell and the native demo share:
//! - Input sampling (keyboard and touch)
//! - Frame timing

pub mod input;
pub mod time;

pub use input::{DriveKey, InputSampler, TOUCH_DEAD_ZONE};
pub use time::{FrameClock, NOMINAL_FRAME_MS};
