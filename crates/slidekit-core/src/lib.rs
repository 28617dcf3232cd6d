#![doc = r"Single-threaded scheduling runtime for the slidekit carousel engine."]

pub mod frame_clock;
pub mod platform;
pub mod runtime;

pub use frame_clock::FrameClock;
pub use platform::RuntimeScheduler;
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle, TaskHandle};

/// Identifier shared by frame callbacks, timers and deferred tasks.
pub type TaskId = u64;
