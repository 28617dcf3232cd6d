//! Platform abstraction for runtime scheduling.
//!
//! Hosts decide when frames happen. The runtime only asks for one.

/// Schedules work for the slidekit runtime.
///
/// Implementations trigger frame processing on behalf of the runtime. A
/// browser host would request an animation frame, a native host would
/// request a redraw from its window.
pub trait RuntimeScheduler {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}
