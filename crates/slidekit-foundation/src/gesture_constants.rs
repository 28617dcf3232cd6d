//! Shared gesture thresholds.
//!
//! All distances are in logical pixels and all times in milliseconds on the
//! same timeline the host uses to pump the runtime.

/// A release shorter than this counts as a flick.
pub const FLICK_MAX_DURATION_MILLIS: u64 = 250;

/// Minimum horizontal travel for a flick to count as a slide attempt.
///
/// Slower drags need to cross half a page instead.
pub const FLICK_MIN_DISTANCE: f32 = 20.0;

/// Number of velocity samples averaged at release.
pub const VELOCITY_SAMPLE_CAPACITY: usize = 4;

/// How long hosts should swallow clicks after a swipe that moved pages.
pub const CLICK_SUPPRESSION_MILLIS: u64 = 500;
