//! Geometry and gesture models behind the slidekit carousel.
//!
//! Everything here is plain data and pure functions; scheduling and state
//! ownership live in the `slidekit` crate.

pub mod gesture;
pub mod gesture_constants;
pub mod layout;
pub mod position;
pub mod resistance;
pub mod velocity;

pub use gesture::{
    GestureState, GestureTracker, MoveOutcome, PointerSample, Release, ReleaseContext,
    ReleaseKind, ScrollIntent,
};
pub use layout::{
    measure, resolve_width, DeclaredWidth, FixedWidth, Layout, LayoutError, PagesPerViewRounding,
    WidthProbe,
};
pub use position::{resting_offset, resting_offsets, will_pass_through_viewport};
pub use resistance::{damped_displacement, frame_offsets, overshoot, resistance, FrameOffsets};
pub use velocity::VelocityRing;
