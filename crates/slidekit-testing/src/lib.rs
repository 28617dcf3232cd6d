//! Testing utilities and harness for slidekit

pub mod recording_surface;
pub mod robot;
pub mod robot_assertions;

pub use recording_surface::{PlacementLog, RecordingSurface, ViewportHandle};
pub use robot::CarouselRobot;

pub mod prelude {
    pub use crate::recording_surface::{PlacementLog, RecordingSurface, ViewportHandle};
    pub use crate::robot::CarouselRobot;
    pub use crate::robot_assertions;
    pub use slidekit::{Capabilities, CarouselEvent, CarouselOptions, EventKind, Placement};
}
