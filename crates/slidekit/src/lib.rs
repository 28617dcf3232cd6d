//! Headless paged carousel: turns commands, pointer streams and timers into
//! page placements and lifecycle events.
//!
//! Rendering is delegated to a [`Surface`]; scheduling to a
//! [`slidekit_core::Runtime`] the host pumps.

mod auto_advance;
mod carousel;
pub mod events;
pub mod options;
pub mod surface;
pub mod toss_animation;
mod transition;

pub use carousel::{Carousel, PointerResponse};
pub use events::{CarouselEvent, EventKind, Events, ListenerId};
pub use options::{CarouselOptions, DEFAULT_SPEED_MILLIS};
pub use surface::{Capabilities, Placement, Surface};
pub use toss_animation::TossAnimation;
pub use transition::{PageMove, PageMoves};

pub use slidekit_core::{Runtime, RuntimeHandle, RuntimeScheduler};
pub use slidekit_foundation::{
    DeclaredWidth, FixedWidth, Layout, LayoutError, PagesPerViewRounding, PointerSample,
    WidthProbe,
};
