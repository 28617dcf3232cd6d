//! The host side of a carousel: whatever actually draws the pages.

use slidekit_foundation::WidthProbe;

/// Instruction to put one page at a horizontal offset.
///
/// A non-zero `duration_millis` asks the surface to animate there with an
/// ease-out curve; zero means jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub offset: f32,
    pub duration_millis: u32,
}

impl Placement {
    pub fn new(page: usize, offset: f32, duration_millis: u32) -> Self {
        Self {
            page,
            offset,
            duration_millis,
        }
    }

    pub fn immediate(page: usize, offset: f32) -> Self {
        Self::new(page, offset, 0)
    }

    pub fn is_animated(&self) -> bool {
        self.duration_millis > 0
    }
}

/// What the surface can do. Read once when the carousel is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Placements with a duration are animated by the surface itself. When
    /// false the carousel tweens offsets frame by frame instead.
    pub animated_transforms: bool,
    /// The host delivers touch-like pointer streams.
    pub touch_input: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            animated_transforms: true,
            touch_input: true,
        }
    }
}

/// Rendering target driven by a [`Carousel`](crate::Carousel).
///
/// Calls arrive while the carousel holds its own state, so implementations
/// must not call back into the carousel from these methods.
pub trait Surface {
    /// Handle the host uses to refer to one page.
    type Page: Clone;

    fn viewport(&self) -> &dyn WidthProbe;

    fn page_count(&self) -> usize;

    fn page_probe(&self, index: usize) -> Option<&dyn WidthProbe>;

    fn page(&self, index: usize) -> Option<Self::Page>;

    fn place(&mut self, placement: Placement);

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// The carousel was killed; release host resources and listeners.
    fn detach(&mut self) {}
}
