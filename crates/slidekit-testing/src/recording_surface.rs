//! A [`Surface`] that draws nothing and remembers every placement.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slidekit::{Capabilities, Placement, Surface};
use slidekit_foundation::{FixedWidth, WidthProbe};

/// Shared, resizable viewport width. Tests keep a handle to simulate window
/// resizes while the carousel owns the surface.
#[derive(Clone, Debug)]
pub struct ViewportHandle {
    width: Rc<Cell<f32>>,
}

impl ViewportHandle {
    fn new(width: f32) -> Self {
        Self {
            width: Rc::new(Cell::new(width)),
        }
    }

    pub fn width(&self) -> f32 {
        self.width.get()
    }

    pub fn set_width(&self, width: f32) {
        self.width.set(width);
    }
}

impl WidthProbe for ViewportHandle {
    fn rendered_width(&self) -> f32 {
        self.width.get()
    }
}

/// Shared log of placements sent to a [`RecordingSurface`].
#[derive(Clone, Debug, Default)]
pub struct PlacementLog {
    entries: Rc<RefCell<Vec<Placement>>>,
}

impl PlacementLog {
    pub fn all(&self) -> Vec<Placement> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Most recent placement of `page`.
    pub fn last_for(&self, page: usize) -> Option<Placement> {
        self.entries
            .borrow()
            .iter()
            .rev()
            .find(|placement| placement.page == page)
            .copied()
    }

    /// Placements that asked the surface to animate.
    pub fn animated(&self) -> Vec<Placement> {
        self.entries
            .borrow()
            .iter()
            .filter(|placement| placement.is_animated())
            .copied()
            .collect()
    }

    /// Pages that received an animated placement, in order, without repeats.
    pub fn animated_pages(&self) -> Vec<usize> {
        let mut pages = Vec::new();
        for placement in self.animated() {
            if !pages.contains(&placement.page) {
                pages.push(placement.page);
            }
        }
        pages
    }

    fn push(&self, placement: Placement) {
        self.entries.borrow_mut().push(placement);
    }
}

/// Headless surface with fixed-width pages.
pub struct RecordingSurface {
    viewport: ViewportHandle,
    pages: Vec<FixedWidth>,
    capabilities: Capabilities,
    log: PlacementLog,
    detached: Rc<Cell<bool>>,
}

impl RecordingSurface {
    pub fn new(viewport_width: f32, page_width: f32, page_count: usize) -> Self {
        Self {
            viewport: ViewportHandle::new(viewport_width),
            pages: vec![FixedWidth(page_width); page_count],
            capabilities: Capabilities::default(),
            log: PlacementLog::default(),
            detached: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Surface that cannot animate placements itself.
    pub fn without_animated_transforms(self) -> Self {
        let capabilities = Capabilities {
            animated_transforms: false,
            ..self.capabilities
        };
        self.with_capabilities(capabilities)
    }

    pub fn placements(&self) -> PlacementLog {
        self.log.clone()
    }

    pub fn viewport_handle(&self) -> ViewportHandle {
        self.viewport.clone()
    }

    /// Flag set once the carousel detaches from this surface.
    pub fn detached_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.detached)
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }
}

impl Surface for RecordingSurface {
    type Page = usize;

    fn viewport(&self) -> &dyn WidthProbe {
        &self.viewport
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_probe(&self, index: usize) -> Option<&dyn WidthProbe> {
        self.pages.get(index).map(|page| page as &dyn WidthProbe)
    }

    fn page(&self, index: usize) -> Option<usize> {
        (index < self.pages.len()).then_some(index)
    }

    fn place(&mut self, placement: Placement) {
        self.log.push(placement);
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn detach(&mut self) {
        self.detached.set(true);
    }
}
