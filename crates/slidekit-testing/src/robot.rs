use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slidekit::{Carousel, CarouselEvent, CarouselOptions, PointerResponse};
use slidekit_core::Runtime;
use slidekit_foundation::PointerSample;

use crate::recording_surface::{PlacementLog, RecordingSurface, ViewportHandle};

/// Frame interval the robot pumps at.
pub const FRAME_MILLIS: u64 = 16;

/// Headless harness that owns a runtime and a carousel over a
/// [`RecordingSurface`], and drives both on a virtual clock.
///
/// Pointer samples are stamped with the robot's clock, so gestures, frames
/// and timers share one timeline. Every published event is recorded.
pub struct CarouselRobot {
    runtime: Runtime,
    carousel: Carousel<RecordingSurface>,
    placements: PlacementLog,
    viewport: ViewportHandle,
    detached: Rc<Cell<bool>>,
    events: Rc<RefCell<Vec<CarouselEvent>>>,
    now: u64,
    pointer: Option<(f32, f32)>,
}

impl CarouselRobot {
    pub fn launch(surface: RecordingSurface, options: CarouselOptions) -> Self {
        let runtime = Runtime::headless();
        let placements = surface.placements();
        let viewport = surface.viewport_handle();
        let detached = surface.detached_flag();
        let carousel = Carousel::new(Some(surface), options, runtime.handle());

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        carousel.on_any(move |event| sink.borrow_mut().push(*event));

        Self {
            runtime,
            carousel,
            placements,
            viewport,
            detached,
            events,
            now: 0,
            pointer: None,
        }
    }

    /// Evenly sized pages, one per view, with default options.
    pub fn with_pages(page_count: usize) -> Self {
        Self::launch(
            RecordingSurface::new(320.0, 320.0, page_count),
            CarouselOptions::default(),
        )
    }

    pub fn carousel(&self) -> &Carousel<RecordingSurface> {
        &self.carousel
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn placements(&self) -> &PlacementLog {
        &self.placements
    }

    pub fn viewport(&self) -> &ViewportHandle {
        &self.viewport
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn index(&self) -> usize {
        self.carousel.current_slide()
    }

    pub fn events(&self) -> Vec<CarouselEvent> {
        self.events.borrow().clone()
    }

    /// Returns and forgets the recorded events.
    pub fn take_events(&self) -> Vec<CarouselEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn count_events(&self, matches: impl Fn(&CarouselEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| matches(event)).count()
    }

    // Time

    /// Advances the clock by `millis`, pumping timers, frames and deferred
    /// tasks every [`FRAME_MILLIS`].
    pub fn advance_by(&mut self, millis: u64) {
        let target = self.now + millis;
        while self.now < target {
            self.now = (self.now + FRAME_MILLIS).min(target);
            self.runtime.pump(self.now);
        }
    }

    /// Pumps frames until the runtime has no frame work left. Returns the
    /// number of frames pumped, or `None` if `max_frames` ran out first.
    pub fn run_frames_until_idle(&mut self, max_frames: usize) -> Option<usize> {
        for frame in 0..max_frames {
            if !self.runtime.has_frame_callbacks() {
                return Some(frame);
            }
            self.advance_by(FRAME_MILLIS);
        }
        (!self.runtime.has_frame_callbacks()).then_some(max_frames)
    }

    /// Pumps until no frame callbacks remain and every pending timer that
    /// would fire within `horizon_millis` has fired.
    pub fn settle(&mut self, horizon_millis: u64) {
        let deadline = self.now + horizon_millis;
        while self.now < deadline {
            let timer_due = self
                .runtime
                .next_timer_due()
                .is_some_and(|due| due <= deadline);
            if !self.runtime.has_frame_callbacks() && !timer_due {
                break;
            }
            self.advance_by(FRAME_MILLIS);
        }
    }

    // Gestures

    pub fn press(&mut self, x: f32, y: f32) -> PointerResponse {
        self.pointer = Some((x, y));
        self.carousel
            .pointer_down(PointerSample::new(x, y, self.now))
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> PointerResponse {
        self.pointer = Some((x, y));
        self.carousel
            .pointer_move(PointerSample::new(x, y, self.now))
    }

    pub fn release(&mut self) -> PointerResponse {
        self.pointer = None;
        self.carousel.pointer_up(self.now)
    }

    /// Presses at `(x, y)`, moves horizontally by `delta_x` in `steps` equal
    /// moves spread over `duration_millis`, then releases.
    pub fn swipe(
        &mut self,
        x: f32,
        y: f32,
        delta_x: f32,
        duration_millis: u64,
        steps: u32,
    ) -> PointerResponse {
        self.drag(x, y, delta_x, duration_millis, steps);
        self.release()
    }

    /// Like [`CarouselRobot::swipe`] but keeps the pointer down.
    pub fn drag(&mut self, x: f32, y: f32, delta_x: f32, duration_millis: u64, steps: u32) {
        let steps = steps.max(1);
        self.press(x, y);
        let interval = duration_millis / u64::from(steps);
        let mut elapsed = 0;
        for step in 1..=steps {
            let next = if step == steps {
                duration_millis
            } else {
                interval * u64::from(step)
            };
            self.advance_by(next - elapsed);
            elapsed = next;
            let progress = step as f32 / steps as f32;
            self.move_to(x + delta_x * progress, y);
        }
        log::trace!("dragged {delta_x}px over {duration_millis}ms");
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }
}
