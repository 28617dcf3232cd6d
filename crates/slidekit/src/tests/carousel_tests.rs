use super::*;
use std::cell::RefCell;
use std::rc::Rc;

use slidekit_core::Runtime;
use slidekit_foundation::{FixedWidth, WidthProbe};

struct Strip {
    viewport: FixedWidth,
    pages: Vec<FixedWidth>,
    placed: Rc<RefCell<Vec<Placement>>>,
}

impl Strip {
    fn new(viewport: f32, page: f32, count: usize) -> (Self, Rc<RefCell<Vec<Placement>>>) {
        let placed = Rc::new(RefCell::new(Vec::new()));
        let strip = Self {
            viewport: FixedWidth(viewport),
            pages: vec![FixedWidth(page); count],
            placed: Rc::clone(&placed),
        };
        (strip, placed)
    }
}

impl Surface for Strip {
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
        self.placed.borrow_mut().push(placement);
    }
}

fn record(carousel: &Carousel<Strip>) -> Rc<RefCell<Vec<CarouselEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    carousel.on_any(move |event| sink.borrow_mut().push(*event));
    events
}

#[test]
fn construction_stacks_pages_at_resting_offsets() {
    let runtime = Runtime::headless();
    let (strip, placed) = Strip::new(320.0, 320.0, 4);
    let carousel = Carousel::new(
        Some(strip),
        CarouselOptions::new().with_start_slide(1),
        runtime.handle(),
    );

    assert_eq!(carousel.current_slide(), 1);
    assert_eq!(carousel.rendered_offsets(), vec![-320.0, 0.0, 320.0, 640.0]);
    assert!(placed.borrow().iter().all(|placement| !placement.is_animated()));
}

#[test]
fn start_slide_out_of_range_is_clamped() {
    let runtime = Runtime::headless();
    let (strip, _) = Strip::new(320.0, 320.0, 3);
    let carousel = Carousel::new(
        Some(strip),
        CarouselOptions::new().with_start_slide(9),
        runtime.handle(),
    );
    assert_eq!(carousel.current_slide(), 2);
}

#[test]
fn to_publishes_move_then_settles_on_timer() {
    let runtime = Runtime::headless();
    let (strip, _) = Strip::new(320.0, 320.0, 5);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());
    let events = record(&carousel);

    carousel.to(3, None);
    assert_eq!(
        events.borrow().as_slice(),
        &[CarouselEvent::Move {
            index: 3,
            previous: 0
        }]
    );
    assert!(carousel.is_transitioning());

    runtime.advance_timers(300);
    assert!(!carousel.is_transitioning());
    assert_eq!(
        events.borrow().last(),
        Some(&CarouselEvent::AnimationEnd { index: 3 })
    );
}

#[test]
fn zero_speed_settles_synchronously() {
    let runtime = Runtime::headless();
    let (strip, placed) = Strip::new(320.0, 320.0, 5);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());
    let events = record(&carousel);
    placed.borrow_mut().clear();

    carousel.to(2, Some(0));
    assert_eq!(
        events.borrow().as_slice(),
        &[
            CarouselEvent::Move {
                index: 2,
                previous: 0
            },
            CarouselEvent::AnimationEnd { index: 2 },
        ]
    );
    assert!(placed.borrow().iter().all(|placement| !placement.is_animated()));
    assert!(!runtime.has_timers());
}

#[test]
fn only_passing_pages_animate() {
    let runtime = Runtime::headless();
    let (strip, placed) = Strip::new(320.0, 320.0, 6);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());
    placed.borrow_mut().clear();

    carousel.next();
    let animated: Vec<usize> = placed
        .borrow()
        .iter()
        .filter(|placement| placement.is_animated())
        .map(|placement| placement.page)
        .collect();
    assert_eq!(animated, vec![0, 1, 2]);
}

#[test]
fn next_and_prev_stop_at_the_edges() {
    let runtime = Runtime::headless();
    let (strip, _) = Strip::new(320.0, 320.0, 3);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());
    let events = record(&carousel);

    carousel.prev();
    assert_eq!(carousel.current_slide(), 0);
    assert_eq!(events.borrow().as_slice(), &[CarouselEvent::Prev]);

    carousel.to(2, Some(0));
    events.borrow_mut().clear();
    carousel.next();
    assert_eq!(carousel.current_slide(), 2);
    assert_eq!(events.borrow().as_slice(), &[CarouselEvent::Next]);
}

#[test]
fn listeners_may_navigate_from_inside_a_notification() {
    let runtime = Runtime::headless();
    let (strip, _) = Strip::new(320.0, 320.0, 5);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());
    let events = record(&carousel);

    let chained = carousel.clone();
    carousel.on(EventKind::Next, move |_| {
        if chained.current_slide() == 1 {
            chained.to(4, Some(0));
        }
    });

    carousel.next();
    assert_eq!(carousel.current_slide(), 4);
    assert_eq!(
        events.borrow().as_slice(),
        &[
            CarouselEvent::Next,
            CarouselEvent::Move {
                index: 1,
                previous: 0
            },
            CarouselEvent::Move {
                index: 4,
                previous: 1
            },
            CarouselEvent::AnimationEnd { index: 4 },
        ]
    );
}

#[test]
fn listener_removed_mid_dispatch_is_skipped() {
    let runtime = Runtime::headless();
    let (strip, _) = Strip::new(320.0, 320.0, 5);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());
    let calls = Rc::new(RefCell::new(Vec::new()));

    let victim_id = Rc::new(RefCell::new(None));
    let remover = carousel.clone();
    let target = Rc::clone(&victim_id);
    let first = Rc::clone(&calls);
    carousel.on(EventKind::Next, move |_| {
        first.borrow_mut().push("first");
        if let Some(id) = target.borrow_mut().take() {
            remover.off(id);
        }
    });
    let second = Rc::clone(&calls);
    let id = carousel.on(EventKind::Next, move |_| second.borrow_mut().push("second"));
    *victim_id.borrow_mut() = Some(id);

    carousel.next();
    assert_eq!(calls.borrow().as_slice(), &["first"]);
}

#[test]
fn inert_without_pages() {
    let runtime = Runtime::headless();
    let (strip, placed) = Strip::new(320.0, 320.0, 0);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());

    assert!(carousel.is_inert());
    carousel.next();
    carousel.to(3, None);
    assert_eq!(carousel.current_slide(), 0);
    assert_eq!(carousel.slide_count(), 0);
    assert_eq!(carousel.on_any(|_| {}), ListenerId::DETACHED);
    assert!(placed.borrow().is_empty());
    assert!(!runtime.has_pending_work());
}

#[test]
fn kill_resets_pages_and_silences_everything() {
    let runtime = Runtime::headless();
    let (strip, placed) = Strip::new(320.0, 320.0, 3);
    let carousel = Carousel::new(
        Some(strip),
        CarouselOptions::new().with_auto_advance(1_000),
        runtime.handle(),
    );
    let events = record(&carousel);
    carousel.next();
    placed.borrow_mut().clear();

    carousel.kill();
    assert!(carousel.is_killed());
    assert_eq!(
        placed.borrow().as_slice(),
        &[
            Placement::immediate(0, 0.0),
            Placement::immediate(1, 0.0),
            Placement::immediate(2, 0.0),
        ]
    );
    assert!(!runtime.has_pending_work());

    let before = events.borrow().len();
    carousel.next();
    carousel.kill();
    runtime.advance_timers(10_000);
    assert_eq!(events.borrow().len(), before);
    assert_eq!(placed.borrow().len(), 3);
}

#[test]
fn disable_gates_gestures_but_not_commands() {
    let runtime = Runtime::headless();
    let (strip, _) = Strip::new(320.0, 320.0, 3);
    let carousel = Carousel::new(Some(strip), CarouselOptions::new(), runtime.handle());

    carousel.disable();
    assert!(!carousel.is_enabled());
    let response = carousel.pointer_down(PointerSample::new(100.0, 10.0, 0));
    assert!(!response.handled);

    carousel.next();
    assert_eq!(carousel.current_slide(), 1);
    carousel.enable();
    assert!(carousel.pointer_down(PointerSample::new(100.0, 10.0, 0)).handled);
}

#[test]
fn multi_contact_press_leaves_the_transition_running() {
    let runtime = Runtime::headless();
    let (strip, _) = Strip::new(320.0, 320.0, 5);
    let carousel = Carousel::new(
        Some(strip),
        CarouselOptions::new().with_auto_advance(1_000),
        runtime.handle(),
    );
    let events = record(&carousel);
    carousel.to(2, None);
    runtime.advance_timers(100);

    let response =
        carousel.pointer_down(PointerSample::new(10.0, 10.0, 100).with_contacts(2));
    assert!(!response.handled);
    assert!(carousel.is_transitioning());

    // Settles at 300 and re-arms auto-advance for 1_300.
    runtime.advance_timers(1_300);
    assert_eq!(
        events.borrow().as_slice(),
        &[
            CarouselEvent::Move {
                index: 2,
                previous: 0
            },
            CarouselEvent::AnimationEnd { index: 2 },
            CarouselEvent::Move {
                index: 3,
                previous: 2
            },
            CarouselEvent::AutoAdvance,
        ]
    );
}
