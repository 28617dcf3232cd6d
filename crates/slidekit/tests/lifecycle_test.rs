//! Construction, resizing, teardown, tweened surfaces and listeners.

use std::cell::RefCell;
use std::rc::Rc;

use slidekit::{
    Carousel, CarouselEvent, CarouselOptions, EventKind, ListenerId, PointerSample, Runtime,
};
use slidekit_testing::prelude::*;
use slidekit_testing::robot_assertions::{assert_approx_eq, assert_offsets_approx_eq};

#[test]
fn carousel_without_a_surface_is_inert() {
    let runtime = Runtime::headless();
    let carousel: Carousel<RecordingSurface> =
        Carousel::new(None, CarouselOptions::new().with_auto_advance(100), runtime.handle());

    assert!(carousel.is_inert());
    carousel.next();
    carousel.to(2, None);
    carousel.stop();
    carousel.kill();
    assert!(!carousel.check_size_change());
    assert_eq!(carousel.current_slide(), 0);
    assert_eq!(carousel.slide_count(), 0);
    assert_eq!(carousel.slide_element(0), None);
    assert_eq!(carousel.layout(), None);
    assert!(!carousel.pointer_down(PointerSample::new(0.0, 0.0, 0)).handled);
    assert_eq!(carousel.on(EventKind::Move, |_| {}), ListenerId::DETACHED);
    assert!(!carousel.off(ListenerId::DETACHED));
    assert!(!runtime.has_pending_work());
}

#[test]
fn queries_describe_the_layout() {
    let robot = CarouselRobot::launch(
        RecordingSurface::new(960.0, 320.0, 8),
        CarouselOptions::new().with_start_slide(3),
    );
    let carousel = robot.carousel();
    assert_eq!(carousel.current_slide(), 3);
    assert_eq!(carousel.slide_count(), 8);
    assert_eq!(carousel.slides_per_page(), 3);
    assert_eq!(carousel.position_count(), 6);
    assert_eq!(carousel.slide_element(7), Some(7));
    assert_eq!(carousel.slide_element(8), None);
    let layout = carousel.layout().expect("live carousel has a layout");
    assert_eq!(layout.max_index(), 5);
    assert_eq!(
        carousel.options().map(|options| options.start_slide),
        Some(3)
    );
}

#[test]
fn size_change_remeasures_and_restacks() {
    let robot = CarouselRobot::launch(
        RecordingSurface::new(960.0, 320.0, 7),
        CarouselOptions::new().with_start_slide(4),
    );
    assert!(!robot.carousel().check_size_change());

    robot.viewport().set_width(640.0);
    assert!(robot.carousel().check_size_change());
    assert_eq!(robot.carousel().slides_per_page(), 2);
    assert_eq!(robot.index(), 4);
    assert_offsets_approx_eq(
        &robot.carousel().rendered_offsets(),
        &[-1280.0, -960.0, -640.0, -320.0, 0.0, 320.0, 640.0],
        0.001,
        "offsets after shrinking",
    );
    assert_eq!(robot.take_events(), vec![CarouselEvent::SizeChange]);

    robot.viewport().set_width(1600.0);
    assert!(robot.carousel().check_size_change());
    assert_eq!(robot.carousel().slides_per_page(), 5);
    assert_eq!(robot.index(), 2, "index clamps into the smaller range");
    assert!(robot
        .placements()
        .all()
        .iter()
        .rev()
        .take(7)
        .all(|placement| !placement.is_animated()));
}

#[test]
fn size_change_finishes_a_running_transition() {
    let mut robot = CarouselRobot::launch(
        RecordingSurface::new(320.0, 320.0, 5),
        CarouselOptions::default(),
    );
    robot.carousel().next();
    robot.advance_by(100);
    robot.viewport().set_width(640.0);
    assert!(robot.carousel().check_size_change());

    assert!(!robot.carousel().is_transitioning());
    assert_eq!(
        robot.take_events(),
        vec![
            CarouselEvent::Next,
            CarouselEvent::Move {
                index: 1,
                previous: 0
            },
            CarouselEvent::AnimationEnd { index: 1 },
            CarouselEvent::SizeChange,
        ]
    );
    robot.advance_by(1_000);
    assert!(robot.events().is_empty());
}

#[test]
fn hidden_viewport_falls_back_to_one_page_per_view() {
    let robot = CarouselRobot::launch(
        RecordingSurface::new(0.0, 320.0, 4),
        CarouselOptions::default(),
    );
    assert_eq!(robot.carousel().slides_per_page(), 1);
    robot.carousel().next();
    assert_eq!(robot.index(), 1);
}

#[test]
fn kill_resets_offsets_and_detaches() {
    let mut robot = CarouselRobot::launch(
        RecordingSurface::new(320.0, 320.0, 4),
        CarouselOptions::new()
            .with_start_slide(2)
            .with_auto_advance(500),
    );
    robot.carousel().kill();

    assert!(robot.is_detached());
    assert!(robot.carousel().is_killed());
    assert_offsets_approx_eq(
        &robot
            .placements()
            .all()
            .iter()
            .rev()
            .take(4)
            .map(|placement| placement.offset)
            .collect::<Vec<_>>(),
        &[0.0; 4],
        0.0,
        "offsets after kill",
    );
    assert!(!robot.runtime().has_pending_work());

    let placed = robot.placements().len();
    robot.carousel().next();
    robot.carousel().setup();
    robot.viewport().set_width(900.0);
    assert!(!robot.carousel().check_size_change());
    assert_eq!(
        robot.carousel().on_any(|_| {}),
        ListenerId::DETACHED
    );
    robot.advance_by(2_000);
    assert_eq!(robot.placements().len(), placed);
    assert!(robot.events().is_empty());
}

#[test]
fn tweened_surface_gets_only_immediate_placements() {
    let mut robot = CarouselRobot::launch(
        RecordingSurface::new(320.0, 320.0, 4).without_animated_transforms(),
        CarouselOptions::default(),
    );
    robot.carousel().next();
    assert!(robot.runtime().has_frame_callbacks());

    robot.advance_by(160);
    let midway = robot.carousel().rendered_offsets()[1];
    assert!(midway > 0.0 && midway < 320.0, "page 1 midway at {midway}");

    robot.advance_by(200);
    assert!(robot.placements().animated().is_empty());
    assert_approx_eq(
        robot.placements().last_for(0).map_or(f32::NAN, |p| p.offset),
        -320.0,
        0.001,
        "page 0 after the tween",
    );
    assert_approx_eq(
        robot.placements().last_for(1).map_or(f32::NAN, |p| p.offset),
        0.0,
        0.001,
        "page 1 after the tween",
    );
    assert_eq!(
        robot.events().last(),
        Some(&CarouselEvent::AnimationEnd { index: 1 })
    );
    assert!(!robot.runtime().has_pending_work());
}

#[test]
fn listeners_can_chain_navigation_from_animation_end() {
    let mut robot = CarouselRobot::launch(
        RecordingSurface::new(320.0, 320.0, 4),
        CarouselOptions::default(),
    );
    let driver = robot.carousel().clone();
    robot.carousel().on(EventKind::AnimationEnd, move |event| {
        if let CarouselEvent::AnimationEnd { index } = event {
            if *index < 3 {
                driver.next();
            }
        }
    });

    robot.carousel().next();
    robot.settle(5_000);
    assert_eq!(robot.index(), 3);
    assert_eq!(
        robot.count_events(|event| matches!(event, CarouselEvent::AnimationEnd { .. })),
        3
    );
}

#[test]
fn listeners_registered_during_dispatch_see_later_events_only() {
    let robot = CarouselRobot::launch(
        RecordingSurface::new(320.0, 320.0, 4),
        CarouselOptions::new().with_speed(0),
    );
    let late = Rc::new(RefCell::new(Vec::new()));
    let registrar = robot.carousel().clone();
    let sink = Rc::clone(&late);
    let registered = Rc::new(RefCell::new(false));
    let once = Rc::clone(&registered);
    robot.carousel().on(EventKind::Next, move |_| {
        if !once.replace(true) {
            let sink = Rc::clone(&sink);
            registrar.on_any(move |event| sink.borrow_mut().push(*event));
        }
    });

    robot.carousel().next();
    assert_eq!(
        late.borrow().as_slice(),
        &[
            CarouselEvent::Move {
                index: 1,
                previous: 0
            },
            CarouselEvent::AnimationEnd { index: 1 },
        ]
    );
}
