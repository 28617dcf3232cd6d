//! The slide controller: owns the index and turns commands, gestures and
//! timers into placements and events.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use slidekit_animation::{clamp_overshoot, snap_distance, TossConfig, TossState};
use slidekit_core::RuntimeHandle;
use slidekit_foundation::gesture_constants::CLICK_SUPPRESSION_MILLIS;
use slidekit_foundation::{
    frame_offsets, measure, overshoot, resolve_width, resting_offset, will_pass_through_viewport,
    GestureTracker, Layout, MoveOutcome, PointerSample, ReleaseContext, ReleaseKind,
};

use crate::auto_advance::AutoAdvance;
use crate::events::{CarouselEvent, EventKind, Events, ListenerId};
use crate::options::CarouselOptions;
use crate::surface::{Capabilities, Placement, Surface};
use crate::toss_animation::TossAnimation;
use crate::transition::{PageMove, PageMoves, Transition};

/// A drag within this many pixels of a page boundary counts as resting on it.
const ALIGNMENT_EPSILON: f32 = 0.5;

/// What the host should do with the pointer event it just forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    /// The carousel consumed the event.
    pub handled: bool,
    /// Cancel native scrolling for this event.
    pub suppress_native_scroll: bool,
    /// Swallow clicks for this many milliseconds.
    pub suppress_click_millis: Option<u64>,
}

impl PointerResponse {
    fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }
}

struct State<S: Surface> {
    surface: S,
    options: CarouselOptions,
    capabilities: Capabilities,
    layout: Layout,
    index: usize,
    /// Committed offset of every page; drags and tosses are relative to it.
    positions: Vec<f32>,
    /// Offset last sent to the surface for every page.
    rendered: Vec<f32>,
    drag_offset: f32,
    tracker: GestureTracker,
    enabled: bool,
    toss_config: TossConfig,
    transition: Option<Transition>,
    auto_advance: AutoAdvance,
    /// What the current press cut short, so a release that never becomes a
    /// drag can finish it.
    interrupted: Interrupted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Interrupted {
    #[default]
    Nothing,
    Toss,
    Transition,
}

impl<S: Surface> State<S> {
    fn place(&mut self, placement: Placement) {
        if let Some(rendered) = self.rendered.get_mut(placement.page) {
            *rendered = placement.offset;
        }
        self.surface.place(placement);
    }

    /// Places a page and commits the offset as its position.
    fn move_page(&mut self, page: usize, offset: f32, duration_millis: u32) {
        if let Some(position) = self.positions.get_mut(page) {
            *position = offset;
        }
        self.place(Placement::new(page, offset, duration_millis));
    }

    /// Places every page for the current drag offset.
    fn place_frame(&mut self) {
        let offsets = frame_offsets(self.drag_offset, &self.positions, &self.layout);
        log::trace!("frame at drag {}", self.drag_offset);
        for (page, offset) in offsets.into_iter().enumerate() {
            self.place(Placement::immediate(page, offset));
        }
    }

    /// Puts every page at its resting offset for the current index.
    fn restack(&mut self) {
        for page in 0..self.layout.total_pages {
            let offset = resting_offset(page, self.index, &self.layout);
            self.move_page(page, offset, 0);
        }
    }

    /// Index closest to what the current drag shows, before clamping.
    fn nearest_index(&self) -> isize {
        let index = self.index as isize;
        if self.layout.page_width > 0.0 {
            index - (self.drag_offset / self.layout.page_width).round() as isize
        } else {
            index
        }
    }

    fn release_context(&self) -> ReleaseContext {
        ReleaseContext {
            index: self.index,
            layout: self.layout,
            continuous: self.options.continuous,
            momentum_single_view: self.options.allow_momentum_toss_single_view,
        }
    }

    fn accepts_gestures(&self) -> bool {
        self.enabled && self.capabilities.touch_input
    }

    fn cancel_transition(&mut self) -> bool {
        let Some(transition) = self.transition.take() else {
            return false;
        };
        for placement in transition.cancel() {
            self.place(placement);
        }
        true
    }

    fn resize_page_buffers(&mut self) {
        let total = self.layout.total_pages;
        self.positions.resize(total, 0.0);
        self.rendered.resize(total, 0.0);
    }
}

struct Shared<S: Surface + 'static> {
    state: RefCell<State<S>>,
    toss: TossAnimation,
    events: RefCell<Events>,
    pending: RefCell<VecDeque<CarouselEvent>>,
    flushing: Cell<bool>,
    killed: Cell<bool>,
    runtime: RuntimeHandle,
}

impl<S: Surface + 'static> Shared<S> {
    /// Runs `f` against the state, then delivers whatever it published.
    fn with_state<R>(
        this: &Rc<Self>,
        f: impl FnOnce(&Rc<Self>, &mut State<S>) -> R,
    ) -> Option<R> {
        if this.killed.get() {
            return None;
        }
        let result = {
            let mut state = this.state.borrow_mut();
            f(this, &mut state)
        };
        this.flush();
        Some(result)
    }

    fn emit(&self, event: CarouselEvent) {
        self.pending.borrow_mut().push_back(event);
    }

    /// Delivers queued events in order. Events published by listeners are
    /// appended and delivered by the same loop.
    fn flush(&self) {
        if self.flushing.replace(true) {
            return;
        }
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            if self.killed.get() {
                self.pending.borrow_mut().clear();
                break;
            }
            let listeners = self.events.borrow().listeners_for(&event);
            for (id, listener) in listeners {
                if !self.events.borrow().contains(id) {
                    continue;
                }
                (&mut *listener.borrow_mut())(&event);
            }
        }
        self.flushing.set(false);
    }

    /// Navigates to `target`, animating only pages that cross the viewport.
    ///
    /// With `from_existing` the pages animate from wherever they are drawn;
    /// otherwise crossing pages first jump back to their offsets at the
    /// current index.
    fn slide_to(
        this: &Rc<Self>,
        state: &mut State<S>,
        target: isize,
        speed: u32,
        from_existing: bool,
    ) {
        let layout = state.layout;
        let previous = state.index;
        let to = layout.resolve_index(target, state.options.continuous);
        let drag = state.drag_offset;
        this.emit(CarouselEvent::Move {
            index: to,
            previous,
        });
        log::debug!("slide {previous} -> {to} over {speed}ms (target {target})");

        state.cancel_transition();

        if !from_existing {
            for page in 0..layout.total_pages {
                let origin = resting_offset(page, previous, &layout);
                if previous != to && will_pass_through_viewport(page, previous, to, drag, &layout)
                {
                    state.move_page(page, origin, 0);
                } else if let Some(position) = state.positions.get_mut(page) {
                    *position = origin;
                }
            }
        }

        let mut moves = PageMoves::new();
        for page in 0..layout.total_pages {
            let destination = resting_offset(page, to, &layout);
            if speed > 0 && will_pass_through_viewport(page, previous, to, drag, &layout) {
                moves.push(PageMove {
                    page,
                    from: state.rendered[page],
                    to: destination,
                });
                state.positions[page] = destination;
            } else {
                state.move_page(page, destination, 0);
            }
        }

        state.drag_offset = 0.0;
        state.index = to;

        if moves.is_empty() {
            Self::settle(this, state);
            return;
        }

        if state.capabilities.animated_transforms {
            for page_move in &moves {
                state.place(Placement::new(page_move.page, page_move.to, speed));
            }
            let weak = Rc::downgrade(this);
            state.transition = Some(Transition::timer(&this.runtime, speed, move || {
                if let Some(shared) = weak.upgrade() {
                    Self::on_transition_end(&shared);
                }
            }));
        } else {
            let weak_frame = Rc::downgrade(this);
            let weak_end = Rc::downgrade(this);
            state.transition = Some(Transition::tween(
                this.runtime.frame_clock(),
                speed,
                moves,
                move |placements| {
                    if let Some(shared) = weak_frame.upgrade() {
                        Self::with_state(&shared, |_, state| {
                            for placement in placements {
                                state.place(*placement);
                            }
                        });
                    }
                },
                move || {
                    if let Some(shared) = weak_end.upgrade() {
                        Self::on_transition_end(&shared);
                    }
                },
            ));
        }
    }

    fn on_transition_end(this: &Rc<Self>) {
        Self::with_state(this, |this, state| {
            state.transition = None;
            Self::settle(this, state);
        });
    }

    /// Pages are at rest: publish it and re-arm auto-advance.
    fn settle(this: &Rc<Self>, state: &mut State<S>) {
        this.emit(CarouselEvent::AnimationEnd { index: state.index });
        Self::arm_auto_advance(this, state);
    }

    fn arm_auto_advance(this: &Rc<Self>, state: &mut State<S>) {
        let weak = Rc::downgrade(this);
        state.auto_advance.arm(&this.runtime, move || {
            if let Some(shared) = weak.upgrade() {
                Self::with_state(&shared, |this, state| {
                    state.auto_advance.fired();
                    log::debug!("auto-advance from {}", state.index);
                    Self::step_forward(this, state, 1, false);
                    this.emit(CarouselEvent::AutoAdvance);
                });
            }
        });
    }

    /// Pauses auto-advance, or stops it for good when configured to.
    fn auto_stop(state: &mut State<S>) {
        if state.options.auto_stop_on_interaction {
            state.auto_advance.stop();
        } else {
            state.auto_advance.pause();
        }
    }

    /// Auto-stops and cancels any toss. Returns whether pages were left
    /// mid-flight by a cancelled toss.
    fn interrupt(this: &Rc<Self>, state: &mut State<S>) -> bool {
        Self::auto_stop(state);
        Self::commit_toss(this, state)
    }

    /// Moves forward by `count`, wrapping to 0 from the last index in
    /// continuous mode.
    fn step_forward(this: &Rc<Self>, state: &mut State<S>, count: usize, from_existing: bool) {
        let speed = state.options.speed;
        if state.index < state.layout.max_index() {
            let target = (state.index + count) as isize;
            Self::slide_to(this, state, target, speed, from_existing);
        } else if state.options.continuous {
            Self::slide_to(this, state, 0, speed, from_existing);
        }
    }

    /// Moves back by `count`, wrapping to the last index from 0 in
    /// continuous mode.
    fn step_back(this: &Rc<Self>, state: &mut State<S>, count: usize, from_existing: bool) {
        let speed = state.options.speed;
        if state.index > 0 {
            let target = state.index as isize - count as isize;
            Self::slide_to(this, state, target, speed, from_existing);
        } else if state.options.continuous {
            let target = state.layout.max_index() as isize;
            Self::slide_to(this, state, target, speed, from_existing);
        }
    }

    /// Stops a running toss and commits its drag so the index matches what
    /// is drawn.
    fn commit_toss(this: &Rc<Self>, state: &mut State<S>) -> bool {
        if !this.toss.is_running() {
            return false;
        }
        this.toss.cancel();
        Self::commit_drag(this, state);
        true
    }

    /// Folds the drag offset into the positions and moves the index to the
    /// nearest page.
    fn commit_drag(this: &Rc<Self>, state: &mut State<S>) {
        let drag = state.drag_offset;
        let nearest = state.layout.clamp_index(state.nearest_index());
        for position in &mut state.positions {
            *position += drag;
        }
        state.drag_offset = 0.0;
        let previous = state.index;
        if nearest != previous {
            this.emit(CarouselEvent::Move {
                index: nearest,
                previous,
            });
            state.index = nearest;
        }
        log::debug!("committed drag of {drag}px at index {nearest}");
    }

    fn start_toss(this: &Rc<Self>, state: &mut State<S>, velocity: f32, time_millis: u64) {
        let config = state.toss_config;
        let drag = state.drag_offset;
        let snap = state.options.snap_to_nearest;
        let Some(velocity) = config.normalize_velocity(velocity, drag, snap) else {
            log::debug!("release at {velocity} px/ms too slow to toss");
            Self::settle_after_toss(this, state);
            return;
        };

        let mut total = config.project_distance(velocity);
        if total == 0.0 {
            Self::commit_drag(this, state);
            Self::settle(this, state);
            return;
        }
        if snap {
            total = snap_distance(total, drag, state.layout.page_width);
        }
        let at_rest = overshoot(total + drag, &state.positions, &state.layout);
        let total = clamp_overshoot(total, at_rest, state.layout.viewport_width);

        let weak_step = Rc::downgrade(this);
        let weak_end = Rc::downgrade(this);
        this.toss.start(
            TossState::new(velocity, total, time_millis),
            config,
            move |step| {
                if let Some(shared) = weak_step.upgrade() {
                    Self::with_state(&shared, |_, state| {
                        state.drag_offset += step;
                        state.place_frame();
                    });
                }
            },
            move || {
                if let Some(shared) = weak_end.upgrade() {
                    Self::with_state(&shared, Self::settle_after_toss);
                }
            },
        );
    }

    /// Brings a finished or aborted toss to rest on the nearest index.
    fn settle_after_toss(this: &Rc<Self>, state: &mut State<S>) {
        let layout = state.layout;
        let nearest = state.nearest_index();
        let resolved = layout.resolve_index(nearest, state.options.continuous);
        let aligned_drag = (state.index as isize - nearest) as f32 * layout.page_width;
        let aligned = resolved as isize == nearest
            && (state.drag_offset - aligned_drag).abs() < ALIGNMENT_EPSILON;

        if aligned {
            let previous = state.index;
            if resolved != previous {
                this.emit(CarouselEvent::Move {
                    index: resolved,
                    previous,
                });
            }
            state.index = resolved;
            state.drag_offset = 0.0;
            state.restack();
            Self::settle(this, state);
        } else {
            let speed = state.options.half_speed();
            Self::slide_to(this, state, nearest, speed, true);
        }
    }

    fn remeasure(this: &Rc<Self>, state: &mut State<S>) {
        let was_tossing = this.toss.is_running();
        let was_transitioning = state.cancel_transition();
        this.toss.cancel();
        state.drag_offset = 0.0;

        let total = state.surface.page_count();
        state.layout = measure(
            state.surface.viewport(),
            state.surface.page_probe(0),
            total,
            state.options.rounding,
        );
        state.resize_page_buffers();
        state.index = state.layout.clamp_index(state.index as isize);
        state.restack();

        if was_tossing || was_transitioning {
            Self::settle(this, state);
        }
    }
}

impl<S: Surface + 'static> Drop for Shared<S> {
    fn drop(&mut self) {
        self.toss.cancel();
    }
}

/// A paged carousel driven by commands, gestures and auto-advance.
///
/// Cloning yields another handle to the same carousel. Events are delivered
/// synchronously before the triggering call returns; listeners may call back
/// into the carousel.
pub struct Carousel<S: Surface + 'static> {
    shared: Option<Rc<Shared<S>>>,
}

impl<S: Surface + 'static> Clone for Carousel<S> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<S: Surface + 'static> Carousel<S> {
    /// Builds a carousel over `surface`. Without a surface, or with one that
    /// has no pages, the carousel is inert: every call is a no-op.
    pub fn new(surface: Option<S>, options: CarouselOptions, runtime: RuntimeHandle) -> Self {
        let Some(surface) = surface else {
            log::debug!("no surface; carousel is inert");
            return Self::inert();
        };
        let total = surface.page_count();
        if total == 0 {
            log::debug!("surface has no pages; carousel is inert");
            return Self::inert();
        }

        let capabilities = surface.capabilities();
        let layout = measure(
            surface.viewport(),
            surface.page_probe(0),
            total,
            options.rounding,
        );
        let index = layout.resolve_index(options.start_slide, options.continuous);
        let state = State {
            tracker: GestureTracker::new(options.disable_native_scroll),
            auto_advance: AutoAdvance::new(options.auto_advance_delay),
            surface,
            capabilities,
            layout,
            index,
            positions: vec![0.0; total],
            rendered: vec![0.0; total],
            drag_offset: 0.0,
            enabled: true,
            toss_config: TossConfig::default(),
            transition: None,
            interrupted: Interrupted::Nothing,
            options,
        };
        let shared = Rc::new(Shared {
            state: RefCell::new(state),
            toss: TossAnimation::new(runtime.clone()),
            events: RefCell::new(Events::new()),
            pending: RefCell::new(VecDeque::new()),
            flushing: Cell::new(false),
            killed: Cell::new(false),
            runtime,
        });
        Shared::with_state(&shared, |this, state| {
            state.restack();
            Shared::arm_auto_advance(this, state);
        });
        Self {
            shared: Some(shared),
        }
    }

    pub fn inert() -> Self {
        Self { shared: None }
    }

    pub fn is_inert(&self) -> bool {
        self.shared.is_none()
    }

    fn command<R>(&self, f: impl FnOnce(&Rc<Shared<S>>, &mut State<S>) -> R) -> Option<R> {
        let shared = self.shared.as_ref()?;
        Shared::with_state(shared, f)
    }

    fn query<R: Default>(&self, f: impl FnOnce(&State<S>) -> R) -> R {
        match &self.shared {
            Some(shared) if !shared.killed.get() => f(&shared.state.borrow()),
            _ => R::default(),
        }
    }

    // Commands

    /// Slides to `target`, clamped or wrapped into range. `speed` defaults
    /// to the configured speed.
    pub fn to(&self, target: isize, speed: Option<u32>) {
        self.command(|this, state| {
            let from_existing = Shared::interrupt(this, state);
            let speed = speed.unwrap_or(state.options.speed);
            Shared::slide_to(this, state, target, speed, from_existing);
        });
    }

    /// Alias of [`Carousel::to`].
    pub fn slide(&self, target: isize, speed: Option<u32>) {
        self.to(target, speed);
    }

    pub fn next(&self) {
        self.command(|this, state| {
            let from_existing = Shared::interrupt(this, state);
            this.emit(CarouselEvent::Next);
            Shared::step_forward(this, state, 1, from_existing);
        });
    }

    pub fn prev(&self) {
        self.command(|this, state| {
            let from_existing = Shared::interrupt(this, state);
            this.emit(CarouselEvent::Prev);
            Shared::step_back(this, state, 1, from_existing);
        });
    }

    pub fn next_page(&self) {
        self.command(|this, state| {
            let from_existing = Shared::interrupt(this, state);
            this.emit(CarouselEvent::NextPage);
            let per_view = state.layout.pages_per_view;
            Shared::step_forward(this, state, per_view, from_existing);
        });
    }

    pub fn prev_page(&self) {
        self.command(|this, state| {
            let from_existing = Shared::interrupt(this, state);
            this.emit(CarouselEvent::PrevPage);
            let per_view = state.layout.pages_per_view;
            Shared::step_back(this, state, per_view, from_existing);
        });
    }

    /// Cancels any toss and turns auto-advance off for good.
    pub fn stop(&self) {
        self.command(|this, state| {
            Shared::commit_toss(this, state);
            state.auto_advance.stop();
        });
    }

    pub fn enable(&self) {
        self.command(|_, state| state.enabled = true);
    }

    /// Ignores gesture input until [`Carousel::enable`]. Programmatic
    /// navigation keeps working. A drag in progress is dropped.
    pub fn disable(&self) {
        self.command(|_, state| {
            state.enabled = false;
            if state.tracker.is_tracking() {
                state.tracker.cancel();
                if state.drag_offset != 0.0 {
                    state.drag_offset = 0.0;
                    state.place_frame();
                }
            }
        });
    }

    /// Tears the carousel down: cancels all scheduled work, resets every
    /// page to offset 0, detaches the surface and drops all listeners.
    pub fn kill(&self) {
        let Some(shared) = self.shared.as_ref() else {
            return;
        };
        Shared::with_state(shared, |this, state| {
            this.toss.cancel();
            state.cancel_transition();
            state.auto_advance.stop();
            state.tracker.cancel();
            state.drag_offset = 0.0;
            for page in 0..state.layout.total_pages {
                state.place(Placement::immediate(page, 0.0));
            }
            state.surface.detach();
            this.killed.set(true);
            this.pending.borrow_mut().clear();
            this.events.borrow_mut().clear();
            log::debug!("carousel killed");
        });
    }

    /// Re-measures and re-stacks unconditionally.
    pub fn setup(&self) {
        self.command(Shared::remeasure);
    }

    /// Re-measures when the viewport width changed since the last
    /// measurement, publishing [`CarouselEvent::SizeChange`]. Returns whether
    /// it did.
    pub fn check_size_change(&self) -> bool {
        self.command(|this, state| {
            let width = resolve_width(state.surface.viewport()).unwrap_or(0.0);
            if width == state.layout.viewport_width {
                return false;
            }
            log::debug!(
                "viewport width changed {} -> {width}",
                state.layout.viewport_width
            );
            Shared::remeasure(this, state);
            this.emit(CarouselEvent::SizeChange);
            true
        })
        .unwrap_or(false)
    }

    // Input

    pub fn pointer_down(&self, sample: PointerSample) -> PointerResponse {
        self.command(|this, state| {
            if !state.accepts_gestures() || sample.is_multi_contact() {
                return PointerResponse::default();
            }
            state.auto_advance.pause();
            state.interrupted = if Shared::commit_toss(this, state) {
                Interrupted::Toss
            } else if state.cancel_transition() {
                Interrupted::Transition
            } else {
                Interrupted::Nothing
            };
            if state.tracker.on_start(sample) {
                PointerResponse::handled()
            } else {
                PointerResponse::default()
            }
        })
        .unwrap_or_default()
    }

    pub fn pointer_move(&self, sample: PointerSample) -> PointerResponse {
        self.command(|_, state| {
            if !state.accepts_gestures() {
                return PointerResponse::default();
            }
            let outcome = state.tracker.on_move(sample);
            let response = PointerResponse {
                handled: matches!(outcome, MoveOutcome::Drag { .. }),
                suppress_native_scroll: outcome.suppresses_native_scroll(),
                suppress_click_millis: None,
            };
            if let MoveOutcome::Drag { delta_x } = outcome {
                Shared::auto_stop(state);
                state.drag_offset = delta_x;
                state.place_frame();
            }
            response
        })
        .unwrap_or_default()
    }

    pub fn pointer_up(&self, time_millis: u64) -> PointerResponse {
        self.command(|this, state| {
            if !state.accepts_gestures() {
                return PointerResponse::default();
            }
            let context = state.release_context();
            let Some(release) = state.tracker.on_end(time_millis, &context) else {
                return PointerResponse::default();
            };

            let interrupted = std::mem::take(&mut state.interrupted);
            match release.kind {
                // The page scrolled instead; finish whatever the press stopped.
                ReleaseKind::Vertical => match interrupted {
                    Interrupted::Toss => {
                        let target = state.index as isize;
                        let speed = state.options.half_speed();
                        Shared::slide_to(this, state, target, speed, true);
                    }
                    Interrupted::Transition => Shared::settle(this, state),
                    Interrupted::Nothing => Shared::arm_auto_advance(this, state),
                },
                ReleaseKind::SnapBack => {
                    let target = state.index as isize;
                    let speed = state.options.half_speed();
                    Shared::slide_to(this, state, target, speed, true);
                }
                ReleaseKind::Step { target } => {
                    let index = state.index as isize;
                    if target == index + 1 {
                        this.emit(CarouselEvent::Next);
                    } else if target == index - 1 {
                        this.emit(CarouselEvent::Prev);
                    }
                    let speed = state.options.speed;
                    Shared::slide_to(this, state, target, speed, true);
                }
                ReleaseKind::Toss { velocity } => {
                    Shared::start_toss(this, state, velocity, time_millis);
                }
            }

            PointerResponse {
                handled: release.kind != ReleaseKind::Vertical,
                suppress_native_scroll: false,
                suppress_click_millis: release.suppress_click.then_some(CLICK_SUPPRESSION_MILLIS),
            }
        })
        .unwrap_or_default()
    }

    /// Same as [`Carousel::pointer_up`]; hosts forward cancelled pointer
    /// streams here.
    pub fn pointer_cancel(&self, time_millis: u64) -> PointerResponse {
        self.pointer_up(time_millis)
    }

    // Events

    /// Registers a listener for one event kind. A listener that captures a
    /// clone of this carousel keeps it alive until [`Carousel::kill`].
    pub fn on(
        &self,
        kind: EventKind,
        listener: impl FnMut(&CarouselEvent) + 'static,
    ) -> ListenerId {
        match &self.shared {
            Some(shared) if !shared.killed.get() => shared.events.borrow_mut().on(kind, listener),
            _ => ListenerId::DETACHED,
        }
    }

    pub fn on_any(&self, listener: impl FnMut(&CarouselEvent) + 'static) -> ListenerId {
        match &self.shared {
            Some(shared) if !shared.killed.get() => shared.events.borrow_mut().on_any(listener),
            _ => ListenerId::DETACHED,
        }
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|shared| shared.events.borrow_mut().off(id))
    }

    // Queries

    pub fn current_slide(&self) -> usize {
        self.query(|state| state.index)
    }

    pub fn slide_count(&self) -> usize {
        self.query(|state| state.layout.total_pages)
    }

    pub fn slides_per_page(&self) -> usize {
        self.query(|state| state.layout.pages_per_view)
    }

    /// Number of distinct resting indices, one per indicator dot.
    pub fn position_count(&self) -> usize {
        self.query(|state| state.layout.position_count())
    }

    pub fn slide_element(&self, page: usize) -> Option<S::Page> {
        self.query(|state| state.surface.page(page))
    }

    pub fn layout(&self) -> Option<Layout> {
        self.query(|state| Some(state.layout))
    }

    /// Offsets last sent to the surface, one per page.
    pub fn rendered_offsets(&self) -> Vec<f32> {
        self.query(|state| state.rendered.clone())
    }

    pub fn drag_offset(&self) -> f32 {
        self.query(|state| state.drag_offset)
    }

    pub fn is_tossing(&self) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|shared| shared.toss.is_running())
    }

    pub fn is_transitioning(&self) -> bool {
        self.query(|state| state.transition.is_some())
    }

    pub fn is_enabled(&self) -> bool {
        self.query(|state| state.enabled)
    }

    pub fn is_killed(&self) -> bool {
        self.shared
            .as_ref()
            .is_some_and(|shared| shared.killed.get())
    }

    pub fn options(&self) -> Option<CarouselOptions> {
        self.query(|state| Some(state.options.clone()))
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        self.shared
            .as_ref()
            .map(|shared| f(&shared.state.borrow().surface))
    }
}

#[cfg(test)]
#[path = "tests/carousel_tests.rs"]
mod tests;
