//! Toss animation driver.
//!
//! Consumes a [`TossState`] on the runtime's frame callbacks and reports the
//! per-frame distance to the carousel.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slidekit_animation::{TossConfig, TossState, TossStep};
use slidekit_core::{FrameClock, RuntimeHandle, TaskHandle};

/// State for an active toss.
struct TossAnimationState {
    toss: TossState,
    config: TossConfig,
    /// Pending frame callback; dropping it cancels the frame.
    registration: Option<TaskHandle>,
    /// Cleared by [`TossAnimation::cancel`]; checked first on every frame.
    is_running: Cell<bool>,
    frames: Cell<u32>,
}

/// Schedules the next toss frame. Re-registers itself until the toss
/// finishes or is cancelled.
fn schedule_next_frame<F, G>(
    state: Rc<RefCell<Option<TossAnimationState>>>,
    frame_clock: FrameClock,
    on_step: Rc<F>,
    on_end: G,
) where
    F: Fn(f32) + 'static,
    G: FnOnce() + 'static,
{
    let state_for_closure = Rc::clone(&state);
    let frame_clock_for_closure = frame_clock.clone();

    let registration = frame_clock.with_frame_millis(move |frame_time_millis| {
        let step = {
            let mut guard = state_for_closure.borrow_mut();
            let Some(anim_state) = guard.as_mut() else {
                return;
            };
            if !anim_state.is_running.get() {
                return;
            }
            anim_state.registration = None;
            anim_state.frames.set(anim_state.frames.get() + 1);
            let config = anim_state.config;
            anim_state.toss.advance(frame_time_millis, &config)
        };

        let (distance, finished) = match step {
            TossStep::Skip => (0.0, false),
            TossStep::Advance(distance) => (distance, false),
            TossStep::Finished(distance) => (distance, true),
        };

        if distance != 0.0 {
            (*on_step)(distance);
        }

        // The step callback may have cancelled the toss.
        let still_running = state_for_closure
            .borrow()
            .as_ref()
            .is_some_and(|anim_state| anim_state.is_running.get());
        if !still_running {
            return;
        }

        if finished {
            let frames = {
                let mut guard = state_for_closure.borrow_mut();
                let frames = guard.as_ref().map_or(0, |anim_state| anim_state.frames.get());
                *guard = None;
                frames
            };
            log::debug!("toss settled after {frames} frames");
            on_end();
        } else {
            schedule_next_frame(
                state_for_closure,
                frame_clock_for_closure,
                on_step,
                on_end,
            );
        }
    });

    if let Some(anim_state) = state.borrow_mut().as_mut() {
        anim_state.registration = Some(registration);
    }
}

/// Drives a momentum toss.
///
/// Each frame advances the toss by the time elapsed since the previous frame
/// and hands the resulting distance to `on_step`. `on_end` runs once the
/// remaining distance is negligible, never after [`TossAnimation::cancel`].
#[derive(Clone)]
pub struct TossAnimation {
    state: Rc<RefCell<Option<TossAnimationState>>>,
    frame_clock: FrameClock,
}

impl TossAnimation {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self {
            state: Rc::new(RefCell::new(None)),
            frame_clock: runtime.frame_clock(),
        }
    }

    pub fn start<F, G>(&self, toss: TossState, config: TossConfig, on_step: F, on_end: G)
    where
        F: Fn(f32) + 'static,
        G: FnOnce() + 'static,
    {
        self.cancel();

        log::debug!(
            "toss started: v {} px/ms over {} px",
            toss.initial_velocity(),
            toss.total_distance()
        );

        *self.state.borrow_mut() = Some(TossAnimationState {
            toss,
            config,
            registration: None,
            is_running: Cell::new(true),
            frames: Cell::new(0),
        });

        schedule_next_frame(
            Rc::clone(&self.state),
            self.frame_clock.clone(),
            Rc::new(on_step),
            on_end,
        );
    }

    pub fn cancel(&self) {
        let state = self.state.borrow_mut().take();
        if let Some(state) = state {
            state.is_running.set(false);
            if let Some(registration) = state.registration {
                registration.cancel();
            }
            log::trace!(
                "toss cancelled after {} frames, {:.1}px short",
                state.frames.get(),
                state.toss.remaining_distance()
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|state| state.is_running.get())
    }
}
