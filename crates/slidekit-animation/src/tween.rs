//! Frame-driven progress tweens.

use std::cell::RefCell;
use std::rc::Rc;

use slidekit_core::{FrameClock, TaskHandle};

use crate::easing::ease_out;

/// Length of an ease-out tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenSpec {
    pub duration_millis: u64,
}

impl TweenSpec {
    pub fn new(duration_millis: u64) -> Self {
        Self { duration_millis }
    }

    /// Eased progress after `elapsed_millis`. Zero-length tweens are complete
    /// immediately.
    pub fn progress_at(&self, elapsed_millis: u64) -> f32 {
        if self.duration_millis == 0 {
            return 1.0;
        }
        let linear = (elapsed_millis as f32 / self.duration_millis as f32).clamp(0.0, 1.0);
        ease_out(linear)
    }

    pub fn is_complete_at(&self, elapsed_millis: u64) -> bool {
        elapsed_millis >= self.duration_millis
    }
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self::new(300)
    }
}

type ProgressCallback = Box<dyn FnMut(f32) + 'static>;
type EndCallback = Box<dyn FnOnce() + 'static>;

struct FrameTweenInner {
    clock: FrameClock,
    spec: TweenSpec,
    start_millis: u64,
    running: bool,
    registration: Option<TaskHandle>,
    on_progress: Option<ProgressCallback>,
    on_end: Option<EndCallback>,
}

/// Reports eased progress from 0 to 1 once per frame for the length of a
/// [`TweenSpec`], then calls its end callback.
///
/// Time is measured from the runtime clock at [`FrameTween::start`], so the
/// first frame may already report progress above zero.
#[derive(Clone)]
pub struct FrameTween {
    inner: Rc<RefCell<FrameTweenInner>>,
}

impl FrameTween {
    pub fn start(
        clock: FrameClock,
        spec: TweenSpec,
        on_progress: impl FnMut(f32) + 'static,
        on_end: impl FnOnce() + 'static,
    ) -> Self {
        let start_millis = clock.runtime_handle().now_millis();
        let inner = FrameTweenInner {
            clock,
            spec,
            start_millis,
            running: true,
            registration: None,
            on_progress: Some(Box::new(on_progress)),
            on_end: Some(Box::new(on_end)),
        };
        let tween = Self {
            inner: Rc::new(RefCell::new(inner)),
        };
        log::trace!("tween started: {}ms", spec.duration_millis);
        Self::schedule_frame(&tween.inner);
        tween
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Stops the tween without calling the end callback.
    pub fn cancel(&self) {
        let registration = {
            let mut inner = self.inner.borrow_mut();
            inner.running = false;
            inner.on_end = None;
            inner.registration.take()
        };
        if let Some(registration) = registration {
            registration.cancel();
        }
    }

    fn schedule_frame(this: &Rc<RefCell<FrameTweenInner>>) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() || !inner.running {
                return;
            }
            inner.clock.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_millis(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<FrameTweenInner>>, frame_time_millis: u64) {
        let (progress, finished, mut on_progress) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            if !inner.running {
                return;
            }
            let elapsed = frame_time_millis.saturating_sub(inner.start_millis);
            (
                inner.spec.progress_at(elapsed),
                inner.spec.is_complete_at(elapsed),
                inner.on_progress.take(),
            )
        };

        // Callbacks run unborrowed so they may cancel this tween.
        if let Some(callback) = on_progress.as_mut() {
            callback(progress);
        }

        let on_end = {
            let mut inner = this.borrow_mut();
            if inner.on_progress.is_none() {
                inner.on_progress = on_progress;
            }
            if !inner.running {
                return;
            }
            if finished {
                inner.running = false;
                inner.on_end.take()
            } else {
                None
            }
        };

        if finished {
            if let Some(on_end) = on_end {
                on_end();
            }
        } else {
            Self::schedule_frame(this);
        }
    }
}

#[cfg(test)]
#[path = "tests/tween_tests.rs"]
mod tests;
