use slidekit_core::{RuntimeHandle, TaskHandle};

/// The single auto-advance timer a carousel may have outstanding.
#[derive(Debug)]
pub(crate) struct AutoAdvance {
    delay_millis: u64,
    timer: Option<TaskHandle>,
}

impl AutoAdvance {
    pub(crate) fn new(delay_millis: u64) -> Self {
        Self {
            delay_millis,
            timer: None,
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.delay_millis > 0
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(TaskHandle::is_pending)
    }

    /// Schedules `on_fire` after the delay, replacing any pending timer.
    /// Does nothing once stopped or when no delay is configured.
    pub(crate) fn arm(&mut self, runtime: &RuntimeHandle, on_fire: impl FnOnce() + 'static) {
        self.pause();
        if !self.is_enabled() {
            return;
        }
        self.timer = Some(runtime.schedule_timer(self.delay_millis, move |_| on_fire()));
    }

    /// Cancels the pending timer. The next settle re-arms it.
    pub(crate) fn pause(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Cancels the pending timer and disables auto-advance for good.
    pub(crate) fn stop(&mut self) {
        self.pause();
        self.delay_millis = 0;
    }

    /// Forgets a timer that has just fired.
    pub(crate) fn fired(&mut self) {
        self.timer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use slidekit_core::Runtime;

    #[test]
    fn disabled_without_delay() {
        let runtime = Runtime::headless();
        let mut auto = AutoAdvance::new(0);
        auto.arm(&runtime.handle(), || {});
        assert!(!auto.is_armed());
        assert!(!runtime.has_timers());
    }

    #[test]
    fn rearming_replaces_the_pending_timer() {
        let runtime = Runtime::headless();
        let fired = Rc::new(Cell::new(0));
        let mut auto = AutoAdvance::new(1_000);

        let first = Rc::clone(&fired);
        auto.arm(&runtime.handle(), move || first.set(first.get() + 1));
        let second = Rc::clone(&fired);
        auto.arm(&runtime.handle(), move || second.set(second.get() + 10));

        runtime.advance_timers(5_000);
        assert_eq!(fired.get(), 10);
    }

    #[test]
    fn stop_is_permanent() {
        let runtime = Runtime::headless();
        let mut auto = AutoAdvance::new(1_000);
        auto.arm(&runtime.handle(), || {});
        auto.stop();
        assert!(!auto.is_armed());
        auto.arm(&runtime.handle(), || {});
        assert!(!auto.is_armed());
        assert!(!runtime.has_timers());
    }

    #[test]
    fn pause_keeps_the_delay() {
        let runtime = Runtime::headless();
        let mut auto = AutoAdvance::new(1_000);
        auto.arm(&runtime.handle(), || {});
        auto.pause();
        assert!(!auto.is_armed());
        assert!(auto.is_enabled());
    }
}
