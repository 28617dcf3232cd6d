use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use web_time::Instant;

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::TaskId;

type FrameCallback = Box<dyn FnOnce(u64) + 'static>;
type TimerCallback = Box<dyn FnOnce(u64) + 'static>;
type DeferredTask = Box<dyn FnOnce() + 'static>;

struct FrameCallbackEntry {
    id: TaskId,
    callback: Option<FrameCallback>,
}

struct TimerEntry {
    id: TaskId,
    due_millis: u64,
    callback: Option<TimerCallback>,
}

struct DeferredEntry {
    id: TaskId,
    task: DeferredTask,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    epoch: Instant,
    needs_frame: Cell<bool>,
    now_millis: Cell<u64>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    timers: RefCell<Vec<TimerEntry>>,
    deferred: RefCell<VecDeque<DeferredEntry>>,
    next_task_id: Cell<TaskId>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            epoch: Instant::now(),
            needs_frame: Cell::new(false),
            now_millis: Cell::new(0),
            frame_callbacks: RefCell::new(VecDeque::new()),
            timers: RefCell::new(Vec::new()),
            deferred: RefCell::new(VecDeque::new()),
            next_task_id: Cell::new(1),
        }
    }

    fn allocate_id(&self) -> TaskId {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        id
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn register_frame_callback(&self, callback: FrameCallback) -> TaskId {
        let id = self.allocate_id();
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn schedule_timer(&self, delay_millis: u64, callback: TimerCallback) -> TaskId {
        let id = self.allocate_id();
        let due_millis = self.now_millis.get().saturating_add(delay_millis);
        self.timers.borrow_mut().push(TimerEntry {
            id,
            due_millis,
            callback: Some(callback),
        });
        id
    }

    fn post(&self, task: DeferredTask) -> TaskId {
        let id = self.allocate_id();
        self.deferred
            .borrow_mut()
            .push_back(DeferredEntry { id, task });
        self.schedule();
        id
    }

    fn cancel(&self, id: TaskId) {
        {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
                callbacks.remove(index);
            }
        }
        {
            let mut timers = self.timers.borrow_mut();
            if let Some(index) = timers.iter().position(|entry| entry.id == id) {
                timers.remove(index);
            }
        }
        {
            let mut deferred = self.deferred.borrow_mut();
            if let Some(index) = deferred.iter().position(|entry| entry.id == id) {
                deferred.remove(index);
            }
        }
        if !self.has_frame_callbacks() && !self.has_deferred() {
            self.needs_frame.set(false);
        }
    }

    fn is_scheduled(&self, id: TaskId) -> bool {
        self.frame_callbacks.borrow().iter().any(|entry| entry.id == id)
            || self.timers.borrow().iter().any(|entry| entry.id == id)
            || self.deferred.borrow().iter().any(|entry| entry.id == id)
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn has_timers(&self) -> bool {
        !self.timers.borrow().is_empty()
    }

    fn has_deferred(&self) -> bool {
        !self.deferred.borrow().is_empty()
    }

    fn advance_clock(&self, now_millis: u64) {
        if now_millis > self.now_millis.get() {
            self.now_millis.set(now_millis);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.advance_clock(frame_time_nanos / 1_000_000);
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: Vec<FrameCallback> = Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        for callback in pending {
            callback(frame_time_nanos);
        }
        if !self.has_frame_callbacks() && !self.has_deferred() {
            self.needs_frame.set(false);
        }
    }

    /// Pops the earliest timer due at or before `now_millis`. Ties fire in
    /// scheduling order.
    fn take_due_timer(&self, now_millis: u64) -> Option<(u64, TimerCallback)> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_millis <= now_millis)
            .min_by_key(|(_, entry)| (entry.due_millis, entry.id))
            .map(|(index, _)| index)?;
        let mut entry = timers.remove(index);
        entry.callback.take().map(|callback| (entry.due_millis, callback))
    }

    fn advance_timers(&self, now_millis: u64) -> usize {
        let mut fired = 0;
        while let Some((due_millis, callback)) = self.take_due_timer(now_millis) {
            // Timers observe their own due time so chained timers stay on schedule.
            self.advance_clock(due_millis);
            callback(due_millis);
            fired += 1;
        }
        if fired > 0 {
            log::trace!("fired {fired} timer(s) at {now_millis}ms");
        }
        self.advance_clock(now_millis);
        fired
    }

    fn next_timer_due(&self) -> Option<u64> {
        self.timers.borrow().iter().map(|entry| entry.due_millis).min()
    }

    fn drain_tasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.deferred.borrow_mut().pop_front();
            let Some(entry) = next else {
                break;
            };
            (entry.task)();
            ran += 1;
        }
        if !self.has_frame_callbacks() {
            self.needs_frame.set(false);
        }
        ran
    }
}

/// Owner of the scheduling queues. Drop it and every outstanding
/// [`TaskHandle`] becomes inert.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    /// Runtime with a scheduler that ignores frame requests. Hosts that poll
    /// [`Runtime::needs_frame`] use this.
    pub fn headless() -> Self {
        Self::new(Arc::new(DefaultScheduler))
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    /// Milliseconds of wall-clock time since this runtime was created.
    pub fn elapsed_millis(&self) -> u64 {
        self.inner.epoch.elapsed().as_millis() as u64
    }

    /// Runtime time as last observed through frames or timers.
    pub fn now_millis(&self) -> u64 {
        self.inner.now_millis.get()
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }

    /// Fires every timer due at or before `now_millis`; returns how many ran.
    pub fn advance_timers(&self, now_millis: u64) -> usize {
        self.inner.advance_timers(now_millis)
    }

    /// Runs deferred tasks until the queue is empty; returns how many ran.
    pub fn drain_tasks(&self) -> usize {
        self.inner.drain_tasks()
    }

    /// One host turn: timers, then a frame, then deferred work.
    pub fn pump(&self, now_millis: u64) {
        self.advance_timers(now_millis);
        self.drain_frame_callbacks(now_millis.saturating_mul(1_000_000));
        self.drain_tasks();
    }

    /// Pumps at the current wall-clock time for hosts without their own
    /// frame timestamps. Returns the time used.
    pub fn pump_elapsed(&self) -> u64 {
        let now = self.elapsed_millis();
        self.pump(now);
        now
    }

    pub fn next_timer_due(&self) -> Option<u64> {
        self.inner.next_timer_due()
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    pub fn has_timers(&self) -> bool {
        self.inner.has_timers()
    }

    pub fn has_pending_work(&self) -> bool {
        self.inner.has_frame_callbacks() || self.inner.has_timers() || self.inner.has_deferred()
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn register_frame_callback(&self, callback: impl FnOnce(u64) + 'static) -> TaskHandle {
        match self.inner.upgrade() {
            Some(inner) => {
                let id = inner.register_frame_callback(Box::new(callback));
                TaskHandle::new(self.clone(), id)
            }
            None => TaskHandle::inactive(self.clone()),
        }
    }

    /// Schedules `callback` to run once `delay_millis` of runtime time has
    /// passed. The callback receives its due time in milliseconds.
    pub fn schedule_timer(
        &self,
        delay_millis: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> TaskHandle {
        match self.inner.upgrade() {
            Some(inner) => {
                let id = inner.schedule_timer(delay_millis, Box::new(callback));
                TaskHandle::new(self.clone(), id)
            }
            None => TaskHandle::inactive(self.clone()),
        }
    }

    /// Queues work for the next [`Runtime::drain_tasks`].
    pub fn post(&self, task: impl FnOnce() + 'static) -> TaskHandle {
        match self.inner.upgrade() {
            Some(inner) => {
                let id = inner.post(Box::new(task));
                TaskHandle::new(self.clone(), id)
            }
            None => TaskHandle::inactive(self.clone()),
        }
    }

    pub fn cancel_task(&self, id: TaskId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel(id);
        }
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.is_scheduled(id))
            .unwrap_or(false)
    }

    pub fn now_millis(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.now_millis.get())
            .unwrap_or(0)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Cancelable reference to one scheduled frame callback, timer or task.
///
/// Dropping the handle cancels the work if it has not run yet.
pub struct TaskHandle {
    runtime: RuntimeHandle,
    id: Option<TaskId>,
}

impl TaskHandle {
    fn new(runtime: RuntimeHandle, id: TaskId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn id(&self) -> Option<TaskId> {
        self.id
    }

    /// True while the work is still queued.
    pub fn is_pending(&self) -> bool {
        self.id.is_some_and(|id| self.runtime.is_scheduled(id))
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_task(id);
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_task(id);
        }
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
