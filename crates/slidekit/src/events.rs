//! Lifecycle notifications and their subscribers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Something that happened to a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    /// Navigation started towards `index` from `previous`.
    Move { index: usize, previous: usize },
    /// The pages came to rest at `index`.
    AnimationEnd { index: usize },
    /// The auto-advance timer moved the carousel.
    AutoAdvance,
    Next,
    Prev,
    NextPage,
    PrevPage,
    /// The viewport width changed and the pages were re-stacked.
    SizeChange,
}

impl CarouselEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CarouselEvent::Move { .. } => EventKind::Move,
            CarouselEvent::AnimationEnd { .. } => EventKind::AnimationEnd,
            CarouselEvent::AutoAdvance => EventKind::AutoAdvance,
            CarouselEvent::Next => EventKind::Next,
            CarouselEvent::Prev => EventKind::Prev,
            CarouselEvent::NextPage => EventKind::NextPage,
            CarouselEvent::PrevPage => EventKind::PrevPage,
            CarouselEvent::SizeChange => EventKind::SizeChange,
        }
    }
}

/// Payload-free discriminant of [`CarouselEvent`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Move,
    AnimationEnd,
    AutoAdvance,
    Next,
    Prev,
    NextPage,
    PrevPage,
    SizeChange,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Move => "move",
            EventKind::AnimationEnd => "animationEnd",
            EventKind::AutoAdvance => "autoAdvance",
            EventKind::Next => "next",
            EventKind::Prev => "prev",
            EventKind::NextPage => "nextPage",
            EventKind::PrevPage => "prevPage",
            EventKind::SizeChange => "sizeChange",
        };
        f.write_str(name)
    }
}

/// Token returned by [`Events::on`] for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Returned when subscribing to an inert or killed carousel. Never
    /// registered, so removing it is a no-op.
    pub const DETACHED: ListenerId = ListenerId(0);
}

pub(crate) type Listener = Rc<RefCell<dyn FnMut(&CarouselEvent)>>;

struct Subscription {
    kind: Option<EventKind>,
    listener: Listener,
}

/// Subscribers in registration order.
#[derive(Default)]
pub struct Events {
    subscriptions: IndexMap<ListenerId, Subscription>,
    next_id: u64,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&CarouselEvent) + 'static,
    ) -> ListenerId {
        self.subscribe(Some(kind), listener)
    }

    /// Subscribes to every event.
    pub fn on_any(&mut self, listener: impl FnMut(&CarouselEvent) + 'static) -> ListenerId {
        self.subscribe(None, listener)
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.subscriptions.shift_remove(&id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    /// Listeners interested in `event`, in registration order. Returned by
    /// value so they can run without holding the registry.
    pub(crate) fn listeners_for(&self, event: &CarouselEvent) -> Vec<(ListenerId, Listener)> {
        let kind = event.kind();
        self.subscriptions
            .iter()
            .filter(|(_, subscription)| subscription.kind.map_or(true, |wanted| wanted == kind))
            .map(|(id, subscription)| (*id, Rc::clone(&subscription.listener)))
            .collect()
    }

    /// Delivers `event` to every matching listener.
    pub fn emit(&self, event: &CarouselEvent) {
        for (_, listener) in self.listeners_for(event) {
            (&mut *listener.borrow_mut())(event);
        }
    }

    fn subscribe(
        &mut self,
        kind: Option<EventKind>,
        listener: impl FnMut(&CarouselEvent) + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let listener: Listener = Rc::new(RefCell::new(listener));
        self.subscriptions.insert(id, Subscription { kind, listener });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_run_in_registration_order() {
        let mut events = Events::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        events.on(EventKind::Next, move |_| first.borrow_mut().push("first"));
        let any = Rc::clone(&log);
        events.on_any(move |_| any.borrow_mut().push("any"));
        let second = Rc::clone(&log);
        events.on(EventKind::Next, move |_| second.borrow_mut().push("second"));

        events.emit(&CarouselEvent::Next);
        assert_eq!(log.borrow().as_slice(), &["first", "any", "second"]);
    }

    #[test]
    fn kind_filters_listeners() {
        let mut events = Events::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        events.on(EventKind::Move, move |event| sink.borrow_mut().push(*event));

        events.emit(&CarouselEvent::Prev);
        events.emit(&CarouselEvent::Move {
            index: 1,
            previous: 0,
        });
        assert_eq!(
            seen.borrow().as_slice(),
            &[CarouselEvent::Move {
                index: 1,
                previous: 0
            }]
        );
    }

    #[test]
    fn off_removes_only_that_listener() {
        let mut events = Events::new();
        let count = Rc::new(RefCell::new(0));
        let a = Rc::clone(&count);
        let id = events.on(EventKind::SizeChange, move |_| *a.borrow_mut() += 1);
        let b = Rc::clone(&count);
        events.on(EventKind::SizeChange, move |_| *b.borrow_mut() += 10);

        assert!(events.off(id));
        assert!(!events.off(id));
        events.emit(&CarouselEvent::SizeChange);
        assert_eq!(*count.borrow(), 10);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn kinds_display_with_their_notification_names() {
        assert_eq!(EventKind::AnimationEnd.to_string(), "animationEnd");
        assert_eq!(CarouselEvent::NextPage.kind(), EventKind::NextPage);
    }
}
