//! In-memory host doubles shared by the unit tests.

use crate::{ClickEvent, EventTarget, Listener, ListenerId, TargetLocator, TimerId, TimerService, TimerTask};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeTarget {
    listeners: RefCell<Vec<(String, ListenerId, Listener)>>,
    next_id: Cell<u64>,
    pub(crate) added: Cell<usize>,
    pub(crate) removed: Cell<usize>,
}

impl FakeTarget {
    /// Listeners currently registered for `event_name`.
    pub(crate) fn listeners_for(&self, event_name: &str) -> Vec<(ListenerId, Listener)> {
        self.listeners
            .borrow()
            .iter()
            .filter(|(name, _, _)| name == event_name)
            .map(|(_, id, l)| (*id, l.clone()))
            .collect()
    }

    /// Dispatch like the DOM: skip listeners removed mid-dispatch.
    pub(crate) fn fire(&self, event: &ClickEvent) {
        for (id, listener) in self.listeners_for(&event.event_type) {
            let still_registered = self
                .listeners
                .borrow()
                .iter()
                .any(|(name, lid, _)| *lid == id && *name == event.event_type);
            if still_registered {
                listener(event);
            }
        }
    }

    pub(crate) fn attached(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl EventTarget for FakeTarget {
    fn add_listener(&self, event_name: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.added.set(self.added.get() + 1);
        self.listeners
            .borrow_mut()
            .push((event_name.to_string(), id, listener));
        id
    }

    fn remove_listener(&self, event_name: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(name, lid, _)| !(name == event_name && *lid == id));
        let removed = listeners.len() != before;
        if removed {
            self.removed.set(self.removed.get() + 1);
        }
        removed
    }
}

/// A page holding a single `button#trigger`.
pub(crate) struct FakeDocument {
    pub(crate) button: Rc<FakeTarget>,
}

impl FakeDocument {
    pub(crate) fn new() -> Self {
        Self {
            button: Rc::new(FakeTarget::default()),
        }
    }
}

impl TargetLocator for FakeDocument {
    type Target = Rc<FakeTarget>;

    fn query_selector(&self, selector: &str) -> Option<Self::Target> {
        (selector == "button#trigger").then(|| self.button.clone())
    }
}

/// Timer driven by `advance_to`.
#[derive(Default)]
pub(crate) struct ManualTimer {
    now_ms: Cell<u64>,
    next_id: Cell<u64>,
    pending: RefCell<Vec<(u64, TimerId, TimerTask)>>,
}

impl ManualTimer {
    pub(crate) fn advance_to(&self, ms: u64) {
        loop {
            let due = {
                let mut pending = self.pending.borrow_mut();
                pending.sort_by_key(|(at, id, _)| (*at, *id));
                match pending.first() {
                    Some((at, _, _)) if *at <= ms => Some(pending.remove(0)),
                    _ => None,
                }
            };
            match due {
                Some((at, _, task)) => {
                    self.now_ms.set(at);
                    task();
                }
                None => break,
            }
        }
        self.now_ms.set(ms);
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl TimerService for ManualTimer {
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let at = self.now_ms.get().saturating_add(delay_ms);
        self.pending.borrow_mut().push((at, id, task));
        id
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|(_, tid, _)| *tid != id);
        pending.len() != before
    }
}
