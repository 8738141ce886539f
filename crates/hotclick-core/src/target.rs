//! Host-side capabilities the bridge attaches to.

use crate::ClickEvent;
use std::rc::Rc;

/// Callback registered on a platform target.
pub type Listener = Rc<dyn Fn(&ClickEvent)>;

/// Identifies one registration on a target; needed to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Something that can register and deregister a named event listener.
pub trait EventTarget {
    fn add_listener(&self, event_name: &str, listener: Listener) -> ListenerId;

    /// Returns false if nothing was registered under `id`.
    fn remove_listener(&self, event_name: &str, id: ListenerId) -> bool;
}

impl<T: EventTarget + ?Sized> EventTarget for Rc<T> {
    fn add_listener(&self, event_name: &str, listener: Listener) -> ListenerId {
        (**self).add_listener(event_name, listener)
    }

    fn remove_listener(&self, event_name: &str, id: ListenerId) -> bool {
        (**self).remove_listener(event_name, id)
    }
}

/// Finds targets by selector (e.g. `button#trigger`).
pub trait TargetLocator {
    type Target: EventTarget + 'static;

    fn query_selector(&self, selector: &str) -> Option<Self::Target>;
}
