//! Event bridge: one platform listener shared by any number of subscriptions.
//!
//! The bridge is hot. The producer (the platform element and its clicks)
//! exists independently of any subscription; subscribing only connects to it.
//! Exactly one platform listener is attached per bridge while at least one
//! subscription is active, and it is removed when the last one is cancelled.

use crate::{
    BridgeError, BridgeResult, ClickEvent, ConsoleSink, EventTarget, Listener, ListenerId,
    TargetLocator, CLICK,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, info};

/// Logged once per platform event before forwarding it.
pub const DIAGNOSTIC_LINE: &str = "Event callback executed!";

/// Options for a bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Platform event type to listen for.
    pub event_name: String,
    /// Whether to log `DIAGNOSTIC_LINE` on every platform event.
    pub diagnostic: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            event_name: CLICK.into(),
            diagnostic: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

struct SubscriberSlot {
    id: SubscriptionId,
    active: Cell<bool>,
    on_event: Box<dyn Fn(&ClickEvent)>,
}

/// Type-erased view of a bridge, so `Subscription` need not carry the target type.
trait Release {
    fn release(&self, id: SubscriptionId);
}

struct BridgeInner<T: EventTarget> {
    target: T,
    options: BridgeOptions,
    console: Rc<dyn ConsoleSink>,
    subscribers: RefCell<Vec<Rc<SubscriberSlot>>>,
    attached: Cell<Option<ListenerId>>,
    next_id: Cell<u64>,
}

impl<T: EventTarget> BridgeInner<T> {
    fn dispatch(&self, event: &ClickEvent) {
        // A host may still call a listener it was asked to remove.
        if self.attached.get().is_none() {
            debug!(event = %event, "Ignoring event for detached bridge");
            return;
        }
        if self.options.diagnostic {
            self.console.log(DIAGNOSTIC_LINE);
        }

        // Callbacks may subscribe or unsubscribe, so iterate over a snapshot.
        let snapshot: Vec<Rc<SubscriberSlot>> = self.subscribers.borrow().clone();
        debug!(event = %event, subscribers = snapshot.len(), "dispatching platform event");

        for slot in snapshot {
            if slot.active.get() {
                (slot.on_event)(event);
            }
        }
    }

    fn detach(&self) {
        if let Some(id) = self.attached.take() {
            let removed = self.target.remove_listener(&self.options.event_name, id);
            info!(
                event_name = %self.options.event_name,
                listener = id.0,
                removed,
                "Platform listener detached"
            );
        }
    }
}

impl<T: EventTarget> Release for BridgeInner<T> {
    fn release(&self, id: SubscriptionId) {
        let remaining = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|slot| slot.id != id);
            subscribers.len()
        };

        if remaining == 0 {
            self.detach();
        }
    }
}

impl<T: EventTarget> Drop for BridgeInner<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Bridges a platform event target to subscribers.
pub struct EventBridge<T: EventTarget + 'static> {
    inner: Rc<BridgeInner<T>>,
}

impl<T: EventTarget + 'static> Clone for EventBridge<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: EventTarget + 'static> EventBridge<T> {
    /// Bridge `click` events from `target`, logging diagnostics to `console`.
    pub fn new(target: T, console: Rc<dyn ConsoleSink>) -> Self {
        Self::with_options(target, console, BridgeOptions::default())
    }

    pub fn with_options(target: T, console: Rc<dyn ConsoleSink>, options: BridgeOptions) -> Self {
        Self {
            inner: Rc::new(BridgeInner {
                target,
                options,
                console,
                subscribers: RefCell::new(Vec::new()),
                attached: Cell::new(None),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Locate the target by selector and bridge it.
    ///
    /// Fails with `BridgeError::InvalidTarget` if nothing matches; no
    /// listener is attached in that case.
    pub fn from_selector<L>(
        locator: &L,
        selector: &str,
        console: Rc<dyn ConsoleSink>,
        options: BridgeOptions,
    ) -> BridgeResult<Self>
    where
        L: TargetLocator<Target = T>,
    {
        let target = locator
            .query_selector(selector)
            .ok_or_else(|| BridgeError::InvalidTarget {
                selector: selector.to_string(),
            })?;
        debug!(selector, "Bridge target located");
        Ok(Self::with_options(target, console, options))
    }

    /// Register `on_event` to receive every platform event until cancelled.
    ///
    /// The first active subscription attaches the platform listener.
    pub fn subscribe<F>(&self, on_event: F) -> Subscription
    where
        F: Fn(&ClickEvent) + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let slot = Rc::new(SubscriberSlot {
            id,
            active: Cell::new(true),
            on_event: Box::new(on_event),
        });
        self.inner.subscribers.borrow_mut().push(slot.clone());

        if self.inner.attached.get().is_none() {
            self.attach();
        }
        debug!(subscription = id.0, "Subscribed");

        Subscription {
            slot,
            bridge: self.inner.clone(),
        }
    }

    fn attach(&self) {
        // Weak: the target owns the listener, and the bridge owns the target.
        let weak: Weak<BridgeInner<T>> = Rc::downgrade(&self.inner);
        let listener: Listener = Rc::new(move |event: &ClickEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(event);
            }
        });

        let id = self
            .inner
            .target
            .add_listener(&self.inner.options.event_name, listener);
        self.inner.attached.set(Some(id));
        info!(
            event_name = %self.inner.options.event_name,
            listener = id.0,
            "Platform listener attached"
        );
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether the platform listener is currently attached.
    pub fn is_attached(&self) -> bool {
        self.inner.attached.get().is_some()
    }

    pub fn event_name(&self) -> &str {
        &self.inner.options.event_name
    }
}

/// A live registration on an `EventBridge`.
///
/// Dropping a `Subscription` does not cancel it; call `unsubscribe` or use
/// `into_guard` for scoped cancellation. Clones share the same registration.
#[derive(Clone)]
pub struct Subscription {
    slot: Rc<SubscriberSlot>,
    bridge: Rc<dyn Release>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.slot.id
    }

    pub fn is_active(&self) -> bool {
        self.slot.active.get()
    }

    /// Cancel this subscription.
    ///
    /// Idempotent: returns true only for the call that deactivated it. Once
    /// this returns the callback is never invoked again, including later in
    /// a dispatch that is currently in progress.
    pub fn unsubscribe(&self) -> bool {
        if !self.slot.active.replace(false) {
            debug!(subscription = self.slot.id.0, "Already unsubscribed");
            return false;
        }
        self.bridge.release(self.slot.id);
        debug!(subscription = self.slot.id.0, "Unsubscribed");
        true
    }

    /// Convert into a guard that unsubscribes when dropped.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { subscription: self }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.slot.id)
            .field("active", &self.slot.active.get())
            .finish()
    }
}

/// Unsubscribes on drop.
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Subscription,
}

impl SubscriptionGuard {
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
