//! The trigger-button demo.
//!
//! Locate the configured element, bridge its clicks, print `<type> <x> <y>`
//! for each one, and after `unsubscribe_after_ms` print `Unsubscribe` and
//! cancel the subscription, which detaches the platform listener.

use crate::{
    BridgeResult, ConsoleSink, DemoConfig, EventBridge, Subscription, TargetLocator, TimerId,
    TimerService,
};
use std::rc::Rc;
use tracing::info;

/// Logged by the auto-unsubscribe timer right before it cancels.
pub const UNSUBSCRIBE_LINE: &str = "Unsubscribe";

/// A running demo.
#[derive(Debug)]
pub struct DemoHandle {
    subscription: Subscription,
    auto_unsubscribe: TimerId,
}

impl DemoHandle {
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Keep the subscription alive past the configured delay.
    pub fn cancel_auto_unsubscribe(&self, timer: &dyn TimerService) -> bool {
        timer.clear_timeout(self.auto_unsubscribe)
    }
}

/// Start the demo against `locator`.
///
/// Fails with `BridgeError::InvalidTarget` if `config.selector` matches
/// nothing; nothing is attached or scheduled in that case.
pub fn run<L>(
    locator: &L,
    timer: &dyn TimerService,
    console: Rc<dyn ConsoleSink>,
    config: &DemoConfig,
) -> BridgeResult<DemoHandle>
where
    L: TargetLocator,
{
    let bridge = EventBridge::from_selector(
        locator,
        &config.selector,
        console.clone(),
        config.bridge_options(),
    )?;

    let line_sink = console.clone();
    let subscription = bridge.subscribe(move |event| line_sink.log(&event.to_string()));

    let pending = subscription.clone();
    let auto_unsubscribe = timer.set_timeout(
        config.unsubscribe_after(),
        Box::new(move || {
            console.log(UNSUBSCRIBE_LINE);
            pending.unsubscribe();
        }),
    );

    info!(
        selector = %config.selector,
        event_name = %config.event_name,
        unsubscribe_after_ms = config.unsubscribe_after_ms,
        "Demo subscribed"
    );

    Ok(DemoHandle {
        subscription,
        auto_unsubscribe,
    })
}
