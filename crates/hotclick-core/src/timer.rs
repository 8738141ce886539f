//! One-shot timer capability.

use std::time::Duration;

/// Work scheduled on a timer. Runs on the host loop thread.
pub type TimerTask = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// "Invoke this callback once after `delay`."
pub trait TimerService {
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> TimerId;

    /// Cancel a pending timer. Returns false if it already ran or never existed.
    fn clear_timeout(&self, id: TimerId) -> bool;
}
