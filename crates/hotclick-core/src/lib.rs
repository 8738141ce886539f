//! hotclick-core: a hot click-event bridge with explicit subscriptions.
//!
//! Design goal: keep this crate host-agnostic. It only knows about the
//! capabilities it needs from the host:
//! - `EventTarget` / `TargetLocator` - something that can register and remove a named listener
//! - `TimerService` - "run this once after N ms"
//! - `ConsoleSink` - a write-only line sink for user-facing output
//!
//! Concrete hosts (an in-memory document + event loop, and the browser on
//! wasm32) live in `hotclick-platform`.
//!
//! Everything here is single-threaded: the host loop calls listeners on its
//! own thread, so shared state uses `Rc`/`RefCell`/`Cell`.

mod bridge;
mod config;
mod console;
pub mod demo;
mod error;
mod event;
mod target;
#[cfg(test)]
mod testing;
mod timer;

pub use bridge::{
    BridgeOptions, EventBridge, Subscription, SubscriptionGuard, SubscriptionId, DIAGNOSTIC_LINE,
};
pub use config::{ConsoleKind, DemoConfig, LoggingConfig, ScriptedClick};
pub use console::{ConsoleSink, MemoryConsole, StdoutConsole, TracingConsole};
pub use error::{BridgeError, BridgeResult, ConfigError};
pub use event::{ClickEvent, MouseButton, CLICK};
pub use target::{EventTarget, Listener, ListenerId, TargetLocator};
pub use timer::{TimerId, TimerService, TimerTask};
