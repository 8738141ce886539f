//! hotclick-platform: host implementations for hotclick.
//!
//! This crate provides:
//! - `dom` - in-memory document and elements (native hosts and tests)
//! - `event_loop` - single-threaded loop with a timer queue and a cross-thread inbox
//! - `input` - stdin click input for the native host
//! - `web` - browser DOM, `setTimeout` and `console.log` (wasm32 only)

mod dom;
mod error;
mod event_loop;
mod input;

#[cfg(target_arch = "wasm32")]
mod web;

pub use dom::{Document, Element, Selector};
pub use error::{PlatformError, PlatformResult};
pub use event_loop::{Clock, EventLoop, LoopInput, LoopTimer};
pub use input::{parse_line, pump_lines, spawn_stdin_reader};

#[cfg(target_arch = "wasm32")]
pub use web::{start, BrowserConsole, WebDocument, WebElement, WindowTimer};

#[cfg(test)]
mod tests {
    //! End-to-end runs of the demo against the in-memory host.

    use super::*;
    use hotclick_core::demo::{self, UNSUBSCRIBE_LINE};
    use hotclick_core::{
        BridgeError, BridgeOptions, ConsoleSink, DemoConfig, EventBridge, MemoryConsole,
        ScriptedClick, Subscription, DIAGNOSTIC_LINE,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn start(config: &DemoConfig) -> (EventLoop, Rc<MemoryConsole>, demo::DemoHandle) {
        let (event_loop, _inbox) =
            EventLoop::with_inbox(Document::with_trigger_button(), Clock::manual());
        let console = Rc::new(MemoryConsole::new());
        let timer = event_loop.timer();
        let handle = demo::run(event_loop.document(), &timer, console.clone(), config).unwrap();
        (event_loop, console, handle)
    }

    fn trigger(event_loop: &EventLoop) -> Element {
        event_loop.document().find("button#trigger").unwrap()
    }

    #[test]
    fn test_click_before_auto_unsubscribe() {
        let (event_loop, console, _handle) = start(&DemoConfig::default());

        event_loop.advance_to(1_200).unwrap();
        trigger(&event_loop).click(57, 148, event_loop.now_ms());

        assert_eq!(console.lines(), vec![DIAGNOSTIC_LINE, "click 57 148"]);
    }

    #[test]
    fn test_click_after_auto_unsubscribe_is_silent() {
        let (event_loop, console, handle) = start(&DemoConfig::default());
        let button = trigger(&event_loop);
        assert_eq!(button.listener_count("click"), 1);

        event_loop.advance_to(6_000).unwrap();
        assert_eq!(console.take(), vec![UNSUBSCRIBE_LINE]);
        assert_eq!(button.listener_count("click"), 0);
        assert!(!handle.subscription().is_active());

        assert_eq!(button.click(10, 10, event_loop.now_ms()), 0);
        assert!(console.is_empty());
    }

    #[test]
    fn test_scripted_session() {
        let config = DemoConfig {
            script: vec![
                ScriptedClick { at_ms: 100, x: 57, y: 148 },
                ScriptedClick { at_ms: 4_000, x: 47, y: 155 },
                ScriptedClick { at_ms: 6_000, x: 10, y: 10 },
            ],
            ..DemoConfig::default()
        };
        let (event_loop, console, _handle) = start(&config);
        for click in &config.script {
            event_loop.schedule_click(&config.selector, *click);
        }

        event_loop.run().unwrap();

        assert_eq!(
            console.lines(),
            vec![
                DIAGNOSTIC_LINE,
                "click 57 148",
                DIAGNOSTIC_LINE,
                "click 47 155",
                UNSUBSCRIBE_LINE,
            ]
        );
        assert_eq!(event_loop.now_ms(), 6_000);
    }

    #[test]
    fn test_double_unsubscribe_detaches_once() {
        let (event_loop, _console, handle) = start(&DemoConfig::default());
        let button = trigger(&event_loop);

        assert!(handle.subscription().unsubscribe());
        assert!(!handle.subscription().unsubscribe());
        assert_eq!(button.listener_count("click"), 0);

        // The timer's own unsubscribe is a no-op as well.
        event_loop.advance_to(5_000).unwrap();
        assert_eq!(button.listener_count("click"), 0);
    }

    #[test]
    fn test_huge_unsubscribe_delay_never_fires_early() {
        let (event_loop, _inbox) =
            EventLoop::with_inbox(Document::with_trigger_button(), Clock::manual());
        let console = Rc::new(MemoryConsole::new());
        let config = DemoConfig::from_yaml("unsubscribe_after_ms: 18446744073709551615").unwrap();

        event_loop.advance_to(10).unwrap();
        let handle = demo::run(event_loop.document(), &event_loop.timer(), console.clone(), &config).unwrap();
        event_loop.advance_to(60_000).unwrap();

        assert!(handle.subscription().is_active());
        assert!(console.is_empty());
        assert_eq!(event_loop.pending_timers(), 1);
    }

    #[test]
    fn test_bridge_cancelled_by_another_bridge_mid_click() {
        let (event_loop, _inbox) =
            EventLoop::with_inbox(Document::with_trigger_button(), Clock::manual());
        let memory = Rc::new(MemoryConsole::new());
        let console: Rc<dyn ConsoleSink> = memory.clone();
        let bridge = |console: Rc<dyn ConsoleSink>| {
            EventBridge::from_selector(
                event_loop.document(),
                "button#trigger",
                console,
                BridgeOptions::default(),
            )
            .unwrap()
        };
        let first = bridge(console.clone());
        let second = bridge(console);

        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let v = victim.clone();
        let _canceller = first.subscribe(move |_| {
            if let Some(sub) = v.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h = hits.clone();
        *victim.borrow_mut() = Some(second.subscribe(move |e| h.borrow_mut().push(e.to_string())));

        let button = trigger(&event_loop);
        assert_eq!(button.listener_count("click"), 2);
        assert_eq!(button.click(57, 148, event_loop.now_ms()), 1);

        assert!(!second.is_attached());
        assert_eq!(button.listener_count("click"), 1);
        assert!(hits.borrow().is_empty());
        assert_eq!(memory.lines(), vec![DIAGNOSTIC_LINE]);
    }

    #[test]
    fn test_missing_element_fails_without_attaching() {
        let (event_loop, _inbox) =
            EventLoop::with_inbox(Document::with_trigger_button(), Clock::manual());
        let console = Rc::new(MemoryConsole::new());
        let config = DemoConfig {
            selector: "button#missing".into(),
            ..DemoConfig::default()
        };

        let err = demo::run(event_loop.document(), &event_loop.timer(), console, &config).unwrap_err();

        assert!(matches!(err, BridgeError::InvalidTarget { .. }));
        assert_eq!(trigger(&event_loop).listener_count("click"), 0);
        assert_eq!(event_loop.pending_timers(), 0);
    }

    #[test]
    fn test_inbox_clicks_through_run() {
        let (event_loop, inbox) =
            EventLoop::with_inbox(Document::with_trigger_button(), Clock::manual());
        let console = Rc::new(MemoryConsole::new());
        let _handle =
            demo::run(event_loop.document(), &event_loop.timer(), console.clone(), &DemoConfig::default())
                .unwrap();

        pump_lines("click 1 2\n3 4\n".as_bytes(), "button#trigger", &inbox);
        drop(inbox);
        event_loop.run().unwrap();

        assert_eq!(
            console.lines(),
            vec![DIAGNOSTIC_LINE, "click 1 2", DIAGNOSTIC_LINE, "click 3 4", UNSUBSCRIBE_LINE]
        );
    }
}
