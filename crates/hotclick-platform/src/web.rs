//! Browser host (wasm32): the real DOM, `setTimeout`, and `console.log`.

use hotclick_core::{
    demo, ClickEvent, ConsoleSink, DemoConfig, EventTarget, Listener, ListenerId, MouseButton,
    TargetLocator, TimerId, TimerService, TimerTask,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};

type DomCallback = Closure<dyn FnMut(web_sys::MouseEvent)>;

/// `document.querySelector` on the current window.
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

impl TargetLocator for WebDocument {
    type Target = WebElement;

    fn query_selector(&self, selector: &str) -> Option<WebElement> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(WebElement::new),
            Err(err) => {
                warn!(?err, selector, "querySelector failed");
                None
            }
        }
    }
}

/// A DOM element. Keeps the JS closures alive while they are registered.
#[derive(Clone)]
pub struct WebElement {
    element: web_sys::Element,
    callbacks: Rc<RefCell<HashMap<ListenerId, DomCallback>>>,
    // Closures removed while one of them may still be on the stack.
    retired: Rc<RefCell<Vec<DomCallback>>>,
    dispatching: Rc<Cell<u32>>,
    next_id: Rc<Cell<u64>>,
}

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self {
            element,
            callbacks: Rc::new(RefCell::new(HashMap::new())),
            retired: Rc::new(RefCell::new(Vec::new())),
            dispatching: Rc::new(Cell::new(0)),
            next_id: Rc::new(Cell::new(1)),
        }
    }

    fn collect_retired(&self) {
        if self.dispatching.get() == 0 {
            self.retired.borrow_mut().clear();
        }
    }
}

fn to_click_event(event: &web_sys::MouseEvent) -> ClickEvent {
    ClickEvent {
        event_type: event.type_(),
        x: event.x(),
        y: event.y(),
        button: MouseButton::from_dom(event.button()),
        timestamp_ms: event.time_stamp() as u64,
    }
}

impl EventTarget for WebElement {
    fn add_listener(&self, event_name: &str, listener: Listener) -> ListenerId {
        self.collect_retired();
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let depth = self.dispatching.clone();
        let callback: DomCallback = Closure::new(move |event: web_sys::MouseEvent| {
            depth.set(depth.get() + 1);
            listener(&to_click_event(&event));
            depth.set(depth.get() - 1);
        });

        if let Err(err) = self
            .element
            .add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
        {
            error!(?err, event_name, "addEventListener failed");
        }
        self.callbacks.borrow_mut().insert(id, callback);
        debug!(event_name, listener = id.0, "addEventListener");
        id
    }

    fn remove_listener(&self, event_name: &str, id: ListenerId) -> bool {
        let Some(callback) = self.callbacks.borrow_mut().remove(&id) else {
            return false;
        };
        let removed = self
            .element
            .remove_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
            .is_ok();
        debug!(event_name, listener = id.0, removed, "removeEventListener");

        self.retired.borrow_mut().push(callback);
        self.collect_retired();
        removed
    }
}

/// `window.setTimeout` / `window.clearTimeout`.
pub struct WindowTimer {
    window: web_sys::Window,
    // Handles that have neither fired nor been cleared.
    pending: Rc<RefCell<HashSet<i32>>>,
}

impl WindowTimer {
    pub fn from_window() -> Option<Self> {
        Some(Self {
            window: web_sys::window()?,
            pending: Rc::new(RefCell::new(HashSet::new())),
        })
    }
}

impl TimerService for WindowTimer {
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> TimerId {
        let handle_slot = Rc::new(Cell::new(0));
        let slot = handle_slot.clone();
        let pending = self.pending.clone();
        let callback = Closure::once_into_js(move || {
            pending.borrow_mut().remove(&slot.get());
            task();
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref::<js_sys::Function>(),
                millis,
            ) {
            Ok(handle) => {
                handle_slot.set(handle);
                self.pending.borrow_mut().insert(handle);
                TimerId(handle as u64)
            }
            Err(err) => {
                error!(?err, "setTimeout failed");
                TimerId(0)
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        let handle = id.0 as i32;
        if !self.pending.borrow_mut().remove(&handle) {
            return false;
        }
        self.window.clear_timeout_with_handle(handle);
        true
    }
}

/// `console.log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserConsole;

impl ConsoleSink for BrowserConsole {
    fn log(&self, line: &str) {
        web_sys::console::log_1(&JsValue::from_str(line));
    }
}

/// Entry point: run the trigger-button demo on the current page.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let document = WebDocument::from_window().ok_or_else(|| JsValue::from_str("no document"))?;
    let timer = WindowTimer::from_window().ok_or_else(|| JsValue::from_str("no window"))?;
    let console: Rc<dyn ConsoleSink> = Rc::new(BrowserConsole);

    // The page's timer and listener closures own the subscription from here on.
    demo::run(&document, &timer, console, &DemoConfig::default())
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
