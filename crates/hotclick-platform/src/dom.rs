//! In-memory document for native hosts and tests.
//!
//! Supports just enough of the DOM for the bridge: elements with a tag and
//! an optional id, simple selectors (`tag`, `#id`, `tag#id`), and per-element
//! listener registration and dispatch.

use crate::{PlatformError, PlatformResult};
use hotclick_core::{ClickEvent, EventTarget, Listener, ListenerId, TargetLocator};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// A parsed simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
}

impl Selector {
    pub fn parse(input: &str) -> PlatformResult<Self> {
        let invalid = || PlatformError::InvalidSelector(input.to_string());
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let (tag, id) = match trimmed.split_once('#') {
            Some((tag, id)) => (tag, Some(id)),
            None => (trimmed, None),
        };

        let is_name = |s: &str| {
            !s.is_empty()
                && s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if !tag.is_empty() && !is_name(tag) {
            return Err(invalid());
        }
        if let Some(id) = id {
            if !is_name(id) {
                return Err(invalid());
            }
        }

        Ok(Self {
            tag: (!tag.is_empty()).then(|| tag.to_ascii_lowercase()),
            id: id.map(str::to_string),
        })
    }

    pub fn matches(&self, element: &Element) -> bool {
        let tag_ok = self.tag.as_deref().map_or(true, |t| t == element.tag());
        let id_ok = self
            .id
            .as_deref()
            .map_or(true, |id| element.id() == Some(id));
        tag_ok && id_ok
    }
}

struct Registration {
    event_name: String,
    id: ListenerId,
    listener: Listener,
}

struct ElementInner {
    tag: String,
    id: Option<String>,
    listeners: RefCell<Vec<Registration>>,
    next_listener: Cell<u64>,
}

/// A document element. Clones refer to the same element.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    pub fn new(tag: &str, id: Option<&str>) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                tag: tag.to_ascii_lowercase(),
                id: id.map(str::to_string),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(1),
            }),
        }
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    /// Number of listeners registered for `event_name`.
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.event_name == event_name)
            .count()
    }

    /// Deliver `event` to every listener registered for its type.
    ///
    /// Listeners added during the dispatch are not called; listeners removed
    /// during it are skipped. Returns how many listeners were invoked.
    pub fn dispatch(&self, event: &ClickEvent) -> usize {
        let snapshot: Vec<(ListenerId, Listener)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.event_name == event.event_type)
            .map(|r| (r.id, r.listener.clone()))
            .collect();

        let mut invoked = 0;
        for (id, listener) in &snapshot {
            if !self.is_registered(&event.event_type, *id) {
                continue;
            }
            listener(event);
            invoked += 1;
        }
        invoked
    }

    fn is_registered(&self, event_name: &str, id: ListenerId) -> bool {
        self.inner
            .listeners
            .borrow()
            .iter()
            .any(|r| r.id == id && r.event_name == event_name)
    }

    /// Simulate a left click at `(x, y)`.
    pub fn click(&self, x: i32, y: i32, timestamp_ms: u64) -> usize {
        self.dispatch(&ClickEvent::click(x, y).at_ms(timestamp_ms))
    }
}

impl EventTarget for Element {
    fn add_listener(&self, event_name: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(Registration {
            event_name: event_name.to_string(),
            id,
            listener,
        });
        debug!(element = %self, event_name, listener = id.0, "addEventListener");
        id
    }

    fn remove_listener(&self, event_name: &str, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|r| !(r.id == id && r.event_name == event_name));
        let removed = listeners.len() != before;
        debug!(element = %self, event_name, listener = id.0, removed, "removeEventListener");
        removed
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}#{}", self.tag(), id),
            None => write!(f, "{}", self.tag()),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.inner.tag)
            .field("id", &self.inner.id)
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

/// A flat list of elements. Clones refer to the same document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Rc<RefCell<Vec<Element>>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo page: a single `button#trigger`.
    pub fn with_trigger_button() -> Self {
        let document = Self::new();
        document
            .elements
            .borrow_mut()
            .push(Element::new("button", Some("trigger")));
        document
    }

    pub fn create_element(&self, tag: &str, id: Option<&str>) -> PlatformResult<Element> {
        let mut elements = self.elements.borrow_mut();
        if let Some(id) = id {
            if elements.iter().any(|e| e.id() == Some(id)) {
                return Err(PlatformError::DuplicateId(id.to_string()));
            }
        }
        let element = Element::new(tag, id);
        elements.push(element.clone());
        Ok(element)
    }

    /// First element matching `selector`, in insertion order.
    pub fn find(&self, selector: &str) -> Option<Element> {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };
        self.elements
            .borrow()
            .iter()
            .find(|e| selector.matches(e))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }
}

impl TargetLocator for Document {
    type Target = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.find(selector)
    }
}
