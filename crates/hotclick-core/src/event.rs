//! Click events as observed from the host platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event type name for pointer clicks.
pub const CLICK: &str = "click";

/// Mouse button that produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
    Other(i16),
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code.
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            other => MouseButton::Other(other),
        }
    }
}

/// An immutable click record produced by the platform.
///
/// The bridge never modifies it; subscribers receive exactly what the
/// platform dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Event type name, e.g. `"click"`.
    pub event_type: String,
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
    /// Host timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl ClickEvent {
    /// A left-button click at `(x, y)`.
    pub fn click(x: i32, y: i32) -> Self {
        Self {
            event_type: CLICK.into(),
            x,
            y,
            button: MouseButton::Left,
            timestamp_ms: 0,
        }
    }

    pub fn at_ms(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Formats as `<type> <x> <y>`, the line the demo logs per click.
impl fmt::Display for ClickEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.event_type, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_console_format() {
        assert_eq!(ClickEvent::click(57, 148).to_string(), "click 57 148");
    }

    #[test]
    fn test_dom_button_codes() {
        assert_eq!(MouseButton::from_dom(0), MouseButton::Left);
        assert_eq!(MouseButton::from_dom(1), MouseButton::Middle);
        assert_eq!(MouseButton::from_dom(2), MouseButton::Right);
        assert_eq!(MouseButton::from_dom(4), MouseButton::Other(4));
    }
}
