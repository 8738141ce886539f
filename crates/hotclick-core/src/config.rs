//! Demo configuration, read from YAML.
//!
//! Every field has a default, so a partial file only overrides what it names.

use crate::{BridgeOptions, ConfigError, CLICK};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Selector of the element to bridge.
    pub selector: String,
    /// Platform event type to listen for.
    pub event_name: String,
    /// Log `Event callback executed!` for every platform event.
    pub diagnostic: bool,
    /// Delay before the demo unsubscribes on its own.
    pub unsubscribe_after_ms: u64,
    /// Clicks replayed by the native host, relative to start.
    pub script: Vec<ScriptedClick>,
    /// Read clicks from stdin (native host only).
    pub interactive: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedClick {
    pub at_ms: u64,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Also write logs to a daily rolling file.
    pub file: bool,
    /// Where the demo's console lines go.
    pub console: ConsoleKind,
}

/// Destination for the demo's console lines in the native host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    /// Plain lines on stdout.
    #[default]
    Stdout,
    /// `info` events under the `hotclick::console` target.
    Tracing,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            selector: "button#trigger".into(),
            event_name: CLICK.into(),
            diagnostic: true,
            unsubscribe_after_ms: 5000,
            script: Vec::new(),
            interactive: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: false,
            console: ConsoleKind::Stdout,
        }
    }
}

impl DemoConfig {
    /// Parse and validate a YAML document. Missing fields take defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selector.trim().is_empty() {
            return Err(ConfigError::Invalid("selector must not be empty".into()));
        }
        if self.event_name.trim().is_empty() {
            return Err(ConfigError::Invalid("event_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn bridge_options(&self) -> BridgeOptions {
        BridgeOptions {
            event_name: self.event_name.clone(),
            diagnostic: self.diagnostic,
        }
    }

    pub fn unsubscribe_after(&self) -> Duration {
        Duration::from_millis(self.unsubscribe_after_ms)
    }
}
