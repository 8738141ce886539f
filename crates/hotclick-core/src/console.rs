//! Write-only sinks for user-facing console lines.
//!
//! These are the lines the demo prints (`Event callback executed!`,
//! `click 57 148`, `Unsubscribe`). Internal diagnostics go through `tracing`
//! directly and never through a sink.

use std::cell::RefCell;
use std::io::Write;

pub trait ConsoleSink {
    fn log(&self, line: &str);
}

/// Prints each line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl ConsoleSink for StdoutConsole {
    fn log(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line) {
            tracing::warn!("Failed to write console line: {}", e);
        }
    }
}

/// Routes each line through `tracing` under the `hotclick::console` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn log(&self, line: &str) {
        tracing::info!(target: "hotclick::console", "{}", line);
    }
}

/// Records lines in memory.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: RefCell<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Take everything logged so far, leaving the sink empty.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

impl ConsoleSink for MemoryConsole {
    fn log(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
