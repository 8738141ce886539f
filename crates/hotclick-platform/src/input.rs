//! Line-based click input for the native host.
//!
//! Accepted lines:
//! - `click <x> <y>` or `<x> <y>` - click the bridged element
//! - `quit` / `exit` - stop the event loop
//! - blank lines and `#` comments are ignored

use crate::{LoopInput, PlatformError, PlatformResult};
use crossbeam_channel::Sender;
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Parse one input line. `Ok(None)` means nothing to do.
pub fn parse_line(line: &str, selector: &str) -> PlatformResult<Option<LoopInput>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let coords = match parts.as_slice() {
        ["quit"] | ["exit"] => return Ok(Some(LoopInput::Shutdown)),
        ["click", x, y] | [x, y] => (*x, *y),
        _ => return Err(PlatformError::InvalidInput(line.to_string())),
    };

    let parse = |s: &str| {
        s.parse::<i32>()
            .map_err(|_| PlatformError::InvalidInput(line.to_string()))
    };
    Ok(Some(LoopInput::Click {
        selector: selector.to_string(),
        x: parse(coords.0)?,
        y: parse(coords.1)?,
    }))
}

/// Forward lines from `reader` into the loop inbox until EOF, `quit`, or the
/// loop goes away.
pub fn pump_lines<R: BufRead>(reader: R, selector: &str, inbox: &Sender<LoopInput>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        match parse_line(&line, selector) {
            Ok(Some(input)) => {
                let shutdown = input == LoopInput::Shutdown;
                if inbox.send(input).is_err() || shutdown {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("{} (expected `click <x> <y>`, `<x> <y>` or `quit`)", e),
        }
    }
}

/// Spawn a thread that reads clicks from stdin.
///
/// Dropping the sender at EOF lets the loop finish once its timers are done.
pub fn spawn_stdin_reader(selector: String, inbox: Sender<LoopInput>) -> JoinHandle<()> {
    thread::spawn(move || {
        info!("Stdin reader started");
        pump_lines(std::io::stdin().lock(), &selector, &inbox);
        info!("Stdin reader exiting");
    })
}
