//! hotclick: native host for the trigger-button demo.
//!
//! Clicks arrive as `click <x> <y>` lines on stdin or from the configured
//! script; each one is dispatched to `button#trigger` on the loop thread.

mod config;
mod logging;

use anyhow::Context;
use hotclick_core::{demo, ConsoleKind, ConsoleSink, DemoConfig, StdoutConsole, TracingConsole};
use hotclick_platform::{spawn_stdin_reader, Clock, Document, EventLoop};
use std::rc::Rc;
use tracing::{error, info, warn};

fn main() {
    let loaded = config::load();
    logging::setup(&loaded.config.logging);

    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    info!(source = ?loaded.source, "Configuration loaded");

    if let Err(e) = run(&loaded.config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn console_sink(kind: ConsoleKind) -> Rc<dyn ConsoleSink> {
    match kind {
        ConsoleKind::Stdout => Rc::new(StdoutConsole),
        ConsoleKind::Tracing => Rc::new(TracingConsole),
    }
}

fn run(config: &DemoConfig) -> anyhow::Result<()> {
    let (event_loop, inbox) =
        EventLoop::with_inbox(Document::with_trigger_button(), Clock::real());
    let timer = event_loop.timer();
    let console = console_sink(config.logging.console);

    let handle = demo::run(event_loop.document(), &timer, console, config)
        .context("failed to start demo")?;

    for click in &config.script {
        event_loop.schedule_click(&config.selector, *click);
    }

    if config.interactive {
        info!("Type `click <x> <y>` to click {}, `quit` to exit", config.selector);
        let _reader = spawn_stdin_reader(config.selector.clone(), inbox);
    } else {
        drop(inbox);
    }

    event_loop.run().context("event loop failed")?;
    info!(
        subscribed = handle.subscription().is_active(),
        "Demo finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_console_lines_go_through_logger() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            console_sink(ConsoleKind::Tracing).log("click 57 148");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("hotclick::console"), "{}", output);
        assert!(output.contains("click 57 148"), "{}", output);
    }

    #[test]
    fn test_stdout_console_bypasses_logger() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            console_sink(ConsoleKind::Stdout).log("click 1 2");
        });

        assert!(captured.0.lock().unwrap().is_empty());
    }
}
