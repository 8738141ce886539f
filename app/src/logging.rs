//! Logging infrastructure with optional file output.
//!
//! Diagnostics go to stderr so stdout only carries the demo's console lines.

use crate::config::paths;
use hotclick_core::LoggingConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset.
fn default_directives(level: &str) -> String {
    format!(
        "hotclick={level},hotclick_core={level},hotclick_platform={level}",
        level = level
    )
}

/// Initialize logging with stderr and optional daily rolling file output.
///
/// Log files go to `<config dir>/hotclick/logs/`.
pub fn setup(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let file_layer = if config.file {
        let log_dir = paths::log_dir();

        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
            None
        } else {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "hotclick.log");

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .with_filter(EnvFilter::new(default_directives(&config.level))),
            )
        }
    } else {
        None
    };

    match file_layer {
        Some(file_layer) => {
            tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .init();
            tracing::info!("File logging enabled: {:?}", paths::log_dir());
        }
        None => {
            tracing_subscriber::registry().with(console_layer).init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_all_crates() {
        assert_eq!(
            default_directives("debug"),
            "hotclick=debug,hotclick_core=debug,hotclick_platform=debug"
        );
    }
}
