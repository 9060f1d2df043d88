//! Logging initialization for the harness binary.
//!
//! The library only emits `tracing` events; the binary installs one global
//! subscriber that writes them to the harness log file, and also to stderr
//! in verbose mode. `RUST_LOG` overrides the configured level.

use anyhow::{Context, Result};
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{HarnessConfig, LOG_CRITICAL, LOG_DEBUG, LOG_WARNING};

/// Map a numeric harness log level to a `tracing` filter directive
pub fn level_directive(level: u8) -> &'static str {
    match level {
        0 => "off",
        l if l <= LOG_CRITICAL => "error",
        l if l <= LOG_WARNING => "warn",
        l if l < LOG_DEBUG => "info",
        _ => "debug",
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called once, before the suite runs.
pub fn init_logging(config: &HarnessConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(config.log_level)));

    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false);

    let stderr_layer = config
        .verbose
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    Ok(())
}
