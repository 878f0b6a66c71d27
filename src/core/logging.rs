//! Logging setup.
//!
//! A human-readable stderr layer, plus an optional JSON file layer rolling
//! daily. `RUST_LOG` overrides the configured level. `log` records from
//! dependencies are forwarded to `tracing` by the subscriber's own bridge.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_NAME: &str = "prevnet.log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for the JSON log file; no file layer when unset.
    pub json_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_dir: None,
        }
    }
}

impl LoggingConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Build the layered subscriber without installing it.
///
/// The second value is the file writer's `WorkerGuard`, present when a JSON
/// file layer is configured.
pub fn subscriber(config: &LoggingConfig) -> (impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>) {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(config.filter());

    let (file_layer, guard) = match &config.json_dir {
        Some(dir) => {
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("Failed to create log directory {}: {}", dir.display(), e);
            }
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_filter(config.filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry().with(stderr_layer).with(file_layer);
    (subscriber, guard)
}

/// Install the global subscriber.
///
/// Returns the file writer's `WorkerGuard` when a JSON file layer is set up;
/// keep it alive until shutdown so buffered lines are flushed. Calling this
/// twice leaves the first subscriber in place.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (subscriber, guard) = subscriber(config);
    match subscriber.try_init() {
        Ok(()) => {
            tracing::debug!(level = %config.level, json_dir = ?config.json_dir, "logging initialized");
            guard
        }
        Err(_) => None,
    }
}
