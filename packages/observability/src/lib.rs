//! # Observability
//!
//! Centralized logging setup for the roster workspace.
//!
//! ## Design Philosophy
//!
//! Crates are **log producers**. Library code only uses `tracing` macros;
//! binaries call [`init`] or [`init_with_config`] once at startup and decide
//! where the output goes:
//!
//! - Structured JSONL to a file (one object per line, see [`json_layer`])
//! - Compact human-readable lines on stderr
//!
//! The level filter comes from `RUST_LOG` when set, otherwise from
//! [`LogConfig::default_level`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "roster".into(),
//!         default_level: "debug".into(),
//!         also_stderr: true,
//!         ..Default::default()
//!     });
//!
//!     tracing::info!("ready");
//! }
//! ```

mod file_sink;
pub mod json_layer;

use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::file_sink::{CentralLogWriter, WriterFactory};
use crate::json_layer::JsonLayer;

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g., "roster").
    /// Included in every JSONL line for filtering.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// JSONL log file. `None` disables the file layer.
    pub log_path: Option<PathBuf>,

    /// Also emit compact logs to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Initialize logging with default settings (stderr only).
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize logging with custom configuration.
///
/// Installing a global subscriber twice is ignored, so tests and binaries can
/// both call this. If the log file cannot be opened the file layer is skipped
/// and a warning is written to the remaining layers.
pub fn init_with_config(config: LogConfig) {
    let (file_layer, open_error) = match config.log_path.as_ref() {
        Some(path) => match CentralLogWriter::new(path) {
            Ok(writer) => (
                Some(
                    JsonLayer::new(config.service_name.clone(), WriterFactory::new(writer))
                        .with_filter(env_filter(&config.default_level)),
                ),
                None,
            ),
            Err(e) => (None, Some((path.clone(), e))),
        },
        None => (None, None),
    };

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(env_filter(&config.default_level))
    });

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    match (config.log_path, open_error) {
        (_, Some((path, e))) => {
            tracing::warn!(log_path = %path.display(), error = %e, "failed to open log file");
        }
        (Some(path), None) => {
            tracing::debug!(log_path = %path.display(), "observability initialized");
        }
        (None, None) => {}
    }
}

/// Build an env filter from `RUST_LOG`, falling back to `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;
