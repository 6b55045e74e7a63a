//! Logging initialization.
//!
//! Thin wrapper over the workspace `observability` package: every roster
//! process logs under the `roster` service name, to stderr, and optionally
//! to a JSONL file.

use std::path::PathBuf;

/// Service name stamped on every JSONL line.
const SERVICE_NAME: &str = "roster";

/// Initialize logging.
///
/// * `level` - default level when `RUST_LOG` is unset
/// * `log_file` - JSONL output file, or `None` for stderr only
///
/// ```ignore
/// init_logging("info", Some(paths.log_file()));
/// tracing::info!("roster started");
/// ```
pub fn init_logging(level: &str, log_file: Option<PathBuf>) {
    observability::init_with_config(observability::LogConfig {
        service_name: SERVICE_NAME.into(),
        default_level: parse_level(level).as_str().to_ascii_lowercase(),
        log_path: log_file,
        also_stderr: true,
    });
}

/// Parse a log level string into a tracing Level. Unknown values mean INFO.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
