//! Logging initialization for the client.
//!
//! Every binary in the workspace calls [`init_logging`] once at startup. Logs
//! go to the structured JSONL file under `~/.pawnrepo/logs/` through the
//! observability crate, optionally mirrored to stderr.

use crate::Paths;

/// Initialize the logging system.
///
/// This sets up tracing with:
/// - Structured JSONL output to `paths.log_file()`
/// - Log level from RUST_LOG env var or the provided default
/// - Service name included in every log line
///
/// # Example
///
/// ```ignore
/// init_logging("cli", "info", &paths, false);
/// tracing::info!("Client started");
/// ```
pub fn init_logging(service_name: &str, level: &str, paths: &Paths, also_stderr: bool) {
    observability::init_with_config(observability::LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr,
    });
}
