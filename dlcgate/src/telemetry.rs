//! Tracing subscriber setup.
//!
//! Log verbosity is controlled through `RUST_LOG`; callers pass a default
//! filter used when the variable is unset. Both initializers are safe to
//! call more than once (later calls are no-ops).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Log to stderr with local timestamps.
pub fn init(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_timer(LocalTime::rfc_3339())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a daily-rolled file in `log_dir`.
///
/// Returns the appender guard; dropping it stops the background writer, so
/// hold it for the lifetime of the process. Returns `None` when a
/// subscriber was already installed.
pub fn init_with_file(log_dir: &Path, default_filter: &str) -> Option<WorkerGuard> {
    let appender = tracing_appender::rolling::daily(log_dir, "dlcgate.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}
