//! Logging setup for hosts embedding the GroupPolicy client
//!
//! The library only emits `tracing` events. Hosts that want them on disk call
//! [`init_logging`] once and keep the returned guard alive.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "grouppolicy.log";

/// Get the directory containing the executable
fn get_executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Initialize logging to grouppolicy.log in the executable's directory.
///
/// Returns a guard that must be kept alive for the duration of the program
/// to ensure all logs are flushed to disk.
pub fn init_logging() -> WorkerGuard {
    init_logging_in(&get_executable_dir())
}

/// Initialize logging to grouppolicy.log in `log_dir`.
pub fn init_logging_in(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A host may already own the global subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_created_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init_logging_in(dir.path());
        tracing::info!("logging initialized");
        drop(guard);

        assert!(dir.path().join(LOG_FILE_NAME).is_file());
    }
}
