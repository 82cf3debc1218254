//! Tracing setup: human-readable stderr output plus a rotating log file.

use std::path::Path;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_PREFIX: &str = "ctools";
const LOG_FILES_KEPT: usize = 7;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live until
/// the process exits. `RUST_LOG` overrides the verbosity flags.
pub fn init(verbosity: u8, quiet: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let stderr_level = if quiet { "error" } else { level };

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(stderr_level));

    let (file, guard, file_error) = match file_appender(log_dir) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter(level));
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry().with(stderr).with(file).init();

    if let Some(e) = file_error {
        warn!(dir = %log_dir.display(), error = %e, "file logging disabled");
    }
    guard
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,ctools={level},ctools_core={level},ctools_api={level}"
        ))
    })
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .max_log_files(LOG_FILES_KEPT)
        .build(dir)
        .map_err(|e| e.to_string())
}
