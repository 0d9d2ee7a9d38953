/// Log setup: tracing to a timestamped file under `<data dir>/logs/`.
///
/// The terminal belongs to the renderer, so there is no console layer.
/// Level comes from `HIDESEEK_LOG`, then `RUST_LOG`, default `info`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const APP_ID: &str = "hideseek";
pub const LOG_ENV: &str = "HIDESEEK_LOG";

/// `logs/hideseek.<YYYYmmdd-HHMMSS>.log` under `data_dir`.
pub fn log_file_path(data_dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    data_dir.join("logs").join(format!("{APP_ID}.{timestamp}.log"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the guard that flushes the
/// background writer on drop, or `None` if logging could not be set up.
pub fn init(data_dir: &Path) -> Option<WorkerGuard> {
    let log_file = log_file_path(data_dir);
    let log_dir = log_file.parent()?;
    let log_name = log_file.file_name()?;
    fs::create_dir_all(log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::default()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init()
        .ok()?;

    Some(guard)
}
