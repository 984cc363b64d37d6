use media_finder::AppConfig;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LEVEL_VAR: &str = "TRACING_LEVEL";
const FILE_VAR: &str = "LOG_FILE_PATH";

/// Filter directive and log file for this run. Environment variables win
/// over `Config.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub file: PathBuf,
}

impl LogSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::resolve(config, env::var(LEVEL_VAR).ok(), env::var(FILE_VAR).ok())
    }

    fn resolve(config: &AppConfig, level: Option<String>, file: Option<String>) -> Self {
        let level = level
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| config.log_level.clone());
        let file = file
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| config.log_file.clone());
        Self {
            level,
            file: PathBuf::from(file),
        }
    }

    /// The appender takes the directory and file name separately.
    fn split(&self) -> (PathBuf, OsString) {
        let dir = self
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let name = self
            .file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("finder.log"));
        (dir, name)
    }
}

/// Compact lines on stdout next to the progress bars; the file gets thread
/// ids so rayon workers can be told apart.
pub fn init_logger(settings: &LogSettings) -> WorkerGuard {
    let (dir, name) = settings.split();
    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .compact()
                .with_target(false)
                .without_time(),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_thread_ids(true),
        )
        .with(EnvFilter::new(&settings.level))
        .init();

    info!(
        "media-finder {} logging at '{}' to {}",
        env!("CARGO_PKG_VERSION"),
        settings.level,
        settings.file.display()
    );

    guard
}
