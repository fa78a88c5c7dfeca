use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const APP_DIR_NAME: &str = "rusty-snake";
const LOG_FILE_NAME: &str = "rusty-snake.log";
const DEFAULT_FILTER: &str = "info";

/// Where diagnostic output goes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LogTarget {
    Off,
    /// Only usable when the terminal is not owned by the UI.
    Stderr,
    File(PathBuf),
}

/// Returns the platform-correct default log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Installs the global `tracing` subscriber for `target`.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(target: &LogTarget) -> io::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let installed = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
    };

    installed.map_err(io::Error::other)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    File::options().create(true).append(true).open(path)
}
