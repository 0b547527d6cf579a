//! Log output setup
//!
//! The terminal belongs to the UI, so logs go to `pokedex.log` in the cache
//! directory instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name of the log inside the cache directory
pub const LOG_FILE_NAME: &str = "pokedex.log";

/// Environment variable holding a filter directive
pub const LOG_ENV_VAR: &str = "POKEDEX_LOG";

/// Builds the filter: explicit level, then `POKEDEX_LOG`, then `info`
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Installs the global subscriber writing to `<dir>/pokedex.log`
///
/// Returns the log path, or `None` when there is no directory, the file
/// cannot be opened, or a subscriber is already installed. Logging is then
/// simply disabled.
pub fn init(dir: Option<&Path>, level: Option<&str>) -> Option<PathBuf> {
    let dir = dir?;
    let (file, path) = open_log_file(dir).ok()?;

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .compact()
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok()?;

    Some(path)
}

fn open_log_file(dir: &Path) -> std::io::Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}
