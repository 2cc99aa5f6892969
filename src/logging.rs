//! File logging setup
//!
//! The terminal belongs to the UI, so log output goes to `nearby.log` in the
//! platform data directory (`~/.local/share/nearby/` on Linux).

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Name of the log file inside the log directory
const LOG_FILE_NAME: &str = "nearby.log";

/// Default directory for the log file, if the platform has one
pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nearby").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Opens (creating if needed) the log file inside `dir`
fn open_log_file(dir: &Path) -> std::io::Result<(fs::File, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Installs the global tracing subscriber writing to `dir/nearby.log`
///
/// # Arguments
/// * `dir` - Directory for the log file
/// * `filter` - An `EnvFilter` directive such as "info" or "nearby=debug"
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the log file
/// * `Err` - If the file cannot be created or the filter is invalid
pub fn init(dir: &Path, filter: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let (file, path) = open_log_file(dir)?;
    let env_filter = EnvFilter::try_new(filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    Ok(path)
}
