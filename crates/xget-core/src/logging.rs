//! Logging init for the xget host.
//!
//! Events go to an append-only log under the XDG state dir (or `$XGET_LOG`);
//! the binary falls back to stderr when that file cannot be opened. The
//! filter comes from `RUST_LOG`, defaulting to debug for the xget crates.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,xget=debug,xget_core=debug";

/// Environment variable overriding the log file location.
pub const LOG_PATH_ENV: &str = "XGET_LOG";

/// One file handle shared by every event; `&File` writes need no lock.
struct LogFile(File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.0
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XGET_LOG` if set, else `~/.local/state/xget/xget.log`.
pub fn log_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(LOG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xget")?;
    Ok(xdg_dirs.get_state_home().join("xget").join("xget.log"))
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log dir: {}", parent.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log: {}", path.display()))
}

/// Log to the file from [`log_path`]. Returns the path in use; on `Err` the
/// caller should fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(LogFile(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {e}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "xget logging to {}", path.display());
    Ok(path)
}

/// Stderr-only logging, for when the log file is unavailable.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_log_creates_dirs_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("xget").join("xget.log");
        writeln!(open_log(&path).unwrap(), "first").unwrap();
        writeln!(open_log(&path).unwrap(), "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
