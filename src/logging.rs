//! File logging. The terminal belongs to the TUI, so log output goes to
//! rotated files under `<data_dir>/logs`.

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "daybook";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Directory holding log files
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Validate a plain level name, lowercased
fn normalize_level(level: &str) -> Result<String> {
    let normalized = level.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(normalized),
        _ => anyhow::bail!("unsupported log level `{}`", level),
    }
}

/// Start the file logger. Keep the returned handle alive for the whole
/// process; dropping it flushes and stops logging.
pub fn init_logging(level: &str, dir: &Path) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory `{}`", dir.display()))?;

    let handle = Logger::try_with_str(&level)
        .with_context(|| format!("invalid log level `{}`", level))?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    log::info!(
        "event=app_start version={} platform={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        level,
        dir.display()
    );

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level(" INFO ").unwrap(), "info");
        assert_eq!(normalize_level("debug").unwrap(), "debug");
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn test_log_dir_is_inside_data_dir() {
        let dir = log_dir(Path::new("/tmp/daybook"));
        assert_eq!(dir, PathBuf::from("/tmp/daybook/logs"));
    }
}
