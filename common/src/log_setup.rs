use std::path::PathBuf;
use std::sync::OnceLock;

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use serde::{Deserialize, Serialize};

static LOGGER_HANDLE: OnceLock<LoggerHandle> = OnceLock::new();

const LOG_FILE_SIZE: u64 = 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;

/// Logging options handed to a process entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// flexi_logger level spec, e.g. `info` or `warn, smfish=debug`.
    pub level: String,
    /// When set, records also go to rotated files in this directory.
    pub directory: Option<PathBuf>,
    pub file_basename: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_basename: "smfish".to_string(),
        }
    }
}

pub fn setup_logging(settings: &LogSettings) -> anyhow::Result<()> {
    if LOGGER_HANDLE.get().is_some() {
        anyhow::bail!("Logging already initialized");
    }

    let logger = Logger::try_with_str(&settings.level)?;
    let logger = match &settings.directory {
        Some(directory) => logger
            .log_to_file(
                FileSpec::default()
                    .directory(directory)
                    .basename(&settings.file_basename),
            )
            .duplicate_to_stderr(Duplicate::Warn)
            .duplicate_to_stdout(Duplicate::All)
            .rotate(
                Criterion::Size(LOG_FILE_SIZE),
                Naming::Timestamps,
                Cleanup::KeepLogFiles(KEEP_LOG_FILES),
            ),
        None => logger.log_to_stdout(),
    };

    let handle = logger.start()?;
    if LOGGER_HANDLE.set(handle).is_err() {
        anyhow::bail!("Logging already initialized");
    }

    log::debug!("Logging initialized with level '{}'", settings.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_log_to_stdout() {
        let settings = LogSettings::default();
        assert_eq!(settings.level, "info");
        assert!(settings.directory.is_none());
    }

    #[test]
    fn settings_parse_with_partial_fields() {
        let settings: LogSettings = serde_json::from_str(r#"{"level": "debug"}"#).unwrap();
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.file_basename, "smfish");
    }

    #[test]
    fn setup_logging_writes_to_directory_once() {
        let directory = std::env::temp_dir().join(format!("smfish-log-{}", std::process::id()));
        let settings = LogSettings {
            level: "debug".to_string(),
            directory: Some(directory.clone()),
            file_basename: "detect".to_string(),
        };

        setup_logging(&settings).unwrap();
        log::info!("logging started");
        if let Some(handle) = LOGGER_HANDLE.get() {
            handle.flush();
        }

        let files: Vec<_> = std::fs::read_dir(&directory)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("detect"))
            .collect();
        assert!(!files.is_empty(), "no log file in {}", directory.display());

        assert!(setup_logging(&settings).is_err(), "second setup must fail");
        let _ = std::fs::remove_dir_all(&directory);
    }
}
