//! Logging system configuration and initialization
//!
//! - Console and/or file output, optionally JSON formatted
//! - The previous log file is renamed with its timestamp on startup
//! - Rotated files beyond `max_files` are cleaned up
//! - `RUST_LOG` overrides the configured filter

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use tracing::{info, warn};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::Directive,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the life of the process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> = Mutex::new(Vec::new());
}

/// Dependencies that are quieted unless the level is trace
const QUIET_TARGETS: &[(&str, &str)] = &[
    ("reqwest", "info"),
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("h2", "warn"),
    ("html5ever", "warn"),
    ("selectors", "warn"),
    ("governor", "warn"),
];

/// Local wall-clock timestamps with milliseconds and offset
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// `logs/` next to the executable, or the configured directory
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(dir) = &config.log_dir {
        return dir.clone();
    }
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
        .join("logs")
}

/// Rename an existing log file to `{stem}.{timestamp}.log`. Returns the new name.
fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<Option<String>> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(None);
    }

    let metadata = std::fs::metadata(&log_file_path).map_err(|e| anyhow!("Failed to get log file metadata: {}", e))?;
    let file_time = metadata
        .modified()
        .or_else(|_| metadata.created())
        .unwrap_or_else(|_| std::time::SystemTime::now());
    let stamp: DateTime<Local> = file_time.into();

    let file_stem = log_file_name.trim_end_matches(".log");
    let rotated_name = format!("{}.{}.log", file_stem, stamp.format("%Y%m%dT%H%M%S"));
    let rotated_path = log_dir.join(&rotated_name);

    std::fs::rename(&log_file_path, &rotated_path).map_err(|e| {
        anyhow!(
            "Failed to rotate log file {} to {}: {}",
            log_file_path.display(),
            rotated_path.display(),
            e
        )
    })?;
    Ok(Some(rotated_name))
}

/// Remove rotated files of this log beyond `max_files`, newest kept. Returns the count removed.
fn cleanup_old_logs(log_dir: &Path, config: &LoggingConfig) -> Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let rotated_prefix = format!("{}.", config.file_name.trim_end_matches(".log"));
    let mut rotated = Vec::new();
    for entry in std::fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_file() || name == config.file_name || !name.starts_with(&rotated_prefix) || !name.ends_with(".log") {
            continue;
        }
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            rotated.push((path, modified));
        }
    }

    // Newest first
    rotated.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in rotated.iter().skip(config.max_files) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to remove old log file {:?}: {}", path, e),
        }
    }
    Ok(removed)
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut filter = EnvFilter::new(&config.level);
    let mut directives: Vec<String> = Vec::new();
    if !config.level.to_lowercase().contains("trace") {
        directives.extend(QUIET_TARGETS.iter().map(|(target, level)| format!("{target}={level}")));
    }
    directives.extend(config.module_filters.iter().map(|(target, level)| format!("{target}={level}")));
    directives.push(format!("catalog_harvester={}", config.level));

    for directive in directives {
        match directive.parse::<Directive>() {
            Ok(parsed) => filter = filter.add_directive(parsed),
            Err(e) => eprintln!("Ignoring log directive '{directive}': {e}"),
        }
    }
    filter
}

/// Initialize logging with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Install the global subscriber described by `config`.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let log_dir = get_log_directory(config);

    let mut rotated = None;
    let mut removed = 0;
    if config.file_output {
        std::fs::create_dir_all(&log_dir).map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;
        rotated = rotate_existing_log_file(&log_dir, &config.file_name)?;
        if config.auto_cleanup_logs {
            removed = cleanup_old_logs(&log_dir, config)?;
        }
    }

    let registry = Registry::default().with(build_filter(config));

    match (config.file_output, config.console_output) {
        (true, console) => {
            let file_appender = rolling::never(&log_dir, &config.file_name);
            let (file_writer, file_guard) = non_blocking(file_appender);
            LOG_GUARDS
                .lock()
                .map_err(|_| anyhow!("Log guard registry poisoned"))?
                .push(file_guard);

            if config.json_format {
                let file_layer = fmt::Layer::new()
                    .json()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false);
                let console_layer = console.then(|| {
                    fmt::Layer::new()
                        .with_writer(std::io::stdout)
                        .with_timer(LocalTimeFormatter)
                        .with_target(false)
                });
                registry
                    .with(file_layer)
                    .with(console_layer)
                    .try_init()
                    .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;
            } else {
                let file_layer = fmt::Layer::new()
                    .with_writer(file_writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(false)
                    .with_ansi(false);
                let console_layer = console.then(|| {
                    fmt::Layer::new()
                        .with_writer(std::io::stdout)
                        .with_timer(LocalTimeFormatter)
                        .with_target(false)
                });
                registry
                    .with(file_layer)
                    .with(console_layer)
                    .try_init()
                    .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;
            }
        }
        (false, true) => {
            let console_layer = fmt::Layer::new()
                .with_writer(std::io::stdout)
                .with_timer(LocalTimeFormatter)
                .with_target(false);
            registry
                .with(console_layer)
                .try_init()
                .map_err(|e| anyhow!("Failed to install subscriber: {}", e))?;
        }
        (false, false) => {
            return Err(anyhow!("No logging output configured"));
        }
    }

    info!("Logging system initialized (level {})", config.level);
    if config.file_output {
        info!("Log file: {:?}", log_dir.join(&config.file_name));
        if let Some(name) = rotated {
            info!("Rotated previous log file to: {}", name);
        }
        if removed > 0 {
            info!("Removed {} old log files (keeping {})", removed, config.max_files);
        }
    }
    Ok(())
}

/// Log system information for diagnostics
pub fn log_system_info(config: &LoggingConfig) {
    info!("=== Catalog Harvester ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
    if config.file_output {
        info!("Log directory: {:?}", get_log_directory(config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn file_config(dir: &Path, max_files: usize) -> LoggingConfig {
        LoggingConfig {
            log_dir: Some(dir.to_path_buf()),
            file_output: true,
            max_files,
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn test_configured_directory_wins() {
        let dir = tempdir().unwrap();
        assert_eq!(get_log_directory(&file_config(dir.path(), 5)), dir.path());
        assert!(get_log_directory(&LoggingConfig::default()).ends_with("logs"));
    }

    #[test]
    fn test_rotation_renames_previous_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("harvest.log"), "previous run").unwrap();

        let rotated = rotate_existing_log_file(dir.path(), "harvest.log").unwrap().unwrap();
        assert!(rotated.starts_with("harvest."));
        assert!(rotated.ends_with(".log"));
        assert!(!dir.path().join("harvest.log").exists());
        assert!(dir.path().join(&rotated).exists());

        assert!(rotate_existing_log_file(dir.path(), "harvest.log").unwrap().is_none());
    }

    #[test]
    fn test_cleanup_keeps_newest_rotated_files() {
        let dir = tempdir().unwrap();
        let config = file_config(dir.path(), 2);
        for day in 1..=4 {
            let name = format!("catalog-harvester.2026010{day}T000000.log");
            std::fs::write(dir.path().join(name), "old").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        std::fs::write(dir.path().join("catalog-harvester.log"), "current").unwrap();
        std::fs::write(dir.path().join("unrelated.log"), "other").unwrap();

        assert_eq!(cleanup_old_logs(dir.path(), &config).unwrap(), 2);
        assert!(dir.path().join("catalog-harvester.20260104T000000.log").exists());
        assert!(dir.path().join("catalog-harvester.20260103T000000.log").exists());
        assert!(!dir.path().join("catalog-harvester.20260101T000000.log").exists());
        assert!(dir.path().join("catalog-harvester.log").exists());
        assert!(dir.path().join("unrelated.log").exists());
    }

    #[test]
    fn test_no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }
}
