//! Configuration infrastructure
//!
//! `AppConfig` is layered with the `config` crate: built-in defaults, then an
//! optional JSON file, then `CATALOG_HARVESTER__SECTION__KEY` environment
//! variables. `ConfigManager` owns the file location and writes the default file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::domain::normalization::ConversionRate;
use crate::domain::url_classifier::UrlClassifierConfig;
use crate::infrastructure::parsing::ParsingConfig;
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Site to walk
    pub site: SiteConfig,

    /// Page fetcher behaviour
    pub http: HttpConfig,

    /// Price conversion
    pub currency: CurrencyConfig,

    /// Product URL rules
    pub classifier: UrlClassifierConfig,

    /// Every locator chain and extraction limit
    pub parsing: ParsingConfig,

    pub logging: LoggingConfig,

    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,

    /// Category listing paths, relative to `base_url` or absolute
    pub category_paths: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: alphacard::BASE_URL.to_string(),
            category_paths: alphacard::CATEGORY_PATHS.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Timeout for a single request in seconds
    pub timeout_secs: u64,

    /// Fixed delay between consecutive requests in milliseconds
    pub request_delay_ms: u64,

    /// Attempts per URL, including the first one
    pub retry_attempts: u32,

    /// First backoff delay; doubled on every further attempt
    pub backoff_base_ms: u64,

    /// Upper bound for a single backoff delay
    pub backoff_max_ms: u64,

    pub max_redirects: usize,

    /// Bodies shorter than this are rejected as empty pages
    pub min_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: alphacard::USER_AGENT.to_string(),
            timeout_secs: defaults::REQUEST_TIMEOUT_SECONDS,
            request_delay_ms: defaults::REQUEST_DELAY_MS,
            retry_attempts: defaults::RETRY_ATTEMPTS,
            backoff_base_ms: defaults::BACKOFF_BASE_MS,
            backoff_max_ms: defaults::BACKOFF_MAX_MS,
            max_redirects: defaults::MAX_REDIRECTS,
            min_body_bytes: defaults::MIN_BODY_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrencyConfig {
    pub source: String,
    pub target: String,

    /// Source-currency units per one target-currency unit
    pub rate: f64,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            source: defaults::SOURCE_CURRENCY.to_string(),
            target: defaults::TARGET_CURRENCY.to_string(),
            rate: defaults::CONVERSION_RATE,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,

    /// Enable JSON formatting for file output
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Directory for log files; next to the executable when unset
    pub log_dir: Option<PathBuf>,

    pub file_name: String,

    /// Number of rotated log files to keep
    pub max_files: usize,

    /// Delete rotated files beyond `max_files` on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific level filters (e.g. "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
            module_filters: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,

    /// File name without extension for the CSV and JSON exports
    pub file_stem: String,

    pub summary_file: String,

    pub csv: bool,
    pub json: bool,
    pub summary: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            file_stem: defaults::EXPORT_FILE_STEM.to_string(),
            summary_file: defaults::SUMMARY_FILE.to_string(),
            csv: true,
            json: true,
            summary: true,
        }
    }
}

impl AppConfig {
    /// Absolute category page URLs, in configured order.
    pub fn category_urls(&self) -> ParsingResult<Vec<String>> {
        let base = Url::parse(&self.site.base_url)
            .map_err(|e| ParsingError::configuration("site.base_url", e))?;
        self.site
            .category_paths
            .iter()
            .map(|path| {
                base.join(path)
                    .map(String::from)
                    .map_err(|e| ParsingError::configuration("site.category_paths", format!("{path}: {e}")))
            })
            .collect()
    }

    pub fn conversion_rate(&self) -> ParsingResult<ConversionRate> {
        ConversionRate::new(self.currency.rate).ok_or_else(|| {
            ParsingError::configuration(
                "currency.rate",
                format!("must be a positive number, got {}", self.currency.rate),
            )
        })
    }

    /// Reject settings the run cannot start with.
    pub fn validate(&self) -> ParsingResult<()> {
        self.conversion_rate()?;
        if self.site.category_paths.is_empty() {
            return Err(ParsingError::configuration(
                "site.category_paths",
                "at least one category page is required",
            ));
        }
        self.category_urls()?;
        if self.http.retry_attempts == 0 {
            return Err(ParsingError::configuration("http.retry_attempts", "must be at least 1"));
        }
        if self.classifier.inclusions.is_empty() {
            return Err(ParsingError::configuration(
                "classifier.inclusions",
                "no URL could ever be accepted",
            ));
        }
        self.parsing.validate()
    }
}

/// Locates, layers and persists the configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub const ENV_PREFIX: &'static str = "CATALOG_HARVESTER";

    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);
        Ok(config_dir)
    }

    /// Manager for the default file in the user config directory
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME)))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Defaults, then the file if it exists, then the environment.
    pub fn load_config(&self) -> Result<AppConfig> {
        self.load_with_environment(Environment::with_prefix(Self::ENV_PREFIX).separator("__"))
    }

    fn load_with_environment(&self, environment: Environment) -> Result<AppConfig> {
        let defaults = Config::try_from(&AppConfig::default()).context("Failed to serialize default configuration")?;
        let file_present = self.config_path.exists();

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(self.config_path.clone())
                    .format(FileFormat::Json)
                    .required(false),
            )
            .add_source(environment.try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration layers ({})", self.config_path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if file_present {
            info!("Loaded configuration from: {:?}", self.config_path);
        } else {
            debug!("No configuration file at {:?}, using defaults", self.config_path);
        }
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Write the defaults unless a file exists. Returns whether a file was written.
    pub async fn initialize(&self, overwrite: bool) -> Result<bool> {
        if self.config_path.exists() && !overwrite {
            info!("Configuration already present at {:?}", self.config_path);
            return Ok(false);
        }
        self.save_config(&AppConfig::default()).await?;
        Ok(true)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default target site and its category pages
pub mod alphacard {
    pub const BASE_URL: &str = "https://www.alphacard.com";

    pub const CATEGORY_PATHS: &[&str] = &[
        "/id-card-printers/view-all-id-printers",
        "/id-card-printers",
        "/id-card-printers/id-card-printers-by-manufacturer/alphacard-printers",
        "/id-card-printers/id-card-printers-by-manufacturer/magicard-printers",
        "/id-card-printers/id-card-printers-by-manufacturer/fargo-printers",
        "/id-card-printers/id-card-printers-by-manufacturer/zebra-printers",
        "/id-card-printers/id-card-printers-by-manufacturer/evolis-printers",
    ];

    pub const USER_AGENT: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
}

pub mod defaults {
    pub const APP_DIR_NAME: &str = "catalog-harvester";
    pub const CONFIG_FILE_NAME: &str = "catalog_harvester_config.json";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const REQUEST_DELAY_MS: u64 = 2000;
    pub const RETRY_ATTEMPTS: u32 = 3;
    pub const BACKOFF_BASE_MS: u64 = 5000;
    pub const BACKOFF_MAX_MS: u64 = 30_000;
    pub const MAX_REDIRECTS: usize = 10;
    pub const MIN_BODY_BYTES: usize = 100;

    pub const SOURCE_CURRENCY: &str = "USD";
    pub const TARGET_CURRENCY: &str = "CAD";
    /// USD per CAD
    pub const CONVERSION_RATE: f64 = 0.73;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "catalog-harvester.log";
    pub const LOG_MAX_FILES: usize = 5;
    pub const LOG_AUTO_CLEANUP: bool = true;

    pub const OUTPUT_DIR: &str = "output";
    pub const EXPORT_FILE_STEM: &str = "alphacard_printers";
    pub const SUMMARY_FILE: &str = "scrape_summary.json";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.category_urls().unwrap().len(), 7);
        assert_eq!(
            config.category_urls().unwrap()[1],
            "https://www.alphacard.com/id-card-printers"
        );
    }

    #[test]
    fn test_validation_rejects_bad_settings() {
        let mut config = AppConfig::default();
        config.currency.rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ParsingError::ConfigurationError { .. })
        ));

        let mut config = AppConfig::default();
        config.site.category_paths.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.parsing.identity.model.push(crate::infrastructure::parsing::Locator::pattern("(unclosed"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.json"));
        let config = manager
            .load_with_environment(Environment::with_prefix(ConfigManager::ENV_PREFIX).source(Some(HashMap::new())))
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_then_environment_layering() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"http": {"timeout_secs": 5}, "currency": {"rate": 0.8}}"#).unwrap();

        let env: HashMap<String, String> = [("CATALOG_HARVESTER__CURRENCY__RATE".to_string(), "0.5".to_string())]
            .into_iter()
            .collect();
        let config = ConfigManager::with_path(&path)
            .load_with_environment(
                Environment::with_prefix(ConfigManager::ENV_PREFIX)
                    .separator("__")
                    .source(Some(env)),
            )
            .unwrap();

        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.retry_attempts, defaults::RETRY_ATTEMPTS);
        assert!((config.currency.rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.parsing, ParsingConfig::default());
    }

    #[tokio::test]
    async fn test_initialize_writes_once() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        assert!(manager.initialize(false).await.unwrap());
        assert!(!manager.initialize(false).await.unwrap());

        let written: AppConfig = serde_json::from_str(&std::fs::read_to_string(manager.config_path()).unwrap()).unwrap();
        assert_eq!(written, AppConfig::default());
    }
}
