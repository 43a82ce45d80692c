//! Infrastructure layer: configuration, logging, HTTP fetching, HTML parsing and exporters
//!
//! Concrete implementations of the capabilities declared in `domain::ports`
//! live here.

pub mod config;
pub mod export;
pub mod fetch_error;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod retry_policy;

pub use config::{AppConfig, ConfigManager};
pub use export::{CsvExporter, JsonExporter, SummaryExporter, exporters_for};
pub use fetch_error::FetchError;
pub use http_client::HttpPageFetcher;
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, RecordAggregator};
pub use retry_policy::{FailureClass, RetryPolicy};
