//! Capabilities the extraction core depends on
//!
//! Concrete implementations live in the infrastructure layer; tests supply
//! in-memory ones.

use async_trait::async_trait;

use super::export_batch::ExportBatch;

/// Retrieves the HTML body of a page.
///
/// Implementations own rate limiting and retry; an `Err` means the URL is
/// given up for this run.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

/// Writes a finished batch of records somewhere durable.
pub trait Exporter: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    fn export(&self, batch: &ExportBatch) -> anyhow::Result<()>;
}
