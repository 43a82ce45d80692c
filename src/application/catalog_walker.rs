//! Catalog walk: discover product pages from category listings, extract each one
//!
//! Pages are processed one at a time. A page that cannot be fetched or
//! yields no record is skipped; only a walk that finds no product URL at
//! all fails.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::domain::export_batch::ExportBatch;
use crate::domain::ports::{Exporter, PageFetcher};
use crate::domain::product::CanonicalRecord;
use crate::domain::run_context::RunContext;
use crate::domain::url_classifier::UrlClassifier;
use crate::infrastructure::parsing::{
    CategoryPageParser, HtmlDocument, PageContext, ParsingConfig, ParsingError, ParsingResult, RecordAggregator,
};

pub struct CatalogWalker {
    fetcher: Arc<dyn PageFetcher>,
    category_parser: CategoryPageParser,
    aggregator: RecordAggregator,
}

impl CatalogWalker {
    pub fn new(fetcher: Arc<dyn PageFetcher>, classifier: UrlClassifier, parsing: ParsingConfig) -> Self {
        let category_parser = CategoryPageParser::new(parsing.category_page.links.clone(), classifier);
        Self {
            fetcher,
            category_parser,
            aggregator: RecordAggregator::new(parsing),
        }
    }

    /// Accepted product URLs across all category pages, deduplicated.
    pub async fn discover(&self, category_urls: &[String]) -> ParsingResult<BTreeSet<String>> {
        let mut product_urls = BTreeSet::new();
        let mut failed_pages = Vec::new();

        for category_url in category_urls {
            let body = match self.fetcher.fetch(category_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("⚠️ Skipping category page {}: {:#}", category_url, e);
                    failed_pages.push(category_url.clone());
                    continue;
                }
            };

            let found = self.product_links(&body, category_url);
            let before = product_urls.len();
            product_urls.extend(found);
            info!(
                "Category {}: {} new product URLs ({} total)",
                category_url,
                product_urls.len() - before,
                product_urls.len()
            );
        }

        if product_urls.is_empty() {
            return Err(ParsingError::NoProductUrlsFound {
                category_pages: category_urls.len(),
                failed_pages,
            });
        }
        info!("📋 Found {} product URLs to harvest", product_urls.len());
        Ok(product_urls)
    }

    /// Fetch and aggregate every URL; failures are skipped.
    pub async fn harvest<'a>(
        &self,
        product_urls: impl IntoIterator<Item = &'a String>,
        ctx: &mut RunContext,
    ) -> Vec<CanonicalRecord> {
        let product_urls: Vec<&String> = product_urls.into_iter().collect();
        let total = product_urls.len();
        let mut records = Vec::with_capacity(total);

        for (index, url) in product_urls.into_iter().enumerate() {
            info!("Processing {}/{}: {}", index + 1, total, url);
            let body = match self.fetcher.fetch(url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("⚠️ Skipping {}: {:#}", url, e);
                    continue;
                }
            };

            match self.extract_record(&body, url, ctx) {
                Some(record) => records.push(record),
                None => warn!("❌ No record extracted from {}", url),
            }
        }

        info!("🎉 Harvested {} of {} product pages", records.len(), total);
        records
    }

    pub async fn run(&self, category_urls: &[String], ctx: &mut RunContext) -> ParsingResult<Vec<CanonicalRecord>> {
        info!("🚀 Starting run {} over {} category pages", ctx.run_id(), category_urls.len());
        let product_urls = self.discover(category_urls).await?;
        Ok(self.harvest(&product_urls, ctx).await)
    }

    fn product_links(&self, body: &str, category_url: &str) -> Vec<String> {
        let doc = HtmlDocument::parse(body);
        self.category_parser
            .product_urls(&doc, &PageContext::new(category_url))
    }

    fn extract_record(&self, body: &str, url: &str, ctx: &mut RunContext) -> Option<CanonicalRecord> {
        let doc = HtmlDocument::parse(body);
        self.aggregator.aggregate(&doc, url, ctx)
    }
}

/// Conform the records to the run's key union and hand them to every exporter.
pub fn export_records(
    records: Vec<CanonicalRecord>,
    ctx: &RunContext,
    exporters: &[Box<dyn Exporter>],
) -> anyhow::Result<ExportBatch> {
    let batch = ExportBatch::from_run(records, ctx);
    if batch.is_empty() {
        warn!("No records to export");
        return Ok(batch);
    }

    for exporter in exporters {
        exporter
            .export(&batch)
            .with_context(|| format!("{} export failed", exporter.name()))?;
    }
    info!(
        "Exported {} records with {} specification columns",
        batch.len(),
        batch.spec_keys().len()
    );
    Ok(batch)
}
