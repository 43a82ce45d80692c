//! Record aggregator
//!
//! Runs the field extractors over one product page in a fixed order and
//! assembles the canonical record. A failing step is logged and its fields
//! keep their defaults; a page without a model yields no record.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::config::ParsingConfig;
use super::context::PageContext;
use super::document::DocumentQuery;
use super::extractors::{commerce, content, identity, media, related, seo, shipping, taxonomy, text_mining};
use super::specification_parser::{SpecificationTableParser, register_keys};
use super::{ParsingError, ParsingResult};
use crate::domain::product::CanonicalRecord;
use crate::domain::run_context::RunContext;

#[derive(Debug, Clone)]
pub struct RecordAggregator {
    config: ParsingConfig,
    spec_parser: SpecificationTableParser,
}

impl Default for RecordAggregator {
    fn default() -> Self {
        Self::new(ParsingConfig::default())
    }
}

impl RecordAggregator {
    pub fn new(config: ParsingConfig) -> Self {
        let spec_parser = SpecificationTableParser::new(config.specifications.clone());
        Self { config, spec_parser }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    pub fn aggregate(&self, doc: &dyn DocumentQuery, url: &str, ctx: &mut RunContext) -> Option<CanonicalRecord> {
        let page = PageContext::new(url);
        let mut record = CanonicalRecord::new(url);
        record.scraped_date = Utc::now().to_rfc3339();

        if let Some(found) = run_step("identity", url, || Ok(identity::extract(doc, &self.config.identity))) {
            record.full_name = found.full_name;
            record.model = found.model;
            record.brand = found.brand;
            record.slug = found.slug;
        }

        // Checked before the specification step so a rejected page adds no columns
        if !record.is_importable() {
            let reason = ParsingError::required_field_missing("model", Some("no product heading or page title"));
            warn!("❌ Discarding {}: {}", url, reason);
            return None;
        }

        if let Some(found) = run_step("content", url, || content::extract(doc, &self.config.content)) {
            record.description = found.description;
            record.highlights = found.highlights;
            record.short_description = found.short_description;
            record.features = found.features;
        }

        if let Some(specs) = run_step("specifications", url, || {
            let mut specs = self.spec_parser.parse_table(doc)?;
            text_mining::fill_missing(&doc.page_text(), &mut specs);
            Ok(specs)
        }) {
            register_keys(&specs, ctx);
            record.specifications = specs;
        }

        if let Some(images) = run_step("media", url, || Ok(media::extract(doc, &self.config.media))) {
            record.images = images;
        }

        if let Some((categories, tags)) = run_step("categorization", url, || {
            let categories = taxonomy::categories(doc, &self.config.taxonomy, &page);
            let tags = taxonomy::tags(
                doc,
                &self.config.taxonomy,
                &record.brand,
                &record.highlights,
                &record.description,
            );
            Ok((categories, tags))
        }) {
            record.categories = categories;
            record.tags = tags;
        }

        if let Some(availability) = run_step("stock", url, || Ok(commerce::availability(doc, &self.config.commerce))) {
            record.stock_status = availability.status;
            record.stock_quantity = availability.quantity;
        }

        record.shipping = shipping::from_specifications(&record.specifications);

        if let Some(found) = run_step("seo", url, || {
            Ok(seo::extract(doc, &self.config.seo, &page, &record.short_description))
        }) {
            record.seo = found;
        }

        if let Some(links) = run_step("related", url, || Ok(related::extract(doc, &self.config.related, &page))) {
            record.related_products = links;
        }

        if let Some(pricing) = run_step("price", url, || {
            Ok(commerce::price(doc, &self.config.commerce, ctx.conversion_rate()))
        }) {
            record.price = pricing.price;
            record.converted_price = pricing.converted_price;
        }

        info!(
            "✅ Aggregated {} from {} ({} specs, {} images, price '{}')",
            record.model,
            url,
            record.specifications.len(),
            record.images.len(),
            record.price
        );
        Some(record)
    }
}

fn run_step<T>(step: &str, url: &str, extract: impl FnOnce() -> ParsingResult<T>) -> Option<T> {
    match extract() {
        Ok(value) => {
            debug!("Step {} done for {}", step, url);
            Some(value)
        }
        Err(e) => {
            let failure = ParsingError::extraction_failed(step, url, &e);
            if e.is_recoverable() {
                warn!("⚠️ {}", failure);
            } else {
                warn!("⚠️ {} (check the parsing configuration)", failure);
            }
            None
        }
    }
}
