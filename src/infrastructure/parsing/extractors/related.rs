//! Related and upsell product links
use crate::infrastructure::parsing::config::RelatedLocators;
use crate::infrastructure::parsing::context::PageContext;
use crate::infrastructure::parsing::document::DocumentQuery;
use crate::infrastructure::parsing::strategy::FallbackChain;

/// Unique absolute URLs of related products, excluding the page itself.
pub fn extract(doc: &dyn DocumentQuery, config: &RelatedLocators, page: &PageContext) -> Vec<String> {
    FallbackChain::new("related_products", &config.links).accumulate_unique(doc, |href| {
        page.resolve(href).filter(|url| !page.is_same_page(url))
    })
}
