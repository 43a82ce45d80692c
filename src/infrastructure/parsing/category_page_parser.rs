//! Product link discovery on category listing pages
use std::collections::HashSet;

use tracing::debug;

use super::context::PageContext;
use super::document::DocumentQuery;
use super::strategy::{FallbackChain, Locator};
use crate::domain::url_classifier::UrlClassifier;

#[derive(Debug, Clone)]
pub struct CategoryPageParser {
    links: Vec<Locator>,
    classifier: UrlClassifier,
}

impl CategoryPageParser {
    pub fn new(links: Vec<Locator>, classifier: UrlClassifier) -> Self {
        Self { links, classifier }
    }

    /// Resolved links on the page that classify as product pages, unique, in page order.
    pub fn product_urls(&self, doc: &dyn DocumentQuery, page: &PageContext) -> Vec<String> {
        let links = FallbackChain::new("category_links", &self.links).accumulate_unique(doc, |href| page.resolve(href));
        let total = links.len();

        let mut seen = HashSet::new();
        let accepted: Vec<String> = links
            .into_iter()
            .filter(|url| self.classifier.is_product_url(url))
            .filter(|url| seen.insert(url.clone()))
            .collect();

        debug!(
            "Category page {}: {} links, {} product candidates",
            page.url(),
            total,
            accepted.len()
        );
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::config::CategoryPageRules;
    use crate::infrastructure::parsing::document::HtmlDocument;

    #[test]
    fn test_only_product_links_survive() {
        let doc = HtmlDocument::parse(
            r##"<a href="/id-card-printers/zebra/zc300">ZC300</a>
               <a href="/id-card-printers/zebra/zc300">ZC300 again</a>
               <a href="https://shop.example/id-card-printers/fargo/dtc1500-card-printer">DTC1500</a>
               <a href="/id-card-printers/zebra-printers">All Zebra</a>
               <a href="/blog/id-card-printers/choosing">Blog</a>
               <a href="#reviews">Reviews</a>"##,
        );
        let parser = CategoryPageParser::new(CategoryPageRules::default().links, UrlClassifier::default());
        let page = PageContext::new("https://shop.example/id-card-printers");
        assert_eq!(
            parser.product_urls(&doc, &page),
            vec![
                "https://shop.example/id-card-printers/zebra/zc300".to_string(),
                "https://shop.example/id-card-printers/fargo/dtc1500-card-printer".to_string(),
            ]
        );
    }
}
