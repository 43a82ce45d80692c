//! Search metadata
use crate::domain::product::SeoInfo;
use crate::infrastructure::parsing::config::SeoLocators;
use crate::infrastructure::parsing::context::PageContext;
use crate::infrastructure::parsing::document::DocumentQuery;
use crate::infrastructure::parsing::strategy::FallbackChain;

pub fn extract(
    doc: &dyn DocumentQuery,
    config: &SeoLocators,
    page: &PageContext,
    short_description: &str,
) -> SeoInfo {
    SeoInfo {
        meta_title: FallbackChain::new("meta_title", &config.title)
            .first(doc)
            .unwrap_or_default(),
        meta_description: FallbackChain::new("meta_description", &config.description)
            .first(doc)
            .unwrap_or_else(|| short_description.to_string()),
        meta_keywords: FallbackChain::new("meta_keywords", &config.keywords)
            .first(doc)
            .unwrap_or_default(),
        canonical_url: FallbackChain::new("canonical_url", &config.canonical)
            .first_valid(doc, |href| page.resolve(href))
            .unwrap_or_else(|| page.url().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::document::HtmlDocument;

    #[test]
    fn test_meta_tags() {
        let doc = HtmlDocument::parse(
            r#"<head><title>Zebra ZC300 | Shop</title>
            <meta property="og:title" content="Zebra ZC300 Card Printer">
            <meta name="description" content="Compact card printer">
            <meta name="keywords" content="zebra, zc300">
            <link rel="canonical" href="/id-card-printers/zebra/zc300"></head>"#,
        );
        let page = PageContext::new("https://shop.example/id-card-printers/zebra/zc300?utm=x");
        let seo = extract(&doc, &SeoLocators::default(), &page, "short");
        assert_eq!(seo.meta_title, "Zebra ZC300 Card Printer");
        assert_eq!(seo.meta_description, "Compact card printer");
        assert_eq!(seo.meta_keywords, "zebra, zc300");
        assert_eq!(seo.canonical_url, "https://shop.example/id-card-printers/zebra/zc300");
    }

    #[test]
    fn test_fallbacks() {
        let doc = HtmlDocument::parse("<head><title>Acme X100 | Printers</title></head>");
        let page = PageContext::new("https://shop.example/p/acme-x100");
        let seo = extract(&doc, &SeoLocators::default(), &page, "Fast printer");
        assert_eq!(seo.meta_title, "Acme X100 | Printers");
        assert_eq!(seo.meta_description, "Fast printer");
        assert_eq!(seo.meta_keywords, "");
        assert_eq!(seo.canonical_url, "https://shop.example/p/acme-x100");
    }
}
