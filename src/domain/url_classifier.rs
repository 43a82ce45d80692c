//! Decides whether a discovered link points at a single product page
//!
//! The rule order is fixed: exclusions first, then inclusions, then the
//! path-depth and plural-segment checks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UrlClassifierConfig {
    /// Substrings that disqualify a URL outright
    pub exclusions: Vec<String>,
    /// At least one of these must appear
    pub inclusions: Vec<String>,
    /// Minimum number of non-empty path segments
    pub min_path_segments: usize,
    /// Endings of the last path segment that mark a listing page
    pub listing_suffixes: Vec<String>,
}

impl Default for UrlClassifierConfig {
    fn default() -> Self {
        Self {
            exclusions: [
                "/blog/",
                "/support/",
                "/software/",
                "/supplies/",
                "/ribbons/",
                ".pdf",
                ".jpg",
                ".jpeg",
                ".png",
                ".gif",
                "/compare/",
                "/category/",
                "/view-all",
                "/manufacturer",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            inclusions: ["/id-card-printers/", "/printer/", "card-printer"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_path_segments: 3,
            listing_suffixes: ["printers", "bundles", "accessories"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrlClassifier {
    config: UrlClassifierConfig,
}

impl Default for UrlClassifier {
    fn default() -> Self {
        Self::new(UrlClassifierConfig::default())
    }
}

impl UrlClassifier {
    pub fn new(config: UrlClassifierConfig) -> Self {
        let lower = |items: Vec<String>| items.into_iter().map(|s| s.to_lowercase()).collect();
        Self {
            config: UrlClassifierConfig {
                exclusions: lower(config.exclusions),
                inclusions: lower(config.inclusions),
                min_path_segments: config.min_path_segments,
                listing_suffixes: lower(config.listing_suffixes),
            },
        }
    }

    /// `true` when the URL looks like a single product page.
    pub fn is_product_url(&self, url: &str) -> bool {
        let url = url.trim().to_lowercase();
        if url.is_empty() {
            return false;
        }

        if self.config.exclusions.iter().any(|e| url.contains(e.as_str())) {
            return false;
        }

        if !self.config.inclusions.iter().any(|i| url.contains(i.as_str())) {
            return false;
        }

        let segments: Vec<&str> = path_of(&url).split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < self.config.min_path_segments {
            return false;
        }

        match segments.last() {
            Some(last) => !self
                .config
                .listing_suffixes
                .iter()
                .any(|suffix| last.ends_with(suffix.as_str())),
            None => false,
        }
    }
}

/// Path portion of an absolute or root-relative URL, without query or fragment.
fn path_of(url: &str) -> &str {
    let path = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => url,
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://shop.example/id-card-printers/zebra/zc300-printer", true)]
    #[case("https://shop.example/id-card-printers/magicard/magicard-600-duo/", true)]
    #[case("/id-card-printers/fargo/dtc1500-card-printer?ref=nav", true)]
    #[case("https://shop.example/printer/evolis/primacy-2/details", true)]
    #[case("https://shop.example/id-card-printers/zebra-printers", false)]
    #[case("https://shop.example/id-card-printers/brands/zebra-printers/", false)]
    #[case("https://shop.example/id-card-printers/kits/starter-bundles", false)]
    #[case("https://shop.example/id-card-printers/zebra/zc300.pdf", false)]
    #[case("https://shop.example/blog/id-card-printers/how-to-choose", false)]
    #[case("https://shop.example/supplies/id-card-printers/ribbon-x", false)]
    #[case("https://shop.example/id-card-printers/view-all/page-2", false)]
    #[case("https://shop.example/about-us/team/leadership", false)]
    #[case("", false)]
    fn test_product_url_rules(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(UrlClassifier::default().is_product_url(url), expected, "{url}");
    }

    #[test]
    fn test_rules_are_case_insensitive() {
        let classifier = UrlClassifier::default();
        assert!(classifier.is_product_url("https://SHOP.example/ID-Card-Printers/Zebra/ZC300"));
        assert!(!classifier.is_product_url("https://shop.example/id-card-printers/zebra/ZC300.PDF"));
    }

    #[test]
    fn test_custom_configuration() {
        let classifier = UrlClassifier::new(UrlClassifierConfig {
            exclusions: vec!["/outlet/".into()],
            inclusions: vec!["/p/".into()],
            min_path_segments: 2,
            listing_suffixes: vec!["-list".into()],
        });
        assert!(classifier.is_product_url("https://shop.example/p/widget-9"));
        assert!(!classifier.is_product_url("https://shop.example/p/widget-list"));
        assert!(!classifier.is_product_url("https://shop.example/outlet/p/widget-9"));
    }

    #[test]
    fn test_path_extraction() {
        assert_eq!(path_of("https://a.example/x/y?q=1#f"), "/x/y");
        assert_eq!(path_of("https://a.example"), "");
        assert_eq!(path_of("/x/y#top"), "/x/y");
    }
}
