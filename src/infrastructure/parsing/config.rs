//! Parsing configuration for product page extraction
//!
//! Every field's fallback chain is data so a different storefront theme can be
//! handled from the config file. Defaults target the catalog's Magento-style
//! product pages.

use serde::{Deserialize, Serialize};

use super::strategy::Locator;
use super::ParsingResult;
use super::document::compile_selector;

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParsingConfig {
    pub identity: IdentityLocators,
    pub content: ContentLocators,
    pub specifications: SpecificationTableRules,
    pub media: MediaLocators,
    pub taxonomy: TaxonomyLocators,
    pub commerce: CommerceLocators,
    pub seo: SeoLocators,
    pub related: RelatedLocators,
    pub category_page: CategoryPageRules,
}

/// Lower-cased keyword looked up in the model name, and the brand it stands for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandKeyword {
    pub keyword: String,
    pub brand: String,
}

/// A tag that applies when any of its synonyms occurs in the product copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagFamily {
    pub tag: String,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdentityLocators {
    pub full_name: Vec<Locator>,
    pub model: Vec<Locator>,
    /// Separators splitting a page title into model and site name
    pub title_separators: Vec<String>,
    /// Ordered brand table, first hit wins
    pub brands: Vec<BrandKeyword>,
}

impl Default for IdentityLocators {
    fn default() -> Self {
        Self {
            full_name: vec![Locator::text("title"), Locator::attr("meta[property='og:title']", "content")],
            model: vec![
                Locator::text("h1.page-title span"),
                Locator::text("h1.page-title"),
                Locator::text("h1.product-name"),
                Locator::text("h1"),
            ],
            title_separators: vec!["|".to_string(), " - ".to_string()],
            brands: [
                ("alphacard", "AlphaCard"),
                ("magicard", "Magicard"),
                ("fargo", "Fargo"),
                ("zebra", "Zebra"),
                ("evolis", "Evolis"),
                ("datacard", "Entrust Datacard"),
                ("entrust", "Entrust Datacard"),
                ("idp", "IDP"),
                ("swiftcolor", "SwiftColor"),
                ("matica", "Matica"),
            ]
            .into_iter()
            .map(|(keyword, brand)| BrandKeyword {
                keyword: keyword.to_string(),
                brand: brand.to_string(),
            })
            .collect(),
        }
    }
}

/// Rules for feature bullets gathered outside the description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeatureRules {
    pub item_selector: String,
    pub excluded_container: String,
    /// Exclusive lower bound on item length
    pub min_length: usize,
    /// Exclusive upper bound on item length
    pub max_length: usize,
    pub max_items: usize,
}

impl Default for FeatureRules {
    fn default() -> Self {
        Self {
            item_selector: "ul li, ol li".to_string(),
            excluded_container: ".product.attribute.description, #description, .description, .product-attribute-description, nav, header, footer, .breadcrumbs"
                .to_string(),
            min_length: 10,
            max_length: 200,
            max_items: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentLocators {
    pub description: Vec<Locator>,
    pub highlights: Vec<Locator>,
    pub short_description_limit: usize,
    pub features: FeatureRules,
}

impl Default for ContentLocators {
    fn default() -> Self {
        Self {
            description: vec![
                Locator::inner_html(&[
                    ".product.attribute.description",
                    ".value",
                    "[data-content-type='html']",
                ]),
                Locator::inner_html(&["#description"]),
                Locator::inner_html(&[".product-description"]),
                Locator::inner_html(&["[itemprop='description']"]),
                Locator::inner_html(&[".description"]),
                Locator::inner_html(&["[data-content-type='html']"]),
                Locator::inner_html(&[".product-info-main .description"]),
                Locator::inner_html(&[".product-attribute-description"]),
            ],
            highlights: vec![
                Locator::inner_html(&[".product.attribute.overview", ".value", "[data-content-type='html']"]),
                Locator::inner_html(&[".product-highlights"]),
                Locator::inner_html(&[".overview"]),
            ],
            short_description_limit: 200,
            features: FeatureRules::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpecificationTableRules {
    /// Table selectors in priority order; the first table found is used
    pub tables: Vec<String>,
    /// Values treated as absent
    pub placeholder_values: Vec<String>,
    pub max_value_length: usize,
}

impl Default for SpecificationTableRules {
    fn default() -> Self {
        Self {
            tables: [
                "table#product-attribute-specs-table",
                "table.additional-attributes",
                ".product-specs table",
                "#specifications table",
                "table.data.table",
                "table",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            placeholder_values: ["-", "N/A", "TBD"].into_iter().map(String::from).collect(),
            max_value_length: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaLocators {
    pub images: Vec<Locator>,
    /// Substrings marking placeholder or loading assets
    pub reject_markers: Vec<String>,
}

impl Default for MediaLocators {
    fn default() -> Self {
        Self {
            images: vec![
                Locator::attr(".gallery-placeholder img", "src"),
                Locator::attr("[data-zoom-image]", "data-zoom-image"),
                Locator::attr(".fotorama__stage__frame", "href"),
                Locator::attr(".product.media img", "src"),
                Locator::attr("meta[property='og:image']", "content"),
                Locator::markup_pattern(r#""full":"(https?:[^"]+)""#),
            ],
            reject_markers: ["placeholder", "loading", "spinner", "data:image"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaxonomyLocators {
    pub categories: Vec<Locator>,
    /// Breadcrumb entries that are not categories (compared case-insensitively)
    pub excluded_categories: Vec<String>,
    pub tags: Vec<Locator>,
    pub tag_families: Vec<TagFamily>,
}

impl Default for TaxonomyLocators {
    fn default() -> Self {
        let family = |tag: &str, synonyms: &[&str]| TagFamily {
            tag: tag.to_string(),
            synonyms: synonyms.iter().map(|s| (*s).to_string()).collect(),
        };

        Self {
            categories: vec![
                Locator::text(".breadcrumbs li a"),
                Locator::text(".breadcrumb a"),
                Locator::attr("meta[property='product:category']", "content"),
            ],
            excluded_categories: vec!["home".to_string()],
            tags: vec![Locator::text(".product-tags a"), Locator::text(".tags a"), Locator::text("a[rel='tag']")],
            tag_families: vec![
                family("Wireless", &["wireless", "wi-fi", "wifi"]),
                family("Duplex", &["duplex", "dual-sided", "dual sided", "double-sided"]),
                family("RFID", &["rfid"]),
                family("Ethernet", &["ethernet"]),
                family("Lamination", &["lamination", "laminator", "laminating"]),
                family("Magnetic Encoding", &["magnetic stripe", "mag stripe", "magnetic encoding"]),
                family("Smart Card Encoding", &["smart card", "contactless"]),
                family("Retransfer", &["retransfer"]),
                family("Single-Sided", &["single-sided", "single sided", "simplex"]),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommerceLocators {
    pub price: Vec<Locator>,
    pub stock_status: Vec<Locator>,
    pub stock_quantity: Vec<Locator>,
}

impl Default for CommerceLocators {
    fn default() -> Self {
        Self {
            price: vec![
                Locator::text(".product-info-main .price-box .price"),
                Locator::text("span.price-wrapper .price"),
                Locator::text(".price"),
                Locator::attr("[data-price-amount]", "data-price-amount"),
                Locator::attr("meta[property='product:price:amount']", "content"),
                Locator::pattern(r"\$[\d,]+(?:\.\d+)?"),
            ],
            stock_status: vec![
                Locator::text(".product-info-stock-sku .stock span"),
                Locator::text(".stock.available"),
                Locator::text(".stock.unavailable"),
                Locator::text("[itemprop='availability']"),
                Locator::attr("[itemprop='availability']", "href"),
                Locator::attr("[itemprop='availability']", "content"),
            ],
            stock_quantity: vec![Locator::pattern(r"(?i)\b(\d+)\s+(?:left|in stock|available)\b")],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeoLocators {
    pub title: Vec<Locator>,
    pub description: Vec<Locator>,
    pub keywords: Vec<Locator>,
    pub canonical: Vec<Locator>,
}

impl Default for SeoLocators {
    fn default() -> Self {
        Self {
            title: vec![Locator::attr("meta[property='og:title']", "content"), Locator::text("title")],
            description: vec![
                Locator::attr("meta[name='description']", "content"),
                Locator::attr("meta[property='og:description']", "content"),
            ],
            keywords: vec![Locator::attr("meta[name='keywords']", "content")],
            canonical: vec![Locator::attr("link[rel='canonical']", "href")],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelatedLocators {
    pub links: Vec<Locator>,
}

impl Default for RelatedLocators {
    fn default() -> Self {
        Self {
            links: vec![
                Locator::attr(".block.related a.product-item-link", "href"),
                Locator::attr(".block.upsell a.product-item-link", "href"),
                Locator::attr(".related-products a", "href"),
            ],
        }
    }
}

/// Link discovery on category listing pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryPageRules {
    pub links: Vec<Locator>,
}

impl Default for CategoryPageRules {
    fn default() -> Self {
        Self {
            links: vec![Locator::attr("a[href]", "href")],
        }
    }
}

impl ParsingConfig {
    fn all_locators(&self) -> impl Iterator<Item = &Locator> {
        [
            &self.identity.full_name,
            &self.identity.model,
            &self.content.description,
            &self.content.highlights,
            &self.media.images,
            &self.taxonomy.categories,
            &self.taxonomy.tags,
            &self.commerce.price,
            &self.commerce.stock_status,
            &self.commerce.stock_quantity,
            &self.seo.title,
            &self.seo.description,
            &self.seo.keywords,
            &self.seo.canonical,
            &self.related.links,
            &self.category_page.links,
        ]
        .into_iter()
        .flatten()
    }

    /// Fail fast on any selector or regex that does not compile.
    pub fn validate(&self) -> ParsingResult<()> {
        for locator in self.all_locators() {
            locator.validate()?;
        }
        for table in &self.specifications.tables {
            compile_selector(table)?;
        }
        compile_selector(&self.content.features.item_selector)?;
        compile_selector(&self.content.features.excluded_container)?;
        Ok(())
    }
}
