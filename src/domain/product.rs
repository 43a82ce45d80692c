//! Canonical product record
//!
//! One flat, import-ready row per product page. Every text field defaults to
//! the empty string, never to a missing value, so the exporters can write a
//! rectangular table without special cases.

use serde::{Deserialize, Serialize};

use super::specification::SpecificationSet;

/// Availability in the import format's vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    OnBackorder,
}

impl StockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "instock",
            Self::OutOfStock => "outofstock",
            Self::OnBackorder => "onbackorder",
        }
    }

    /// Map availability wording (`"In stock"`, `"Backorder"`, `"Sold out"`) to a status.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("backorder") || label.contains("pre-order") || label.contains("preorder") {
            Some(Self::OnBackorder)
        } else if label.contains("out of stock")
            || label.contains("outofstock")
            || label.contains("sold out")
            || label.contains("unavailable")
        {
            Some(Self::OutOfStock)
        } else if label.contains("in stock") || label.contains("instock") || label.contains("available") {
            Some(Self::InStock)
        } else {
            None
        }
    }
}

/// Metric shipping data. Empty strings when the page does not state them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub weight_kg: String,
    pub length_mm: String,
    pub width_mm: String,
    pub height_mm: String,
}

/// Search metadata for the target store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoInfo {
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub canonical_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub url: String,
    /// RFC 3339 timestamp of extraction
    pub scraped_date: String,

    pub brand: String,
    pub model: String,
    pub full_name: String,
    pub slug: String,

    /// Repaired description markup
    pub description: String,
    pub short_description: String,
    pub highlights: String,
    pub features: Vec<String>,

    /// Source-currency price with two decimals
    pub price: String,
    /// Target-currency price with two decimals
    pub converted_price: String,
    pub stock_status: StockStatus,
    pub stock_quantity: Option<u32>,

    /// Absolute image URLs; the first one is the featured image
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,

    pub shipping: ShippingInfo,
    pub seo: SeoInfo,
    pub related_products: Vec<String>,

    pub specifications: SpecificationSet,
}

/// Fixed leading columns of the tabular export; specification keys follow.
pub const CORE_COLUMNS: &[&str] = &[
    "url",
    "scraped_date",
    "brand",
    "model",
    "full_name",
    "slug",
    "description",
    "short_description",
    "highlights",
    "features",
    "price",
    "converted_price",
    "stock_status",
    "stock_quantity",
    "featured_image",
    "gallery_images",
    "categories",
    "tags",
    "shipping_weight_kg",
    "shipping_length_mm",
    "shipping_width_mm",
    "shipping_height_mm",
    "meta_title",
    "meta_description",
    "meta_keywords",
    "canonical_url",
    "related_products",
];

/// Separator for list-valued cells in tabular output.
pub const LIST_SEPARATOR: &str = ", ";

/// Feature bullets may contain commas, so they get their own separator.
pub const FEATURE_SEPARATOR: &str = "; ";

impl CanonicalRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A record without a model is not importable.
    pub fn is_importable(&self) -> bool {
        !self.model.trim().is_empty()
    }

    pub fn featured_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    pub fn gallery_images(&self) -> &[String] {
        self.images.get(1..).unwrap_or(&[])
    }

    /// Cell value for one of [`CORE_COLUMNS`]; unknown columns are empty.
    pub fn core_value(&self, column: &str) -> String {
        match column {
            "url" => self.url.clone(),
            "scraped_date" => self.scraped_date.clone(),
            "brand" => self.brand.clone(),
            "model" => self.model.clone(),
            "full_name" => self.full_name.clone(),
            "slug" => self.slug.clone(),
            "description" => self.description.clone(),
            "short_description" => self.short_description.clone(),
            "highlights" => self.highlights.clone(),
            "features" => self.features.join(FEATURE_SEPARATOR),
            "price" => self.price.clone(),
            "converted_price" => self.converted_price.clone(),
            "stock_status" => self.stock_status.as_str().to_string(),
            "stock_quantity" => self.stock_quantity.map(|q| q.to_string()).unwrap_or_default(),
            "featured_image" => self.featured_image().to_string(),
            "gallery_images" => self.gallery_images().join(LIST_SEPARATOR),
            "categories" => self.categories.join(LIST_SEPARATOR),
            "tags" => self.tags.join(LIST_SEPARATOR),
            "shipping_weight_kg" => self.shipping.weight_kg.clone(),
            "shipping_length_mm" => self.shipping.length_mm.clone(),
            "shipping_width_mm" => self.shipping.width_mm.clone(),
            "shipping_height_mm" => self.shipping.height_mm.clone(),
            "meta_title" => self.seo.meta_title.clone(),
            "meta_description" => self.seo.meta_description.clone(),
            "meta_keywords" => self.seo.meta_keywords.clone(),
            "canonical_url" => self.seo.canonical_url.clone(),
            "related_products" => self.related_products.join(LIST_SEPARATOR),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty_and_in_stock() {
        let record = CanonicalRecord::new("https://shop.example/p/1");
        assert_eq!(record.stock_status, StockStatus::InStock);
        assert_eq!(record.core_value("stock_status"), "instock");
        assert_eq!(record.price, "");
        assert_eq!(record.core_value("stock_quantity"), "");
        assert!(!record.is_importable());
    }

    #[test]
    fn test_featured_and_gallery_split() {
        let mut record = CanonicalRecord::new("u");
        assert_eq!(record.featured_image(), "");
        assert!(record.gallery_images().is_empty());

        record.images = vec!["https://a/1.jpg".into(), "https://a/2.jpg".into(), "https://a/3.jpg".into()];
        assert_eq!(record.featured_image(), "https://a/1.jpg");
        assert_eq!(record.core_value("gallery_images"), "https://a/2.jpg, https://a/3.jpg");
    }

    #[test]
    fn test_stock_labels() {
        assert_eq!(StockStatus::from_label("In Stock"), Some(StockStatus::InStock));
        assert_eq!(StockStatus::from_label("Out of stock"), Some(StockStatus::OutOfStock));
        assert_eq!(StockStatus::from_label("Available on backorder"), Some(StockStatus::OnBackorder));
        assert_eq!(StockStatus::from_label("Call us"), None);
    }

    #[test]
    fn test_every_core_column_is_addressable() {
        let mut record = CanonicalRecord::new("https://shop.example/p/1");
        record.model = "X100".into();
        assert_eq!(record.core_value("model"), "X100");
        assert_eq!(record.core_value("url"), "https://shop.example/p/1");
        assert_eq!(record.core_value("not_a_column"), "");
        assert_eq!(CORE_COLUMNS.len(), 27);
    }
}
