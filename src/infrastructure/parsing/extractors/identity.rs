//! Product identity: full name, model, brand and slug
use tracing::debug;

use super::slugify;
use crate::infrastructure::parsing::config::{BrandKeyword, IdentityLocators};
use crate::infrastructure::parsing::document::DocumentQuery;
use crate::infrastructure::parsing::strategy::FallbackChain;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub full_name: String,
    pub model: String,
    pub brand: String,
    pub slug: String,
}

pub fn extract(doc: &dyn DocumentQuery, config: &IdentityLocators) -> Identity {
    let full_name = FallbackChain::new("full_name", &config.full_name)
        .first(doc)
        .unwrap_or_default();

    let model = FallbackChain::new("model", &config.model)
        .first(doc)
        .or_else(|| model_from_title(&full_name, &config.title_separators))
        .unwrap_or_default();

    let brand = brand_for(&model, &config.brands).unwrap_or_default();
    let slug = slugify(&model);

    Identity {
        full_name,
        model,
        brand,
        slug,
    }
}

/// Leading segment of a page title, before the earliest separator.
pub fn model_from_title(title: &str, separators: &[String]) -> Option<String> {
    let cut = separators
        .iter()
        .filter(|sep| !sep.is_empty())
        .filter_map(|sep| title.find(sep.as_str()))
        .min()
        .unwrap_or(title.len());
    let model = title[..cut].trim();
    if model.is_empty() {
        None
    } else {
        debug!("Model taken from title prefix: {}", model);
        Some(model.to_string())
    }
}

/// First brand whose keyword occurs in the lower-cased model.
pub fn brand_for(model: &str, brands: &[BrandKeyword]) -> Option<String> {
    let lowered = model.to_lowercase();
    brands
        .iter()
        .find(|entry| lowered.contains(entry.keyword.as_str()))
        .map(|entry| entry.brand.clone())
}
