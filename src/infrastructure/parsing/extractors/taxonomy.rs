//! Categories and tags
use tracing::debug;

use super::title_case_segment;
use crate::infrastructure::parsing::config::TaxonomyLocators;
use crate::infrastructure::parsing::context::PageContext;
use crate::infrastructure::parsing::document::{DocumentQuery, plain_text};
use crate::infrastructure::parsing::strategy::FallbackChain;

/// Breadcrumb or meta categories, else categories derived from the URL path.
pub fn categories(doc: &dyn DocumentQuery, config: &TaxonomyLocators, page: &PageContext) -> Vec<String> {
    let excluded: Vec<String> = config.excluded_categories.iter().map(|c| c.to_lowercase()).collect();

    let mut found = FallbackChain::new("categories", &config.categories).first_list(doc, |candidate| {
        let name = candidate.trim();
        (!name.is_empty() && !excluded.contains(&name.to_lowercase())).then(|| name.to_string())
    });
    dedupe_in_place(&mut found);

    if found.is_empty() {
        found = categories_from_path(page);
        debug!("Categories derived from URL path: {:?}", found);
    }
    found
}

/// Every path segment except the last (the product itself), title-cased.
pub fn categories_from_path(page: &PageContext) -> Vec<String> {
    let segments = page.path_segments();
    let Some((_, parents)) = segments.split_last() else {
        return Vec::new();
    };
    parents.iter().map(|segment| title_case_segment(segment)).collect()
}

/// Tag locators, then the brand, then every tag family mentioned in the copy.
pub fn tags(
    doc: &dyn DocumentQuery,
    config: &TaxonomyLocators,
    brand: &str,
    highlights: &str,
    description: &str,
) -> Vec<String> {
    let mut tags = FallbackChain::new("tags", &config.tags).accumulate_unique(doc, |tag| {
        let tag = tag.trim();
        (!tag.is_empty()).then(|| tag.to_string())
    });

    if !brand.is_empty() {
        tags.push(brand.to_string());
    }

    let copy = format!("{} {}", plain_text(highlights), plain_text(description)).to_lowercase();
    for family in &config.tag_families {
        if family
            .synonyms
            .iter()
            .any(|synonym| copy.contains(synonym.to_lowercase().as_str()))
        {
            tags.push(family.tag.clone());
        }
    }

    dedupe_in_place(&mut tags);
    tags
}

fn dedupe_in_place(values: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    values.retain(|value| seen.insert(value.clone()));
}
