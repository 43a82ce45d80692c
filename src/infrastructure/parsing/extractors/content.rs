//! Description, highlights, short description and feature bullets
use std::collections::HashSet;

use super::truncate_chars;
use crate::infrastructure::parsing::ParsingResult;
use crate::infrastructure::parsing::config::{ContentLocators, FeatureRules};
use crate::infrastructure::parsing::document::{DocumentQuery, first_paragraph, plain_text};
use crate::infrastructure::parsing::fragment_repair::repair;
use crate::infrastructure::parsing::strategy::{FallbackChain, Locator};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub description: String,
    pub highlights: String,
    pub short_description: String,
    pub features: Vec<String>,
}

pub fn extract(doc: &dyn DocumentQuery, config: &ContentLocators) -> ParsingResult<Content> {
    let description = repaired_fragment(doc, "description", &config.description);
    let highlights = repaired_fragment(doc, "highlights", &config.highlights);
    let short_description = short_description(&highlights, &description, config.short_description_limit);
    let features = features(doc, &config.features)?;

    Ok(Content {
        description,
        highlights,
        short_description,
        features,
    })
}

fn repaired_fragment(doc: &dyn DocumentQuery, field: &str, locators: &[Locator]) -> String {
    FallbackChain::new(field, locators)
        .first_valid(doc, |markup| {
            let repaired = repair(markup);
            (!plain_text(&repaired).is_empty()).then_some(repaired)
        })
        .unwrap_or_default()
}

/// Highlights text cut to `limit`, else the description's first paragraph.
pub fn short_description(highlights: &str, description: &str, limit: usize) -> String {
    let text = plain_text(highlights);
    if !text.is_empty() {
        return truncate_chars(&text, limit);
    }
    first_paragraph(description).unwrap_or_default()
}

/// List items outside the description whose length is strictly within bounds.
pub fn features(doc: &dyn DocumentQuery, rules: &FeatureRules) -> ParsingResult<Vec<String>> {
    let mut seen = HashSet::new();
    Ok(doc
        .texts_outside(&rules.item_selector, &rules.excluded_container)?
        .into_iter()
        .filter(|item| {
            let len = item.chars().count();
            len > rules.min_length && len < rules.max_length
        })
        .filter(|item| seen.insert(item.clone()))
        .take(rules.max_items)
        .collect())
}
