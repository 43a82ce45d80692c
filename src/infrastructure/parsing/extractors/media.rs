//! Product images
use crate::infrastructure::parsing::config::MediaLocators;
use crate::infrastructure::parsing::document::DocumentQuery;
use crate::infrastructure::parsing::strategy::FallbackChain;

/// Absolute image URLs from every image locator, unique, in order of first appearance.
pub fn extract(doc: &dyn DocumentQuery, config: &MediaLocators) -> Vec<String> {
    let markers: Vec<String> = config.reject_markers.iter().map(|m| m.to_lowercase()).collect();

    FallbackChain::new("images", &config.images).accumulate_unique(doc, |candidate| {
        // JSON gallery data escapes slashes
        let url = candidate.replace(r"\/", "/");
        let lowered = url.to_lowercase();

        let absolute = lowered.starts_with("http://") || lowered.starts_with("https://");
        let placeholder = markers.iter().any(|marker| lowered.contains(marker.as_str()));
        (absolute && !placeholder).then_some(url)
    })
}
