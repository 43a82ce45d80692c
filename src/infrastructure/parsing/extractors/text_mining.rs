//! Specification values mined from visible page text
//!
//! Only fills keys the specification table did not provide.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::specification::SpecificationSet;

static CARDS_PER_HOUR: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)(\d+)\s*cards?\s*per\s*hour", r"(?i)(\d+)\s*cph\b"]
        .into_iter()
        .map(|p| Regex::new(p).expect("speed pattern must compile"))
        .collect()
});

static SECONDS_PER_CARD: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(\d+)\s*seconds?\s*per\s*card",
        r"(?i)full[\s-]*colou?r\D{0,40}?(\d+)\s*seconds?",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("seconds pattern must compile"))
    .collect()
});

static RESOLUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\d+\s*x\s*\d+|\d+)\s*dpi").expect("resolution pattern must compile"));

static WARRANTY: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)(\d+)[\s-]*years?\s*warranty", r"(?i)warranty[:\s]*(\d+)\s*years?"]
        .into_iter()
        .map(|p| Regex::new(p).expect("warranty pattern must compile"))
        .collect()
});

/// Add `print_speed`, `print_resolution` and `warranty` when absent. Returns the keys added.
pub fn fill_missing(page_text: &str, specs: &mut SpecificationSet) -> Vec<&'static str> {
    let mut added = Vec::new();

    if !specs.contains_key("print_speed") {
        if let Some(speed) = print_speed(page_text) {
            specs.insert("print_speed", speed);
            added.push("print_speed");
        }
    }
    if !specs.contains_key("print_resolution") {
        if let Some(found) = RESOLUTION.find(page_text) {
            specs.insert("print_resolution", found.as_str().trim());
            added.push("print_resolution");
        }
    }
    if !specs.contains_key("warranty") {
        if let Some(years) = first_capture(&WARRANTY, page_text) {
            specs.insert("warranty", format!("{years} years"));
            added.push("warranty");
        }
    }

    if !added.is_empty() {
        debug!("Mined from page text: {}", added.join(", "));
    }
    added
}

pub fn print_speed(text: &str) -> Option<String> {
    if let Some(cards) = first_capture(&CARDS_PER_HOUR, text) {
        return Some(format!("{cards} cards/hour"));
    }
    let seconds: u32 = first_capture(&SECONDS_PER_CARD, text)?.parse().ok()?;
    if seconds == 0 {
        return None;
    }
    Some(format!("{} cards/hour (estimated from {seconds}s per card)", 3600 / seconds))
}

fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|pattern| pattern.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mines_all_three_keys() {
        let mut specs = SpecificationSet::new();
        let added = fill_missing(
            "Prints 225 cards per hour at 300 x 600 dpi. Backed by a 3-year warranty.",
            &mut specs,
        );
        assert_eq!(added, vec!["print_speed", "print_resolution", "warranty"]);
        assert_eq!(specs.get("print_speed"), Some("225 cards/hour"));
        assert_eq!(specs.get("print_resolution"), Some("300 x 600 dpi"));
        assert_eq!(specs.get("warranty"), Some("3 years"));
    }

    #[test]
    fn test_table_values_are_kept() {
        let mut specs = SpecificationSet::new();
        specs.insert("warranty", "Lifetime");
        fill_missing("2 year warranty", &mut specs);
        assert_eq!(specs.get("warranty"), Some("Lifetime"));
    }

    #[test]
    fn test_speed_variants() {
        assert_eq!(print_speed("up to 180 cph"), Some("180 cards/hour".to_string()));
        assert_eq!(
            print_speed("Full color in 18 seconds"),
            Some("200 cards/hour (estimated from 18s per card)".to_string())
        );
        assert_eq!(print_speed("warranty: 2 years"), None);
    }

    #[test]
    fn test_warranty_colon_form() {
        let mut specs = SpecificationSet::new();
        fill_missing("Warranty: 2 years parts and labor", &mut specs);
        assert_eq!(specs.get("warranty"), Some("2 years"));
    }
}
