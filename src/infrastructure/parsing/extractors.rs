//! Field extractors for product pages
//!
//! Each extractor reads the document through [`DocumentQuery`] and returns the
//! values for its group of fields; the record aggregator decides where they
//! land. Nothing here mutates a record.
//!
//! [`DocumentQuery`]: super::document::DocumentQuery

pub mod commerce;
pub mod content;
pub mod identity;
pub mod media;
pub mod related;
pub mod seo;
pub mod shipping;
pub mod taxonomy;
pub mod text_mining;

/// Lower-case, ASCII-dash separated form of `text`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// `text` cut to `limit` characters with `...` appended when it was longer.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Title-case a URL path segment (`"dual-sided"` → `"Dual Sided"`).
pub fn title_case_segment(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Acme X100"), "acme-x100");
        assert_eq!(slugify("  Magicard 600 (Duo) "), "magicard-600-duo");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
    }

    #[test]
    fn test_title_case_segment() {
        assert_eq!(title_case_segment("dual-sided"), "Dual Sided");
        assert_eq!(title_case_segment("id-card-printers"), "Id Card Printers");
    }
}
