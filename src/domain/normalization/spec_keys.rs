//! Canonical keys for specification labels
//!
//! Labels are lowercased, punctuation and separators become word breaks, and
//! words are joined with `_`. Trailing noise words are stripped and the
//! result is mapped through [`SYNONYMS`]. No synonym target is itself a
//! synonym source, so canonicalizing a canonical key returns it unchanged.

/// Trailing words that carry no meaning in a key (`"Encoding Options"` → `encoding`).
pub const NOISE_SUFFIXES: &[&str] = &["_options", "_capability", "_accepted"];

/// Ordered rename table applied after suffix stripping.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("os", "operating_systems"),
    ("os_compatibility", "operating_systems"),
    ("operating_system", "operating_systems"),
    ("compatible_operating_systems", "operating_systems"),
    ("supported_operating_systems", "operating_systems"),
    ("interface", "connectivity"),
    ("interfaces", "connectivity"),
    ("resolution", "print_resolution"),
    ("printing_resolution", "print_resolution"),
    ("printing_speed", "print_speed"),
    ("print_method", "printing_method"),
    ("print_technology", "printing_method"),
    ("printing_technology", "printing_method"),
    ("input_hopper", "card_capacity"),
    ("input_hopper_capacity", "card_capacity"),
    ("hopper_capacity", "card_capacity"),
    ("input_capacity", "card_capacity"),
    ("card_size", "card_sizes"),
    ("supported_card_sizes", "card_sizes"),
    ("printer_dimensions", "dimensions"),
    ("dimensions_w_x_h_x_d", "dimensions"),
    ("dimensions_w_x_d_x_h", "dimensions"),
    ("printer_weight", "weight"),
    ("net_weight", "weight"),
    ("magnetic_stripe_encoding", "encoding"),
    ("encoder", "encoding"),
    ("warranty_period", "warranty"),
    ("printer_warranty", "warranty"),
];

const WORD_BREAKS: &[char] = &['_', '-', '/', '\\', '(', ')', '[', ']', ',', ':', ';', '&', '+', '|'];

/// Canonical key for a raw label, or `None` when nothing usable remains.
pub fn canonicalize(label: &str) -> Option<String> {
    let lowered = label.to_lowercase();

    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            cleaned.push(ch);
        } else if ch.is_whitespace() || WORD_BREAKS.contains(&ch) {
            cleaned.push(' ');
        }
    }

    let mut key = cleaned.split_whitespace().collect::<Vec<_>>().join("_");

    while let Some(suffix) = NOISE_SUFFIXES
        .iter()
        .find(|suffix| key.len() > suffix.len() && key.ends_with(*suffix))
    {
        key.truncate(key.len() - suffix.len());
    }

    if key.is_empty() {
        return None;
    }

    match SYNONYMS.iter().find(|(from, _)| *from == key) {
        Some((_, to)) => Some((*to).to_string()),
        None => Some(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Print Speed", "print_speed")]
    #[case("Encoding Options", "encoding")]
    #[case("Card Thickness Accepted:", "card_thickness")]
    #[case("OS Compatibility", "operating_systems")]
    #[case("Interface", "connectivity")]
    #[case("Dimensions (W x H x D)", "dimensions")]
    #[case("Printer's Warranty", "printers_warranty")]
    #[case("Input Hopper Capacity", "card_capacity")]
    #[case("  Print  Resolution ", "print_resolution")]
    #[case("Lamination Capability Options", "lamination")]
    fn test_canonical_keys(#[case] label: &str, #[case] expected: &str) {
        assert_eq!(canonicalize(label).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(":-/")]
    fn test_unusable_labels(#[case] label: &str) {
        assert_eq!(canonicalize(label), None);
    }

    #[test]
    fn test_noise_word_alone_is_kept() {
        assert_eq!(canonicalize("Options").as_deref(), Some("options"));
    }

    #[test]
    fn test_synonym_targets_are_fixed_points() {
        for (from, to) in SYNONYMS {
            assert!(
                SYNONYMS.iter().all(|(source, _)| source != to),
                "synonym target {to} (from {from}) is also a source"
            );
            assert_eq!(canonicalize(to).as_deref(), Some(*to));
        }
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for label in ["Magnetic Stripe Encoding", "Print Method", "Warranty Period", "Card Size"] {
            let once = canonicalize(label).unwrap();
            assert_eq!(canonicalize(&once).as_deref(), Some(once.as_str()));
        }
    }
}
