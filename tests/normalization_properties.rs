//! Property checks for the text normalizers
use proptest::prelude::*;

use catalog_harvester::domain::normalization::{canonicalize_key, normalize_measurements};
use catalog_harvester::infrastructure::parsing::fragment_repair::{BALANCED_TAGS, repair, tag_balance};

fn markup_token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "<div>",
        "</div>",
        "<div class=\"row\">",
        "<section>",
        "</section>",
        "<article class=\"a\">",
        "</article>",
        "<div data-element=\"main\">",
        "<div data-content-type=\"html\">",
        "<p>",
        "</p>",
        "Prints both sides",
    ])
}

fn imperial_unit() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![" inches", " inch", " in.", "\"", " ft", " feet", " lbs", " lb", " pounds"])
}

proptest! {
    #[test]
    fn repaired_fragments_never_close_more_than_they_open(tokens in prop::collection::vec(markup_token(), 0..40)) {
        let repaired = repair(&tokens.join(" "));
        for tag in BALANCED_TAGS {
            let (open, close) = tag_balance(&repaired, tag);
            prop_assert!(close <= open, "{tag}: {open} open, {close} close in {repaired}");
        }
    }

    #[test]
    fn single_measurement_normalization_is_idempotent(
        prefix in "[a-z]{0,8} ",
        whole in 0u32..500,
        fraction in prop::option::of(0u32..10),
        unit in imperial_unit(),
        suffix in " [a-z]{0,8}",
    ) {
        let number = fraction.map_or_else(|| whole.to_string(), |f| format!("{whole}.{f}"));
        let text = format!("{prefix}{number}{unit}{suffix}");

        let once = normalize_measurements(&text);
        prop_assert!(once.contains("mm") || once.contains("kg"), "{text} -> {once}");
        prop_assert_eq!(normalize_measurements(&once), once);
    }

    #[test]
    fn metric_text_is_left_alone(whole in 0u32..5000, unit in prop::sample::select(vec!["mm", "kg", "cm", "g"])) {
        let text = format!("{whole}.5{unit}");
        prop_assert_eq!(normalize_measurements(&text), text);
    }

    #[test]
    fn canonical_keys_are_fixed_points(label in "[A-Za-z0-9 ()/:_-]{0,40}") {
        if let Some(key) = canonicalize_key(&label) {
            prop_assert_eq!(canonicalize_key(&key), Some(key.clone()));
            prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
    }
}
