//! Imperial to metric conversion for free-text specification values
//!
//! Three unit families are recognised: inches (including `W x H x D` triples
//! that share one trailing unit), feet and pounds. Matches are replaced in
//! place and everything else is left untouched.
//!
//! A spaced bare `in` only counts as a unit at the end of the text, before
//! punctuation or before a dimension separator, so `"12 in stock"` stays as is.
//!
//! Each distinct matched literal is replaced at its first occurrence only.
//! A token repeated verbatim in the same text (`"5 lbs or 5 lbs"`) is therefore
//! converted once and the repeat stays imperial.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const MM_PER_INCH: f64 = 25.4;
pub const MM_PER_FOOT: f64 = 304.8;
pub const KG_PER_POUND: f64 = 0.453_592;

static INCHES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b((?:\d+(?:\.\d+)?\s*[x×]\s*){0,2}\d+(?:\.\d+)?)(?:\s*(?:inches|inch)\b|\s*in\.|in\b|"|\s+in(?P<tail>$|[,;)/]|\s+[x×]\s))"#,
    )
    .expect("inch pattern must compile")
});

static FEET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:feet|foot|ft)\b").expect("feet pattern must compile")
});

static POUNDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(?:lbs|lb|pounds|pound)\b").expect("pound pattern must compile")
});

static DIMENSION_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[x×]\s*").expect("separator pattern must compile"));

/// Convert every inch, foot and pound quantity in `text` to millimetres or kilograms.
pub fn normalize(text: &str) -> String {
    let mut replacements: Vec<(String, String)> = Vec::new();

    collect(&INCHES, text, convert_inches, &mut replacements);
    collect(&FEET, text, convert_feet, &mut replacements);
    collect(&POUNDS, text, convert_pounds, &mut replacements);

    let mut result = text.to_string();
    for (literal, metric) in &replacements {
        result = result.replacen(literal.as_str(), metric, 1);
    }
    result
}

fn collect(
    pattern: &Regex,
    text: &str,
    convert: fn(&Captures<'_>) -> Option<String>,
    replacements: &mut Vec<(String, String)>,
) {
    for captures in pattern.captures_iter(text) {
        let Some(whole) = captures.get(0) else { continue };
        let literal = whole.as_str();
        if replacements.iter().any(|(seen, _)| seen == literal) {
            continue;
        }
        if let Some(metric) = convert(&captures) {
            replacements.push((literal.to_string(), metric));
        }
    }
}

fn convert_inches(captures: &Captures<'_>) -> Option<String> {
    let numbers = captures.get(1)?.as_str();
    let converted: Option<Vec<String>> = DIMENSION_SEPARATOR
        .split(numbers)
        .map(|n| n.trim().parse::<f64>().ok().map(|v| format!("{:.1}", v * MM_PER_INCH)))
        .collect();
    let tail = captures.name("tail").map_or("", |m| m.as_str());
    Some(format!("{}mm{tail}", converted?.join(" x ")))
}

fn convert_feet(captures: &Captures<'_>) -> Option<String> {
    let feet: f64 = captures.get(1)?.as_str().parse().ok()?;
    Some(format!("{:.1}mm", feet * MM_PER_FOOT))
}

fn convert_pounds(captures: &Captures<'_>) -> Option<String> {
    let pounds: f64 = captures.get(1)?.as_str().parse().ok()?;
    Some(format!("{:.2}kg", pounds * KG_PER_POUND))
}
