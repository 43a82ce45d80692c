//! Price cleaning and fixed-rate currency conversion
//!
//! The configured rate is expressed as source-currency units per one
//! target-currency unit (e.g. `0.73` USD buys one CAD), so converting a
//! scraped source price divides by the rate.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("amount pattern must compile"));

/// Source-currency units per one target-currency unit, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionRate(f64);

impl ConversionRate {
    /// Returns `None` unless the rate is finite and strictly positive.
    pub fn new(source_per_target: f64) -> Option<Self> {
        (source_per_target.is_finite() && source_per_target > 0.0).then_some(Self(source_per_target))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Pull the first decimal amount out of a price label such as `"$1,299.00"`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let found = AMOUNT.find(raw)?;
    found.as_str().replace(',', "").parse::<f64>().ok()
}

pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Cleaned source price with two decimals, or `None` when nothing numeric is present.
pub fn clean_price(raw: &str) -> Option<String> {
    parse_amount(raw).map(format_amount)
}

/// Convert a scraped source price into the target currency.
///
/// Non-numeric input yields an empty string.
pub fn to_target_currency(amount: &str, rate: ConversionRate) -> String {
    match parse_amount(amount) {
        Some(value) => format_amount(value / rate.value()),
        None => {
            debug!("Price '{}' is not numeric, skipping conversion", amount);
            String::new()
        }
    }
}
