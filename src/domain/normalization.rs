//! Value normalization shared by the extractors
//!
//! - `measurement`: imperial quantities in free text to metric
//! - `currency`: price cleaning and fixed-rate conversion
//! - `spec_keys`: canonical keys for specification labels

pub mod currency;
pub mod measurement;
pub mod spec_keys;

pub use currency::{ConversionRate, clean_price, parse_amount, to_target_currency};
pub use measurement::normalize as normalize_measurements;
pub use spec_keys::canonicalize as canonicalize_key;
