//! Shipping weight and dimensions read back from normalized specifications
//!
//! Runs after the specification step, so imperial values have already been
//! converted to `kg` / `mm`. Grams and centimetres are scaled.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::product::ShippingInfo;
use crate::domain::specification::SpecificationSet;

pub const WEIGHT_KEYS: &[&str] = &["shipping_weight", "weight"];
pub const DIMENSION_KEYS: &[&str] = &["shipping_dimensions", "dimensions"];

static WEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(kg|g)\b").expect("weight pattern must compile"));

static DIMENSIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*[x×]\s*(\d+(?:\.\d+)?)\s*[x×]\s*(\d+(?:\.\d+)?)\s*(mm|cm)\b")
        .expect("dimension pattern must compile")
});

pub fn from_specifications(specs: &SpecificationSet) -> ShippingInfo {
    let mut shipping = ShippingInfo::default();

    if let Some(kg) = WEIGHT_KEYS.iter().filter_map(|key| specs.get(key)).find_map(weight_kg) {
        shipping.weight_kg = format!("{kg:.2}");
    }

    if let Some([length, width, height]) = DIMENSION_KEYS
        .iter()
        .filter_map(|key| specs.get(key))
        .find_map(dimensions_mm)
    {
        shipping.length_mm = format!("{length:.1}");
        shipping.width_mm = format!("{width:.1}");
        shipping.height_mm = format!("{height:.1}");
    }

    shipping
}

fn weight_kg(value: &str) -> Option<f64> {
    let caps = WEIGHT.captures(value)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    Some(if unit == "g" { amount / 1000.0 } else { amount })
}

fn dimensions_mm(value: &str) -> Option<[f64; 3]> {
    let caps = DIMENSIONS.captures(value)?;
    let scale = if caps.get(4)?.as_str().eq_ignore_ascii_case("cm") { 10.0 } else { 1.0 };
    let side = |i: usize| -> Option<f64> { Some(caps.get(i)?.as_str().parse::<f64>().ok()? * scale) };
    Some([side(1)?, side(2)?, side(3)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(pairs: &[(&str, &str)]) -> SpecificationSet {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_weight_and_dimensions() {
        let shipping = from_specifications(&specs(&[
            ("weight", "2.27kg"),
            ("dimensions", "236.2 x 312.4 x 462.3mm"),
        ]));
        assert_eq!(shipping.weight_kg, "2.27");
        assert_eq!(shipping.length_mm, "236.2");
        assert_eq!(shipping.width_mm, "312.4");
        assert_eq!(shipping.height_mm, "462.3");
    }

    #[test]
    fn test_shipping_keys_take_priority_and_units_scale() {
        let shipping = from_specifications(&specs(&[
            ("shipping_weight", "4500 g"),
            ("weight", "3 kg"),
            ("shipping_dimensions", "30 x 40 x 50 cm"),
        ]));
        assert_eq!(shipping.weight_kg, "4.50");
        assert_eq!(shipping.length_mm, "300.0");
        assert_eq!(shipping.height_mm, "500.0");
    }

    #[test]
    fn test_unparseable_shipping_value_falls_back() {
        let shipping = from_specifications(&specs(&[("shipping_weight", "see carton"), ("weight", "3 kg")]));
        assert_eq!(shipping.weight_kg, "3.00");
    }

    #[test]
    fn test_unparseable_values_leave_defaults() {
        let shipping = from_specifications(&specs(&[("weight", "light"), ("dimensions", "compact")]));
        assert_eq!(shipping, ShippingInfo::default());
    }
}
