//! Price, currency conversion and availability
use crate::domain::normalization::currency::{ConversionRate, format_amount, parse_amount, to_target_currency};
use crate::domain::product::StockStatus;
use crate::infrastructure::parsing::config::CommerceLocators;
use crate::infrastructure::parsing::document::DocumentQuery;
use crate::infrastructure::parsing::strategy::FallbackChain;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pricing {
    pub price: String,
    pub converted_price: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Availability {
    pub status: StockStatus,
    pub quantity: Option<u32>,
}

/// First price candidate that parses as a positive amount, plus its converted value.
pub fn price(doc: &dyn DocumentQuery, config: &CommerceLocators, rate: ConversionRate) -> Pricing {
    let amount = FallbackChain::new("price", &config.price)
        .first_valid(doc, |candidate| parse_amount(candidate).filter(|amount| *amount > 0.0));

    match amount {
        Some(amount) => {
            let price = format_amount(amount);
            let converted_price = to_target_currency(&price, rate);
            Pricing { price, converted_price }
        }
        None => Pricing::default(),
    }
}

pub fn availability(doc: &dyn DocumentQuery, config: &CommerceLocators) -> Availability {
    let status = FallbackChain::new("stock_status", &config.stock_status)
        .first_valid(doc, StockStatus::from_label)
        .unwrap_or_default();
    let quantity = FallbackChain::new("stock_quantity", &config.stock_quantity)
        .first_valid(doc, |candidate| candidate.parse::<u32>().ok());

    Availability { status, quantity }
}
