//! HTML extraction for catalog pages
//!
//! - `document`: the [`DocumentQuery`] capability and its `scraper` implementation
//! - `strategy`: locators and fallback chains
//! - `config`: every locator chain, as data
//! - `extractors`: one module per group of record fields
//! - `specification_parser` / `record_aggregator`: page-level assembly
//! - `category_page_parser`: product link discovery on listing pages
//! - `fragment_repair`: clean-up of extracted description markup

pub mod category_page_parser;
pub mod config;
pub mod context;
pub mod document;
pub mod extractors;
pub mod fragment_repair;
pub mod record_aggregator;
pub mod specification_parser;
pub mod strategy;

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use category_page_parser::CategoryPageParser;
pub use config::ParsingConfig;
pub use context::PageContext;
pub use document::{DocumentQuery, HtmlDocument};
pub use record_aggregator::RecordAggregator;
pub use specification_parser::SpecificationTableParser;
pub use strategy::{FallbackChain, Locator, PatternSource};
