//! Domain module - catalog records, normalization rules and capabilities
//!
//! Everything here is independent of HTML and HTTP:
//! - `product` / `specification`: the canonical record and its spec map
//! - `normalization`: units, currency and key vocabulary
//! - `url_classifier`: product page detection
//! - `run_context` / `export_batch`: run-wide state and exporter input
//! - `ports`: the fetch and export capabilities

pub mod export_batch;
pub mod normalization;
pub mod ports;
pub mod product;
pub mod run_context;
pub mod specification;
pub mod url_classifier;

pub use export_batch::ExportBatch;
pub use normalization::ConversionRate;
pub use ports::{Exporter, PageFetcher};
pub use product::{CanonicalRecord, SeoInfo, ShippingInfo, StockStatus};
pub use run_context::RunContext;
pub use specification::SpecificationSet;
pub use url_classifier::{UrlClassifier, UrlClassifierConfig};
