//! Catalog Harvester - product page extraction and normalization for retail catalog import
//!
//! Walks a retailer's category pages, extracts every product page into a
//! canonical record and exports the run as flat CSV, JSON and a summary.

pub mod application;
pub mod domain;
pub mod infrastructure;
