//! Application layer: the catalog walk and hand-off to exporters

pub mod catalog_walker;

pub use catalog_walker::{CatalogWalker, export_records};
