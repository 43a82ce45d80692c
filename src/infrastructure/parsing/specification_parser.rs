//! Specification table parser
//!
//! Tries the configured table selectors in priority order and reads the
//! first table found; tables are never merged. Two-cell rows become
//! canonical key / metric value pairs.

use tracing::debug;

use super::ParsingResult;
use super::config::SpecificationTableRules;
use super::document::DocumentQuery;
use crate::domain::normalization::{canonicalize_key, normalize_measurements};
use crate::domain::run_context::RunContext;
use crate::domain::specification::{SpecificationSet, column_key};

#[derive(Debug, Clone, Default)]
pub struct SpecificationTableParser {
    rules: SpecificationTableRules,
}

impl SpecificationTableParser {
    pub fn new(rules: SpecificationTableRules) -> Self {
        Self { rules }
    }

    /// Parse the page's specification table and record its keys in the run's key union.
    pub fn parse(&self, doc: &dyn DocumentQuery, ctx: &mut RunContext) -> ParsingResult<SpecificationSet> {
        let specs = self.parse_table(doc)?;
        register_keys(&specs, ctx);
        Ok(specs)
    }

    /// Parse without touching the run context.
    pub fn parse_table(&self, doc: &dyn DocumentQuery) -> ParsingResult<SpecificationSet> {
        for selector in &self.rules.tables {
            let Some(rows) = doc.table_rows(selector)? else {
                continue;
            };
            debug!("Using specification table {} ({} rows)", selector, rows.len());

            let mut specs = SpecificationSet::new();
            for row in rows {
                let [label, raw_value] = row.as_slice() else {
                    continue;
                };
                let Some(key) = canonicalize_key(label).map(column_key) else {
                    continue;
                };
                let Some(value) = self.clean_value(raw_value) else {
                    continue;
                };
                if let Some(previous) = specs.insert(key.as_str(), value) {
                    debug!("Specification {} repeated, replacing '{}'", key, previous);
                }
            }
            return Ok(specs);
        }

        debug!("No specification table found");
        Ok(SpecificationSet::new())
    }

    /// Trimmed, metric value; `None` for placeholders and oversized cells.
    fn clean_value(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty()
            || value.chars().count() > self.rules.max_value_length
            || self
                .rules
                .placeholder_values
                .iter()
                .any(|placeholder| value.eq_ignore_ascii_case(placeholder))
        {
            return None;
        }
        Some(normalize_measurements(value))
    }
}

pub fn register_keys(specs: &SpecificationSet, ctx: &mut RunContext) {
    for key in specs.keys() {
        if ctx.register_spec_key(key) {
            debug!("New specification column: {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalization::ConversionRate;
    use crate::infrastructure::parsing::document::HtmlDocument;

    fn ctx() -> RunContext {
        RunContext::new(ConversionRate::new(0.73).unwrap())
    }

    #[test]
    fn test_rows_become_canonical_metric_pairs() {
        let doc = HtmlDocument::parse(
            r#"<table id="product-attribute-specs-table">
                <tr><th>Weight</th><td>5 lbs</td></tr>
                <tr><th>OS Compatibility</th><td>Windows 10, 11</td></tr>
                <tr><th>Encoding Options</th><td>N/A</td></tr>
                <tr><th>Ribbon</th><td>-</td></tr>
                <tr><th colspan="2">Section header</th></tr>
                <tr><th>Interface</th><td>USB</td><td>extra</td></tr>
            </table>"#,
        );
        let mut ctx = ctx();
        let specs = SpecificationTableParser::default().parse(&doc, &mut ctx).unwrap();

        assert_eq!(specs.get("weight"), Some("2.27kg"));
        assert_eq!(specs.get("operating_systems"), Some("Windows 10, 11"));
        assert!(!specs.contains_key("encoding"));
        assert!(!specs.contains_key("ribbon"));
        assert!(!specs.contains_key("connectivity"));
        assert_eq!(specs.len(), 2);
        assert_eq!(ctx.spec_keys().len(), 2);
    }

    #[test]
    fn test_first_table_wins_without_merging() {
        let doc = HtmlDocument::parse(
            r#"<table class="other"><tr><td>Color</td><td>Red</td></tr></table>
               <table class="additional-attributes"><tr><td>Print Speed</td><td>200 cph</td></tr></table>"#,
        );
        let specs = SpecificationTableParser::default().parse_table(&doc).unwrap();
        assert_eq!(specs.keys().collect::<Vec<_>>(), vec!["print_speed"]);
    }

    #[test]
    fn test_synonym_collision_last_write_wins() {
        let doc = HtmlDocument::parse(
            r#"<table class="additional-attributes">
                <tr><td>Interface</td><td>USB</td></tr>
                <tr><td>Interfaces</td><td>USB, Ethernet</td></tr>
            </table>"#,
        );
        let specs = SpecificationTableParser::default().parse_table(&doc).unwrap();
        assert_eq!(specs.get("connectivity"), Some("USB, Ethernet"));
    }

    #[test]
    fn test_rows_named_like_core_columns_are_prefixed() {
        let doc = HtmlDocument::parse(
            r#"<table class="additional-attributes">
                <tr><td>Model</td><td>ZC31-000C000US00</td></tr>
                <tr><td>Brand</td><td>Zebra Technologies</td></tr>
                <tr><td>Price</td><td>Call</td></tr>
            </table>"#,
        );
        let specs = SpecificationTableParser::default().parse_table(&doc).unwrap();
        assert_eq!(specs.keys().collect::<Vec<_>>(), vec!["spec_brand", "spec_model", "spec_price"]);
        assert_eq!(specs.get("spec_model"), Some("ZC31-000C000US00"));
    }

    #[test]
    fn test_oversized_values_dropped() {
        let long = "x".repeat(301);
        let doc = HtmlDocument::parse(format!(
            r#"<table class="additional-attributes"><tr><td>Notes</td><td>{long}</td></tr></table>"#
        ));
        assert!(SpecificationTableParser::default().parse_table(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_page_without_table() {
        let doc = HtmlDocument::parse("<p>no table</p>");
        let mut ctx = ctx();
        assert!(SpecificationTableParser::default().parse(&doc, &mut ctx).unwrap().is_empty());
        assert!(ctx.spec_keys().is_empty());
    }
}
