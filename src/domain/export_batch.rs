//! Uniformly shaped records ready for an exporter
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::product::{CORE_COLUMNS, CanonicalRecord};
use super::run_context::RunContext;

/// Records of one run with every specification map conformed to the run's key union.
#[derive(Debug, Clone)]
pub struct ExportBatch {
    run_id: Uuid,
    scraped_at: DateTime<Utc>,
    spec_keys: Vec<String>,
    records: Vec<CanonicalRecord>,
}

impl ExportBatch {
    pub fn new(records: Vec<CanonicalRecord>, spec_keys: &BTreeSet<String>) -> Self {
        Self::with_identity(Uuid::nil(), Utc::now(), records, spec_keys)
    }

    pub fn from_run(records: Vec<CanonicalRecord>, ctx: &RunContext) -> Self {
        Self::with_identity(ctx.run_id(), ctx.started_at(), records, ctx.spec_keys())
    }

    fn with_identity(
        run_id: Uuid,
        scraped_at: DateTime<Utc>,
        records: Vec<CanonicalRecord>,
        spec_keys: &BTreeSet<String>,
    ) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                record.specifications = record.specifications.conformed(spec_keys);
                record
            })
            .collect();

        Self {
            run_id,
            scraped_at,
            spec_keys: spec_keys.iter().cloned().collect(),
            records,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    /// Sorted specification keys of the run.
    pub fn spec_keys(&self) -> &[String] {
        &self.spec_keys
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Core columns followed by the sorted specification keys.
    pub fn columns(&self) -> Vec<String> {
        CORE_COLUMNS
            .iter()
            .map(|c| (*c).to_string())
            .chain(self.spec_keys.iter().cloned())
            .collect()
    }

    /// One row per record, in [`Self::columns`] order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().map(|record| {
            CORE_COLUMNS
                .iter()
                .map(|column| record.core_value(column))
                .chain(
                    self.spec_keys
                        .iter()
                        .map(|key| record.specifications.get(key).unwrap_or_default().to_string()),
                )
                .collect()
        })
    }
}
