//! File exporters for finished batches
//!
//! - `CsvExporter`: one flat row per record, core columns then specification keys
//! - `JsonExporter`: pretty array of records with nested specification maps
//! - `SummaryExporter`: run statistics

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::ExportConfig;
use crate::domain::export_batch::ExportBatch;
use crate::domain::ports::Exporter;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create output directory {parent:?}"))?;
    }
    Ok(())
}

/// Exporters enabled in the configuration, writing under `output_dir`.
pub fn exporters_for(config: &ExportConfig) -> Vec<Box<dyn Exporter>> {
    let mut exporters: Vec<Box<dyn Exporter>> = Vec::new();
    if config.csv {
        exporters.push(Box::new(CsvExporter::new(
            config.output_dir.join(format!("{}.csv", config.file_stem)),
        )));
    }
    if config.json {
        exporters.push(Box::new(JsonExporter::new(
            config.output_dir.join(format!("{}.json", config.file_stem)),
        )));
    }
    if config.summary {
        exporters.push(Box::new(SummaryExporter::new(config.output_dir.join(&config.summary_file))));
    }
    exporters
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for CsvExporter {
    fn name(&self) -> &str {
        "csv"
    }

    fn export(&self, batch: &ExportBatch) -> Result<()> {
        ensure_parent(&self.path)?;
        let mut writer =
            csv::Writer::from_path(&self.path).with_context(|| format!("Failed to create {:?}", self.path))?;

        writer.write_record(batch.columns()).context("Failed to write CSV header")?;
        for row in batch.rows() {
            writer.write_record(&row).context("Failed to write CSV row")?;
        }
        writer.flush().context("Failed to flush CSV file")?;

        info!("💾 Saved CSV: {} records to {:?}", batch.len(), self.path);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JsonExporter {
    path: PathBuf,
}

impl JsonExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &str {
        "json"
    }

    fn export(&self, batch: &ExportBatch) -> Result<()> {
        ensure_parent(&self.path)?;
        let content = serde_json::to_string_pretty(batch.records()).context("Failed to serialize records")?;
        fs::write(&self.path, content).with_context(|| format!("Failed to write {:?}", self.path))?;

        info!("💾 Saved JSON: {} records to {:?}", batch.len(), self.path);
        Ok(())
    }
}

/// Statistics written by [`SummaryExporter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub scraped_at: String,
    pub total_records: usize,
    /// Records per brand; records without a brand count as "Unknown"
    pub brands: BTreeMap<String, usize>,
    pub with_prices: usize,
    pub with_converted_prices: usize,
    pub with_descriptions: usize,
    pub with_print_speeds: usize,
    pub avg_description_length: usize,
    pub specification_keys: usize,
}

impl RunSummary {
    pub fn from_batch(batch: &ExportBatch) -> Self {
        let records = batch.records();
        let mut brands = BTreeMap::new();
        for record in records {
            let brand = if record.brand.is_empty() { "Unknown" } else { record.brand.as_str() };
            *brands.entry(brand.to_string()).or_insert(0) += 1;
        }

        let description_lengths: Vec<usize> = records
            .iter()
            .filter(|r| !r.description.is_empty())
            .map(|r| r.description.chars().count())
            .collect();
        let avg_description_length = if description_lengths.is_empty() {
            0
        } else {
            description_lengths.iter().sum::<usize>() / description_lengths.len()
        };

        Self {
            run_id: batch.run_id().to_string(),
            scraped_at: batch.scraped_at().to_rfc3339(),
            total_records: records.len(),
            brands,
            with_prices: records.iter().filter(|r| !r.price.is_empty()).count(),
            with_converted_prices: records.iter().filter(|r| !r.converted_price.is_empty()).count(),
            with_descriptions: description_lengths.len(),
            with_print_speeds: records
                .iter()
                .filter(|r| !r.specifications.get("print_speed").unwrap_or_default().is_empty())
                .count(),
            avg_description_length,
            specification_keys: batch.spec_keys().len(),
        }
    }

    pub fn log(&self) {
        info!("📊 Summary:");
        info!("  Total: {} records", self.total_records);
        info!("  With prices: {}", self.with_prices);
        info!("  With print speeds: {}", self.with_print_speeds);
        info!("  With descriptions: {}", self.with_descriptions);
        info!("  Avg description length: {} chars", self.avg_description_length);
        info!("  Specification columns: {}", self.specification_keys);
        for (brand, count) in &self.brands {
            info!("  {}: {}", brand, count);
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryExporter {
    path: PathBuf,
}

impl SummaryExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for SummaryExporter {
    fn name(&self) -> &str {
        "summary"
    }

    fn export(&self, batch: &ExportBatch) -> Result<()> {
        ensure_parent(&self.path)?;
        let summary = RunSummary::from_batch(batch);
        let content = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        fs::write(&self.path, content).with_context(|| format!("Failed to write {:?}", self.path))?;

        summary.log();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{CORE_COLUMNS, CanonicalRecord};
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn batch() -> ExportBatch {
        let mut zebra = CanonicalRecord::new("https://shop.example/id-card-printers/zebra/zc300");
        zebra.brand = "Zebra".to_string();
        zebra.model = "Zebra ZC300".to_string();
        zebra.description = "<p>Fast, simple printing</p>".to_string();
        zebra.price = "1299.00".to_string();
        zebra.converted_price = "1779.45".to_string();
        zebra.images = vec![
            "https://cdn.example/zc300-front.jpg".to_string(),
            "https://cdn.example/zc300-side.jpg".to_string(),
            "https://cdn.example/zc300-back.jpg".to_string(),
        ];
        zebra.categories = vec!["Id Card Printers".to_string(), "Zebra".to_string()];
        zebra.specifications.insert("print_speed", "900 cards/hour");

        let mut unnamed = CanonicalRecord::new("https://shop.example/id-card-printers/misc/p1");
        unnamed.model = "P1".to_string();
        unnamed.specifications.insert("warranty", "2 years");

        let union: BTreeSet<String> = ["print_speed", "warranty"].into_iter().map(String::from).collect();
        ExportBatch::new(vec![zebra, unnamed], &union)
    }

    #[test]
    fn test_csv_is_flat_and_complete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("printers.csv");
        CsvExporter::new(&path).export(&batch()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), CORE_COLUMNS.len() + 2);
        assert_eq!(&headers[headers.len() - 2], "print_speed");

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
        assert_eq!(&rows[0][column("featured_image")], "https://cdn.example/zc300-front.jpg");
        assert_eq!(
            &rows[0][column("gallery_images")],
            "https://cdn.example/zc300-side.jpg, https://cdn.example/zc300-back.jpg"
        );
        assert_eq!(&rows[0][column("categories")], "Id Card Printers, Zebra");
        assert_eq!(&rows[0][column("warranty")], "");
        assert_eq!(&rows[1][column("warranty")], "2 years");
    }

    #[test]
    fn test_json_keeps_nested_shapes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("printers.json");
        JsonExporter::new(&path).export(&batch()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["images"].as_array().unwrap().len(), 3);
        assert_eq!(records[0]["specifications"]["warranty"], "");
        assert_eq!(records[1]["specifications"]["print_speed"], "");
        assert_eq!(records[1]["stock_status"], "instock");
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary::from_batch(&batch());
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.brands.get("Zebra"), Some(&1));
        assert_eq!(summary.brands.get("Unknown"), Some(&1));
        assert_eq!(summary.with_prices, 1);
        assert_eq!(summary.with_converted_prices, 1);
        assert_eq!(summary.with_descriptions, 1);
        assert_eq!(summary.with_print_speeds, 1);
        assert_eq!(summary.avg_description_length, "<p>Fast, simple printing</p>".len());
        assert_eq!(summary.specification_keys, 2);
    }

    #[test]
    fn test_exporters_follow_toggles() {
        let config = ExportConfig {
            json: false,
            ..ExportConfig::default()
        };
        let names: Vec<String> = exporters_for(&config).iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["csv".to_string(), "summary".to_string()]);
    }
}
