//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting inventory records and the format registry.

use tabled::{Table, Tabled};

use geoinventory_core::drivers::Driver;
use geoinventory_core::operations::ScanReport;
use geoinventory_core::types::MetadataRecord;

/// Longest CRS text shown in a table cell; WKT strings are cut short.
const MAX_CRS_WIDTH: usize = 40;

/// Table row representation for displaying one inventory record.
#[derive(Tabled)]
pub struct RecordRow {
    /// File name.
    #[tabled(rename = "Name")]
    pub name: String,
    /// `vector` or `raster`.
    #[tabled(rename = "Type")]
    pub data_type: String,
    /// Driver name reported by GDAL.
    #[tabled(rename = "Format")]
    pub format: String,
    /// Size in MiB.
    #[tabled(rename = "MB")]
    pub volume: String,
    /// Coordinate Reference System, possibly abbreviated.
    #[tabled(rename = "CRS")]
    pub crs: String,
    /// Bounding extent.
    #[tabled(rename = "Extent")]
    pub extent: String,
}

impl From<&MetadataRecord> for RecordRow {
    fn from(record: &MetadataRecord) -> Self {
        Self {
            name: record.name.clone(),
            data_type: record.data_type.to_string(),
            format: record.format.clone(),
            volume: format!("{:.2}", record.volume_in_mb),
            crs: abbreviate(&record.spatial_reference, MAX_CRS_WIDTH),
            extent: record.extent.to_string(),
        }
    }
}

/// Table row representation for displaying a recognized format.
#[derive(Tabled)]
pub struct FormatRow {
    /// GDAL short name of the driver.
    #[tabled(rename = "Driver")]
    pub short_name: String,
    /// Full descriptive name of the format.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// `vector` or `raster`.
    #[tabled(rename = "Type")]
    pub kind: String,
    /// Recognized file suffixes.
    #[tabled(rename = "Extensions")]
    pub extensions: String,
}

impl From<&Driver> for FormatRow {
    fn from(driver: &Driver) -> Self {
        Self {
            short_name: driver.short_name.to_string(),
            long_name: driver.long_name.to_string(),
            kind: driver.kind.to_string(),
            extensions: driver.extensions.join(" "),
        }
    }
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
fn abbreviate(text: &str, max: usize) -> String {
    if text.is_empty() {
        return "N/A".to_string();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Renders records as a table.
#[must_use]
pub fn records_table(records: &[MetadataRecord]) -> String {
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    Table::new(rows).to_string()
}

/// Renders the format registry as a table.
#[must_use]
pub fn formats_table(drivers: &[Driver]) -> String {
    let rows: Vec<FormatRow> = drivers.iter().map(FormatRow::from).collect();
    Table::new(rows).to_string()
}

/// Display a single recognized format.
pub fn display_format(driver: &Driver) {
    println!("\nDriver: {}", driver.short_name);
    println!("Long name: {}", driver.long_name);
    println!("Type: {}", driver.kind);
    println!("Extensions: {}", driver.extensions.join(" "));
}

/// Display a scan report: records, then skipped and failed files.
pub fn display_scan_report(report: &ScanReport) {
    println!("\nRecords ({} total):\n", report.records.len());
    if !report.records.is_empty() {
        println!("{}", records_table(&report.records));
    }

    if !report.skipped.is_empty() {
        println!("\nSkipped: {}", report.skipped.join(", "));
    }

    if !report.failures.is_empty() {
        println!("\n=== Failed ===");
        for failure in &report.failures {
            println!("  {}: {}", failure.name, failure.error.user_message());
        }
    }
}

/// Display a single record with all of its fields.
pub fn display_record(record: &MetadataRecord) {
    println!("\nFile: {}", record.name);
    println!("Type: {}", record.data_type);
    println!("Format: {}", record.format);
    println!("Size: {} MB", record.volume_in_mb);
    println!("Extent: {}", record.extent);
    println!("Created: {}", record.creation_date);
    println!("Last accessed: {}", record.update_date);
    println!("\n=== Spatial Reference ===");
    if record.spatial_reference.is_empty() {
        println!("N/A");
    } else {
        println!("{}", record.spatial_reference);
    }
}
