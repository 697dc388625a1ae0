//! CSV serialization of inventory records.

use std::fs::File;
use std::io::{BufWriter, Read, Write as IoWrite};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use log::info;

use crate::error::{FormatError, InventoryError, IoErrorExt, Result};
use crate::types::{COLUMNS, MetadataRecord};

/// Default report file name, resolved against the working directory.
pub const DEFAULT_OUTPUT: &str = "metadata.csv";

const REPORT_FORMAT: &str = "CSV report";

/// Options for CSV writing
#[derive(Debug, Clone)]
pub struct CsvWriterOptions {
    /// Column delimiter (default: b',')
    pub delimiter: u8,
    /// Whether to write header row (default: true)
    pub has_header: bool,
}

impl Default for CsvWriterOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
        }
    }
}

impl CsvWriterOptions {
    /// Create new writer options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set column delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to write header row
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// Write records to CSV format
///
/// The header row is written even when `records` is empty.
///
/// # Errors
///
/// Returns an error if writing to the output fails or if CSV serialization fails
pub fn write_records<W: IoWrite>(
    writer: W,
    records: &[MetadataRecord],
    options: &CsvWriterOptions,
) -> std::result::Result<(), csv::Error> {
    // Header handled manually so an empty inventory still gets one.
    let mut csv_writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .from_writer(writer);

    if options.has_header {
        csv_writer.write_record(COLUMNS)?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to CSV bytes
///
/// # Errors
///
/// Returns an error if CSV serialization fails
pub fn write_records_to_bytes(
    records: &[MetadataRecord],
    options: &CsvWriterOptions,
) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records, options)?;
    Ok(buffer)
}

/// Writes the report to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`IoError::Write`](crate::error::IoError::Write) if the file cannot
/// be created or written.
pub fn write_report(
    path: impl AsRef<Path>,
    records: &[MetadataRecord],
    options: &CsvWriterOptions,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_write_context(REPORT_FORMAT, path)?;
    write_records(BufWriter::new(file), records, options)
        .with_write_context(REPORT_FORMAT, path)?;
    info!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Parses records from a CSV report with a header row.
///
/// # Errors
///
/// Returns [`FormatError::Report`] if a row does not match the report layout.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<MetadataRecord>> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    csv_reader
        .deserialize::<MetadataRecord>()
        .map(|row| {
            row.map_err(|e| {
                InventoryError::from(FormatError::Report {
                    line: e.position().map(csv::Position::line),
                    message: e.to_string(),
                })
            })
        })
        .collect()
}

/// Reads a report file written by [`write_report`].
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened, or
/// [`FormatError::Report`] if its content does not parse.
pub fn read_report(path: impl AsRef<Path>) -> Result<Vec<MetadataRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_read_context(REPORT_FORMAT, path)?;
    read_records(file)
}
