//! Directory scanning and report generation.
//!
//! A scan is a single blocking pass over the direct entries of one directory:
//! each regular file is dispatched by suffix, read through GDAL, combined with
//! its filesystem stats and collected. Nothing is written until the pass
//! completes, so a fail-fast scan that aborts leaves no partial report behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::drivers::{FileKind, classify};
use crate::error::{ConfigError, InventoryError, IoError, Result, unsupported_file};
use crate::metadata::{FileStats, assemble};
use crate::readers::{FormatReader, RasterReader, VectorReader};
use crate::types::MetadataRecord;
use crate::writer::{CsvWriterOptions, DEFAULT_OUTPUT, write_report};

/// What to do when a recognized file cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the scan on the first failure; no report is written.
    #[default]
    FailFast,
    /// Log the failure, leave the file out of the report and continue.
    SkipAndLog,
}

/// Options for a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory whose direct entries are inventoried (default: `.`)
    pub directory: PathBuf,
    /// Report path (default: `metadata.csv` in the working directory)
    pub output: PathBuf,
    /// Failure handling (default: fail fast)
    pub error_policy: ErrorPolicy,
    /// CSV layout of the report
    pub csv: CsvWriterOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            error_policy: ErrorPolicy::default(),
            csv: CsvWriterOptions::default(),
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory to scan
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the report path
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the error policy
    #[must_use]
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Set the CSV writer options
    #[must_use]
    pub fn with_csv_options(mut self, csv: CsvWriterOptions) -> Self {
        self.csv = csv;
        self
    }

    /// Checks the options before any I/O happens.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the output path is empty or names a directory.
    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidOption {
                option: "output".to_string(),
                message: "path must not be empty".to_string(),
            }
            .into());
        }
        if self.output.is_dir() {
            return Err(ConfigError::InvalidOption {
                option: "output".to_string(),
                message: format!("'{}' is a directory", self.output.display()),
            }
            .into());
        }
        Ok(())
    }
}

/// Result of dispatching a single directory entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// The file was recognized and read.
    Record(MetadataRecord),
    /// The entry is not a recognized geospatial file.
    Skipped,
}

/// A recognized file that could not be read under [`ErrorPolicy::SkipAndLog`].
#[derive(Debug)]
pub struct ScanFailure {
    /// File name as scanned
    pub name: String,
    /// Why it failed
    pub error: InventoryError,
}

/// Everything a scan produced.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Records in file-name order
    pub records: Vec<MetadataRecord>,
    /// Names of entries that were not recognized
    pub skipped: Vec<String>,
    /// Recognized files that failed to read (skip policy only)
    pub failures: Vec<ScanFailure>,
}

/// Reads one file into a record, or reports it as skipped.
///
/// `name` is the file name written to the report; `path` is where the file is
/// opened from.
///
/// # Errors
///
/// Returns an error if the file is recognized but cannot be stat'ed or read.
pub fn parse_entry(name: &str, path: &Path) -> Result<EntryOutcome> {
    let reader: &dyn FormatReader = match classify(name) {
        FileKind::Vector => &VectorReader,
        FileKind::Raster => &RasterReader,
        FileKind::Unsupported => {
            debug!("Skipping unsupported file {name}");
            return Ok(EntryOutcome::Skipped);
        },
    };

    let metadata = fs::metadata(path).map_err(|source| IoError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    let stats = FileStats::from_metadata(&metadata).map_err(|source| IoError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    let spatial = reader.read(path)?;
    Ok(EntryOutcome::Record(assemble(name, &stats, spatial)))
}

/// Reads a single file into a record.
///
/// # Errors
///
/// Returns [`FormatError::Unsupported`](crate::error::FormatError::Unsupported)
/// if the suffix is not recognized, or the read error otherwise.
pub fn describe_file(path: impl AsRef<Path>) -> Result<MetadataRecord> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match parse_entry(&name, path)? {
        EntryOutcome::Record(record) => Ok(record),
        EntryOutcome::Skipped => Err(unsupported_file(path).into()),
    }
}

/// Scans the direct entries of `directory` without writing anything.
///
/// Entries are processed in file-name order so repeated scans of an unchanged
/// directory produce the same report. Subdirectories and other non-file
/// entries are skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed, or, under
/// [`ErrorPolicy::FailFast`], the first per-file error.
pub fn scan_directory(directory: impl AsRef<Path>, policy: ErrorPolicy) -> Result<ScanReport> {
    let directory = directory.as_ref();
    info!("Scanning {}", directory.display());

    if !directory.exists() {
        return Err(IoError::DirectoryNotFound {
            path: directory.to_path_buf(),
        }
        .into());
    }
    if !directory.is_dir() {
        return Err(IoError::NotADirectory {
            path: directory.to_path_buf(),
        }
        .into());
    }

    let read_dir_error = |source| IoError::ReadDir {
        path: directory.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(directory)
        .map_err(read_dir_error)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_dir_error)?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut report = ScanReport::default();
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();

        // Follows symlinks, like opening the file would.
        if !path.is_file() {
            debug!("Skipping non-file entry {name}");
            report.skipped.push(name);
            continue;
        }

        match parse_entry(&name, &path) {
            Ok(EntryOutcome::Record(record)) => {
                debug!("Recorded {name} ({})", record.data_type);
                report.records.push(record);
            },
            Ok(EntryOutcome::Skipped) => report.skipped.push(name),
            Err(error) if policy == ErrorPolicy::SkipAndLog && error.is_per_file() => {
                warn!("Skipping {name}: {error}");
                report.failures.push(ScanFailure { name, error });
            },
            Err(error) => return Err(error),
        }
    }

    info!(
        "Scanned {}: {} record(s), {} skipped, {} failed",
        directory.display(),
        report.records.len(),
        report.skipped.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Scans a directory and writes the CSV report.
///
/// # Errors
///
/// Returns an error if the options are invalid, the scan fails (see
/// [`scan_directory`]) or the report cannot be written.
pub fn run_inventory(options: &ScanOptions) -> Result<ScanReport> {
    options.validate()?;
    let report = scan_directory(&options.directory, options.error_policy)?;
    write_report(&options.output, &report.records, &options.csv)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::DataKind;
    use crate::readers::fixtures::{
        write_test_geotiff, write_test_img, write_ungeoreferenced_geotiff,
        write_unit_square_geojson, write_unit_square_vector,
    };
    use crate::types::Extent;
    use crate::writer::read_report;
    use tempfile::TempDir;

    /// One `.geojson`, one `.tif` and one `.txt`.
    fn create_mixed_directory() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        write_unit_square_geojson(&temp_dir.path().join("places.geojson"));
        write_test_geotiff(&temp_dir.path().join("grid.tif"));
        fs::write(temp_dir.path().join("readme.txt"), "not spatial").unwrap();
        temp_dir
    }

    #[test]
    fn test_parse_entry_skips_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("readme.txt");
        fs::write(&path, "hello").unwrap();

        let outcome = parse_entry("readme.txt", &path).unwrap();
        assert!(matches!(outcome, EntryOutcome::Skipped));
    }

    #[test]
    fn test_parse_entry_unsupported_never_touches_disk() {
        // The file does not exist; an unrecognized suffix must still not error.
        let outcome = parse_entry("ghost.csv", Path::new("/nonexistent/ghost.csv")).unwrap();
        assert!(matches!(outcome, EntryOutcome::Skipped));
    }

    #[test]
    fn test_parse_entry_missing_recognized_file_is_stat_error() {
        let err = parse_entry("ghost.tif", Path::new("/nonexistent/ghost.tif")).unwrap_err();
        assert!(matches!(err, InventoryError::Io(IoError::Stat { .. })));
    }

    #[test]
    fn test_scan_mixed_directory() {
        let temp_dir = create_mixed_directory();

        let report = scan_directory(temp_dir.path(), ErrorPolicy::FailFast).unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped, vec!["readme.txt".to_string()]);
        assert!(report.failures.is_empty());

        // Sorted by name: grid.tif before places.geojson
        let raster = &report.records[0];
        assert_eq!(raster.name, "grid.tif");
        assert_eq!(raster.data_type, DataKind::Raster);
        assert_eq!(raster.extent, Extent::new(100.0, 0.0, 600.0, 500.0));

        let vector = &report.records[1];
        assert_eq!(vector.name, "places.geojson");
        assert_eq!(vector.data_type, DataKind::Vector);
        assert_eq!(vector.extent, Extent::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(vector.spatial_reference, "EPSG:4326");
    }

    #[test]
    fn test_scan_shapefile_lists_sidecars_as_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write_unit_square_vector(&temp_dir.path().join("roads.shp"), "ESRI Shapefile");

        let report = scan_directory(temp_dir.path(), ErrorPolicy::FailFast).unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "roads.shp");
        assert_eq!(report.records[0].format, "ESRI Shapefile");
        for sidecar in ["roads.dbf", "roads.prj", "roads.shx"] {
            assert!(report.skipped.contains(&sidecar.to_string()), "{sidecar}");
        }
        assert!(!report.skipped.contains(&"roads.shp".to_string()));
    }

    #[test]
    fn test_scan_every_recognized_format() {
        let temp_dir = create_mixed_directory();
        write_unit_square_vector(&temp_dir.path().join("parcels.gpkg"), "GPKG");
        write_unit_square_vector(&temp_dir.path().join("roads.shp"), "ESRI Shapefile");
        write_test_img(&temp_dir.path().join("landcover.img"));

        let report = scan_directory(temp_dir.path(), ErrorPolicy::FailFast).unwrap();

        let formats: Vec<(&str, &str)> = report
            .records
            .iter()
            .map(|r| (r.name.as_str(), r.format.as_str()))
            .collect();
        assert_eq!(
            formats,
            vec![
                ("grid.tif", "GeoTIFF"),
                ("landcover.img", "Erdas Imagine Images (.img)"),
                ("parcels.gpkg", "GPKG"),
                ("places.geojson", "GeoJSON"),
                ("roads.shp", "ESRI Shapefile"),
            ]
        );
    }

    #[test]
    fn test_scan_keeps_ungeoreferenced_raster() {
        let temp_dir = create_mixed_directory();
        write_ungeoreferenced_geotiff(&temp_dir.path().join("scan.tif"), 30, 20);

        let report = scan_directory(temp_dir.path(), ErrorPolicy::FailFast).unwrap();

        assert_eq!(report.records.len(), 3);
        assert!(report.failures.is_empty());
        let scan = report.records.iter().find(|r| r.name == "scan.tif").unwrap();
        assert_eq!(scan.extent, Extent::new(0.0, 20.0, 30.0, 0.0));
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested.shp");
        fs::create_dir(&nested).unwrap();
        write_unit_square_geojson(&nested.join("inner.geojson"));

        let report = scan_directory(temp_dir.path(), ErrorPolicy::FailFast).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.skipped, vec!["nested.shp".to_string()]);
    }

    #[test]
    fn test_scan_fail_fast_aborts_on_broken_file() {
        let temp_dir = create_mixed_directory();
        fs::write(temp_dir.path().join("broken.geojson"), "{ not json").unwrap();

        let result = scan_directory(temp_dir.path(), ErrorPolicy::FailFast);
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_skip_and_log_continues() {
        let temp_dir = create_mixed_directory();
        fs::write(temp_dir.path().join("broken.geojson"), "{ not json").unwrap();

        let report = scan_directory(temp_dir.path(), ErrorPolicy::SkipAndLog).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "broken.geojson");
    }

    #[test]
    fn test_scan_is_repeatable() {
        let temp_dir = create_mixed_directory();

        let first = scan_directory(temp_dir.path(), ErrorPolicy::FailFast).unwrap();
        let second = scan_directory(temp_dir.path(), ErrorPolicy::FailFast).unwrap();

        let names = |report: &ScanReport| {
            report
                .records
                .iter()
                .map(|r| r.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
        for (a, b) in first.records.iter().zip(&second.records) {
            assert_eq!(a.extent, b.extent);
            assert_eq!(a.format, b.format);
            assert_eq!(a.spatial_reference, b.spatial_reference);
            assert_eq!(a.creation_date, b.creation_date);
        }
    }

    #[test]
    fn test_scan_missing_directory() {
        let err = scan_directory("/nonexistent/geodata", ErrorPolicy::FailFast).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Io(IoError::DirectoryNotFound { .. })
        ));
        assert!(!err.is_per_file());
    }

    #[test]
    fn test_scan_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.txt");
        fs::write(&path, "x").unwrap();

        let err = scan_directory(&path, ErrorPolicy::SkipAndLog).unwrap_err();
        assert!(matches!(err, InventoryError::Io(IoError::NotADirectory { .. })));
    }

    #[test]
    fn test_run_inventory_writes_report() {
        let temp_dir = create_mixed_directory();
        let output_dir = TempDir::new().unwrap();
        let output = output_dir.path().join("metadata.csv");

        let options = ScanOptions::new()
            .with_directory(temp_dir.path())
            .with_output(&output);
        let report = run_inventory(&options).unwrap();

        let parsed = read_report(&output).unwrap();
        assert_eq!(parsed, report.records);
        assert_eq!(parsed.len(), 2);

        let content = fs::read_to_string(&output).unwrap();
        assert!(!content.contains("readme.txt"));
    }

    #[test]
    fn test_run_inventory_fail_fast_writes_nothing() {
        let temp_dir = create_mixed_directory();
        fs::write(temp_dir.path().join("broken.tif"), "not a tiff").unwrap();
        let output_dir = TempDir::new().unwrap();
        let output = output_dir.path().join("metadata.csv");

        let options = ScanOptions::new()
            .with_directory(temp_dir.path())
            .with_output(&output);
        assert!(run_inventory(&options).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_validate_rejects_directory_output() {
        let temp_dir = TempDir::new().unwrap();
        let options = ScanOptions::new().with_output(temp_dir.path());

        let err = options.validate().unwrap_err();
        assert!(matches!(err, InventoryError::Config(_)));
    }

    #[test]
    fn test_describe_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("grid.tif");
        write_test_geotiff(&path);

        let record = describe_file(&path).unwrap();
        assert_eq!(record.name, "grid.tif");
        assert_eq!(record.format, "GeoTIFF");

        let txt = temp_dir.path().join("notes.txt");
        fs::write(&txt, "x").unwrap();
        assert!(describe_file(&txt).is_err());
    }
}
