//! `geoinventory-core` is the core library for the `GeoInventory` project: it
//! inventories the geospatial files of a directory into a CSV report.
//!
//! This crate includes:
//! - **Format Registry**: the recognized suffixes and the reader each one dispatches to (`drivers`).
//! - **Format Readers**: GDAL-backed vector and raster introspection (`readers`).
//! - **Metadata Assembly**: size and timestamp formatting merged into one record (`metadata`).
//! - **Scanning**: the directory pass and the end-to-end inventory run (`operations`).
//! - **CSV Report**: writing and reading back the report (`writer`).
//!
//! # Examples
//!
//! ```no_run
//! use geoinventory_core::operations::{ErrorPolicy, ScanOptions, run_inventory};
//!
//! let options = ScanOptions::new()
//!     .with_directory("/data/survey")
//!     .with_error_policy(ErrorPolicy::SkipAndLog);
//! let report = run_inventory(&options)?;
//! println!("{} file(s) inventoried", report.records.len());
//! # Ok::<(), geoinventory_core::error::InventoryError>(())
//! ```

pub mod drivers;
pub mod error;
pub mod metadata;
pub mod operations;
pub mod readers;
pub mod types;
pub mod writer;
