//! Command-line interface for `GeoInventory`, a geospatial file inventory tool.
//!
//! This binary wraps the [`geoinventory_core`] library: it scans a directory for
//! vector and raster files, reads their format, CRS and extent through GDAL, and
//! writes one CSV row per file.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! It parses arguments, configures logging, and delegates to command handlers.
//!
//! # Available Commands
//!
//! - `scan` - Inventory a directory into a CSV report
//! - `info` - Display the metadata record of a single file
//! - `formats` - List the recognized formats and file suffixes, or show one by driver name

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geoinventory_core::drivers::{self, get_drivers};
use geoinventory_core::operations::{self, ErrorPolicy, ScanOptions};
use geoinventory_core::writer::DEFAULT_OUTPUT;

mod display;

#[derive(Parser)]
#[command(
    name = "geoinventory",
    version,
    about = "Inventory geospatial files into a CSV report",
    long_about = "GeoInventory lists the vector (.gpkg, .shp, .geojson) and raster (.tif, .img)\n\
                  files of a directory with their format, CRS, extent, size and timestamps.\n\
                  Note: the update_date column holds the last access time of each file."
)]
/// Command-line arguments and options for the `GeoInventory` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `GeoInventory` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Scans a directory (not recursively) and writes a CSV metadata report.
    Scan {
        /// Directory to scan.
        #[arg(value_name = "DIRECTORY", default_value = ".")]
        directory: PathBuf,

        /// Report path, relative to the working directory.
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Log and skip files that cannot be read instead of aborting.
        #[arg(long)]
        skip_errors: bool,

        /// Also print the records as a table.
        #[arg(short, long)]
        print: bool,
    },

    /// Displays the metadata record of a single geospatial file.
    Info {
        /// Path to the file.
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Lists the recognized formats and their file suffixes.
    Formats {
        /// GDAL driver short name to show on its own (case-insensitive, e.g. `gtiff`).
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
}

/// Entry point for the `GeoInventory` command-line interface.
///
/// # Errors
///
/// Returns an error if command execution fails or if the logging system cannot be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true) // Show module paths for better context
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Scan {
            directory,
            output,
            skip_errors,
            print,
        } => {
            handle_scan(&directory, &output, skip_errors, print)?;
        },
        Commands::Info { input } => {
            info!("Displaying info for {}", input.display());
            handle_info(&input)?;
        },
        Commands::Formats { name } => {
            handle_formats(name.as_deref())?;
        },
    }

    Ok(())
}

fn handle_scan(directory: &Path, output: &Path, skip_errors: bool, print: bool) -> Result<()> {
    let error_policy = if skip_errors {
        ErrorPolicy::SkipAndLog
    } else {
        ErrorPolicy::FailFast
    };
    debug!("Output: {}", output.display());
    debug!("Error policy: {error_policy:?}");

    let options = ScanOptions::new()
        .with_directory(directory)
        .with_output(output)
        .with_error_policy(error_policy);

    let report = operations::run_inventory(&options).map_err(|e| {
        if let Some(hint) = e.recovery_suggestion() {
            warn!("{hint}");
        }
        anyhow::Error::new(e)
    })?;

    if !report.failures.is_empty() {
        warn!(
            "{} file(s) could not be read and were left out of the report",
            report.failures.len()
        );
    }

    if print {
        display::display_scan_report(&report);
    }

    println!(
        "Wrote {} record(s) to {}",
        report.records.len(),
        output.display()
    );
    Ok(())
}

fn handle_info(input: &Path) -> Result<()> {
    let record = operations::describe_file(input).map_err(|e| {
        if let Some(hint) = e.recovery_suggestion() {
            warn!("{hint}");
        }
        anyhow::Error::new(e)
    })?;
    display::display_record(&record);
    Ok(())
}

/// Handles the `formats` subcommand by displaying a formatted table of recognized formats.
///
/// With a driver name, only that format is shown.
fn handle_formats(name: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        let drivers = get_drivers();
        println!("\nRecognized Formats ({} total):\n", drivers.len());
        println!("{}", display::formats_table(&drivers));
        return Ok(());
    };

    let driver = drivers::find_driver(name).ok_or_else(|| {
        warn!("Run 'geoinventory formats' to see the recognized formats.");
        anyhow!("Driver '{name}' not found.")
    })?;
    display::display_format(&driver);
    Ok(())
}
