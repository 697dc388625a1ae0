//! Custom error types for `GeoInventory` operations.
//!
//! Unsupported file suffixes are not errors: the dispatcher reports them as
//! [`FileKind::Unsupported`](crate::drivers::FileKind::Unsupported). Everything
//! here describes a failure that either aborts a scan or, under
//! [`ErrorPolicy::SkipAndLog`](crate::operations::ErrorPolicy::SkipAndLog),
//! is recorded against a single file.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for `GeoInventory` operations.
///
/// Delegates display formatting to the underlying variants.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Filesystem errors (directory listing, stat, report output)
    #[error(transparent)]
    Io(#[from] IoError),

    /// GDAL could not introspect a file, or a report could not be parsed
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Invalid options
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Filesystem errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// The directory could not be listed
    #[error("Failed to list directory '{path}': {source}")]
    ReadDir {
        /// The directory being scanned
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// File metadata could not be read (e.g. the entry vanished mid-scan)
    #[error("Failed to stat '{path}': {source}")]
    Stat {
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a file
    #[error("Failed to read {format} file '{path}': {source}")]
    Read {
        /// What was being read (e.g. "CSV report")
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to write a file
    #[error("Failed to write {format} file '{path}': {source}")]
    Write {
        /// What was being written (e.g. "CSV report")
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The scan target exists but is not a directory
    #[error("Not a directory: '{path}'")]
    NotADirectory {
        /// The offending path
        path: PathBuf,
    },

    /// Directory was not found
    #[error("Directory not found: '{path}'")]
    DirectoryNotFound {
        /// The missing directory
        path: PathBuf,
    },
}

/// Errors raised while introspecting a geospatial file or parsing a report.
#[derive(Debug, Error)]
pub enum FormatError {
    /// GDAL failed to open the dataset
    #[error("GDAL could not open {kind} dataset '{path}': {source}")]
    Open {
        /// "vector" or "raster"
        kind: String,
        /// The dataset path
        path: PathBuf,
        /// The GDAL error
        #[source]
        source: gdal::errors::GdalError,
    },

    /// A vector dataset opened but exposes no layer
    #[error("Vector dataset '{path}' has no layers")]
    NoLayers {
        /// The dataset path
        path: PathBuf,
    },

    /// The layer extent could not be computed
    #[error("Failed to compute extent of '{path}': {source}")]
    Extent {
        /// The dataset path
        path: PathBuf,
        /// The GDAL error
        #[source]
        source: gdal::errors::GdalError,
    },

    /// A metadata report row could not be parsed
    #[error("Failed to parse report{}: {message}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Report {
        /// The line number where parsing failed (if available)
        line: Option<u64>,
        /// Description of the parse error
        message: String,
    },

    /// The file suffix maps to no known format
    #[error("Unsupported file '{path}': recognized suffixes are {suffixes}")]
    Unsupported {
        /// The file path
        path: PathBuf,
        /// Comma-separated list of recognized suffixes
        suffixes: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },
}

/// Type alias for Results using `InventoryError`.
pub type Result<T> = std::result::Result<T, InventoryError>;

impl InventoryError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => e.user_message(),
            Self::Format(e) => e.user_message(),
            Self::Config(e) => format!("Configuration error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Io(e) => e.recovery_suggestion(),
            Self::Format(e) => e.recovery_suggestion(),
            _ => None,
        }
    }

    /// Returns `true` if the error concerns a single file rather than the scan as a whole.
    ///
    /// Only per-file errors are eligible for skipping under
    /// [`ErrorPolicy::SkipAndLog`](crate::operations::ErrorPolicy::SkipAndLog).
    #[must_use]
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Io(IoError::Stat { .. })
                | Self::Format(
                    FormatError::Open { .. }
                        | FormatError::NoLayers { .. }
                        | FormatError::Extent { .. }
                )
        )
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::Read { format, path, .. } => {
                format!("Failed to read {} file: {}", format, path.display())
            },
            Self::Write { format, path, .. } => {
                format!("Failed to write {} file: {}", format, path.display())
            },
            Self::DirectoryNotFound { path } => {
                format!("Directory not found: {}", path.display())
            },
            _ => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::DirectoryNotFound { .. } | Self::NotADirectory { .. } => {
                Some("Pass the path of an existing directory to scan.".to_string())
            },
            Self::Stat { .. } => {
                Some("The file may have been removed during the scan; run it again.".to_string())
            },
            Self::Write { .. } => {
                Some("Check that the output location is writable.".to_string())
            },
            _ => None,
        }
    }
}

impl FormatError {
    fn user_message(&self) -> String {
        match self {
            Self::Open { kind, path, .. } => {
                format!("Could not open {kind} file: {}", path.display())
            },
            Self::Report { line, message } => {
                if let Some(line_num) = line {
                    format!("Parse error in report at line {line_num}: {message}")
                } else {
                    format!("Parse error in report: {message}")
                }
            },
            _ => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Open { .. } | Self::NoLayers { .. } | Self::Extent { .. } => Some(
                "Check the file with `ogrinfo`/`gdalinfo`, or rerun with --skip-errors.".to_string(),
            ),
            Self::Unsupported { .. } => {
                Some("Run 'geoinventory formats' to see the recognized formats.".to_string())
            },
            Self::Report { .. } => None,
        }
    }
}

/// Extension trait for adding I/O context to errors.
pub trait IoErrorExt<T> {
    /// Add read context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Read`] if the underlying operation fails.
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;

    /// Add write context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Write`] if the underlying operation fails.
    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> IoErrorExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            InventoryError::Io(IoError::Read {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }

    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            InventoryError::Io(IoError::Write {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }
}

/// Helper to create [`FormatError::Unsupported`] listing the recognized suffixes.
#[must_use]
pub fn unsupported_file(path: impl Into<PathBuf>) -> FormatError {
    use crate::drivers::supported_extensions;

    FormatError::Unsupported {
        path: path.into(),
        suffixes: supported_extensions().join(", "),
    }
}
