//! Data types for the metadata inventory.
//!
//! This module defines the per-file [`MetadataRecord`], the bounding [`Extent`]
//! and the [`SpatialInfo`] returned by the format readers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::drivers::DataKind;

/// Report columns, in output order.
pub const COLUMNS: [&str; 8] = [
    "name",
    "data_type",
    "format",
    "volume_in_MB",
    "spatial_reference",
    "extent",
    "creation_date",
    "update_date",
];

/// Bounding rectangle of a dataset.
///
/// Written to reports as `(xmin, ymin, xmax, ymax)`.
///
/// # Examples
///
/// ```
/// use geoinventory_core::types::Extent;
///
/// let extent = Extent::new(100.0, 0.0, 600.0, 500.0);
/// assert_eq!(extent.to_string(), "(100.0, 0.0, 600.0, 500.0)");
/// assert_eq!("(100.0, 0.0, 600.0, 500.0)".parse::<Extent>().unwrap(), extent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Minimum x (west)
    pub xmin: f64,
    /// Minimum y (south)
    pub ymin: f64,
    /// Maximum x (east)
    pub xmax: f64,
    /// Maximum y (north)
    pub ymax: f64,
}

impl Extent {
    /// Creates an extent from its four bounds.
    #[must_use]
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns the bounds as `[xmin, ymin, xmax, ymax]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug formatting keeps the trailing `.0` and round-trips exactly.
        write!(
            f,
            "({:?}, {:?}, {:?}, {:?})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

/// Error returned when an extent cell cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid extent '{0}': expected (xmin, ymin, xmax, ymax)")]
pub struct ParseExtentError(String);

impl FromStr for Extent {
    type Err = ParseExtentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseExtentError(s.to_string());

        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let values = inner
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match values.as_slice() {
            [xmin, ymin, xmax, ymax] => Ok(Self::new(*xmin, *ymin, *xmax, *ymax)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Extent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Extent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Spatial properties extracted by a format reader.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialInfo {
    /// Vector or raster
    pub data_type: DataKind,
    /// Driver name as reported by GDAL
    pub format: String,
    /// CRS description
    pub spatial_reference: String,
    /// Bounding extent
    pub extent: Extent,
}

/// One row of the inventory report.
///
/// `update_date` holds the file's last *access* time, not its modification
/// time. The column name is kept for compatibility with existing reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// File name as scanned
    pub name: String,
    /// Source category
    pub data_type: DataKind,
    /// Driver name as reported by GDAL
    pub format: String,
    /// Size in MiB, rounded to two decimals
    #[serde(rename = "volume_in_MB")]
    pub volume_in_mb: f64,
    /// CRS description
    pub spatial_reference: String,
    /// Bounding extent
    pub extent: Extent,
    /// Formatted creation time
    pub creation_date: String,
    /// Formatted last access time
    pub update_date: String,
}
