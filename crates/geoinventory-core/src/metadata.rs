//! Assembly of inventory records from filesystem stats and reader output.

use std::fs::Metadata;
use std::time::SystemTime;

use chrono::{DateTime, Local, TimeZone};

use crate::types::{MetadataRecord, SpatialInfo};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// `ctime(3)` layout, e.g. `Fri Jan  5 09:03:07 2024`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Filesystem attributes of a scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// Size in bytes
    pub size_bytes: u64,
    /// Creation time, or modification time where the platform has no birth time
    pub created: SystemTime,
    /// Last access time
    pub accessed: SystemTime,
}

impl FileStats {
    /// Extracts size and timestamps from filesystem metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform reports none of the creation,
    /// modification or access times.
    pub fn from_metadata(metadata: &Metadata) -> std::io::Result<Self> {
        let modified = metadata.modified();
        let created = metadata.created().or_else(|_| metadata.modified())?;
        let accessed = metadata.accessed().or(modified)?;
        Ok(Self {
            size_bytes: metadata.len(),
            created,
            accessed,
        })
    }
}

/// Converts a byte count to MiB rounded to two decimals.
///
/// Exact halves round to the even neighbour: 128 KiB is `0.12`, not `0.13`.
///
/// # Examples
///
/// ```
/// use geoinventory_core::metadata::volume_in_mb;
///
/// assert_eq!(volume_in_mb(1_572_864), 1.5);
/// assert_eq!(volume_in_mb(0), 0.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn volume_in_mb(size_bytes: u64) -> f64 {
    let megabytes = size_bytes as f64 / BYTES_PER_MB;
    (megabytes * 100.0).round_ties_even() / 100.0
}

/// Formats a timestamp with [`TIMESTAMP_FORMAT`] in the given time zone.
#[must_use]
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Formats a filesystem timestamp in local time.
#[must_use]
pub fn format_system_time(time: SystemTime) -> String {
    format_timestamp(&DateTime::<Local>::from(time))
}

/// Builds the report record for one file.
///
/// `update_date` is taken from [`FileStats::accessed`].
#[must_use]
pub fn assemble(name: &str, stats: &FileStats, spatial: SpatialInfo) -> MetadataRecord {
    MetadataRecord {
        name: name.to_string(),
        data_type: spatial.data_type,
        format: spatial.format,
        volume_in_mb: volume_in_mb(stats.size_bytes),
        spatial_reference: spatial.spatial_reference,
        extent: spatial.extent,
        creation_date: format_system_time(stats.created),
        update_date: format_system_time(stats.accessed),
    }
}
