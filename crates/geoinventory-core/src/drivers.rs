//! Format registry and extension dispatch.
//!
//! This module holds the static registry of the geospatial formats the inventory
//! recognizes, keyed by file suffix. Each entry names the GDAL driver expected to
//! handle the suffix and whether it is read through the vector (OGR) or raster
//! path. Suffix matching is case-sensitive: `scene.TIF` is not recognized.
//!
//! # Examples
//!
//! ```
//! use geoinventory_core::drivers::{FileKind, classify};
//!
//! assert_eq!(classify("roads.shp"), FileKind::Vector);
//! assert_eq!(classify("dem.tif"), FileKind::Raster);
//! assert_eq!(classify("README.txt"), FileKind::Unsupported);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Category of a geospatial source.
///
/// Serialized as `vector` / `raster` in the metadata report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Discrete features read through OGR.
    Vector,
    /// Gridded data read through the GDAL raster API.
    Raster,
}

impl DataKind {
    /// Returns the string used for this kind in reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoinventory_core::drivers::DataKind;
    ///
    /// assert_eq!(DataKind::Vector.as_str(), "vector");
    /// assert_eq!(DataKind::Raster.as_str(), "raster");
    /// ```
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Vector => "vector",
            DataKind::Raster => "raster",
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of dispatching a file name by suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Read with the vector reader.
    Vector,
    /// Read with the raster reader.
    Raster,
    /// Not a recognized suffix; the file is skipped.
    Unsupported,
}

impl From<DataKind> for FileKind {
    fn from(kind: DataKind) -> Self {
        match kind {
            DataKind::Vector => FileKind::Vector,
            DataKind::Raster => FileKind::Raster,
        }
    }
}

/// A recognized geospatial format.
#[derive(Debug, Clone)]
pub struct Driver {
    /// GDAL short name of the driver expected to read the format (e.g. `"GPKG"`).
    pub short_name: &'static str,
    /// GDAL long name for display purposes (e.g. `"GeoPackage"`).
    pub long_name: &'static str,
    /// Whether the format is read as vector or raster.
    pub kind: DataKind,
    /// File suffixes routed to this format, including the leading dot.
    pub extensions: &'static [&'static str],
}

impl Driver {
    /// Creates a new format definition.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoinventory_core::drivers::{DataKind, Driver};
    ///
    /// let driver = Driver::new("GeoJSON", "GeoJSON", DataKind::Vector, &[".geojson"]);
    /// assert!(driver.matches("places.geojson"));
    /// ```
    #[must_use]
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        kind: DataKind,
        extensions: &'static [&'static str],
    ) -> Self {
        Self {
            short_name,
            long_name,
            kind,
            extensions,
        }
    }

    /// Returns `true` if `file_name` ends with one of this format's suffixes.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext))
    }
}

/// Returns the complete registry of recognized formats.
///
/// # Examples
///
/// ```
/// use geoinventory_core::drivers::{DataKind, get_drivers};
///
/// let vector_formats = get_drivers()
///     .iter()
///     .filter(|d| d.kind == DataKind::Vector)
///     .count();
/// assert_eq!(vector_formats, 3);
/// ```
#[must_use]
pub fn get_drivers() -> Vec<Driver> {
    use DataKind::{Raster, Vector};

    vec![
        Driver::new("GPKG", "GeoPackage", Vector, &[".gpkg"]),
        Driver::new("ESRI Shapefile", "ESRI Shapefile", Vector, &[".shp"]),
        Driver::new("GeoJSON", "GeoJSON", Vector, &[".geojson"]),
        Driver::new("GTiff", "GeoTIFF", Raster, &[".tif"]),
        Driver::new("HFA", "Erdas Imagine Images (.img)", Raster, &[".img"]),
    ]
}

/// Finds a format by its GDAL short name (case-insensitive).
///
/// # Examples
///
/// ```
/// use geoinventory_core::drivers::find_driver;
///
/// let driver = find_driver("gtiff").expect("GTiff should exist");
/// assert_eq!(driver.long_name, "GeoTIFF");
/// assert!(find_driver("InvalidDriver").is_none());
/// ```
#[must_use]
pub fn find_driver(name: &str) -> Option<Driver> {
    get_drivers()
        .into_iter()
        .find(|d| d.short_name.eq_ignore_ascii_case(name))
}

/// Finds the format whose suffix matches the file name of `path`.
#[must_use]
pub fn find_driver_for_path(path: impl AsRef<Path>) -> Option<Driver> {
    let file_name = path.as_ref().file_name()?.to_string_lossy().into_owned();
    get_drivers().into_iter().find(|d| d.matches(&file_name))
}

/// Dispatches a file name or path to the reader that should handle it.
#[must_use]
pub fn classify(path: impl AsRef<Path>) -> FileKind {
    find_driver_for_path(path).map_or(FileKind::Unsupported, |d| d.kind.into())
}

/// Returns every recognized suffix in registry order.
///
/// # Examples
///
/// ```
/// use geoinventory_core::drivers::supported_extensions;
///
/// assert_eq!(
///     supported_extensions(),
///     vec![".gpkg", ".shp", ".geojson", ".tif", ".img"]
/// );
/// ```
#[must_use]
pub fn supported_extensions() -> Vec<&'static str> {
    get_drivers()
        .iter()
        .flat_map(|d| d.extensions.iter().copied())
        .collect()
}
