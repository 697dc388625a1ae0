//! GDAL-backed format readers.
//!
//! Both readers open the dataset for the duration of a single call; GDAL closes
//! it when the [`Dataset`] is dropped, on success and error paths alike.

use std::path::Path;

use gdal::spatial_ref::SpatialRef;
use gdal::vector::LayerAccess;
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};
use log::debug;

use crate::drivers::{DataKind, FileKind};
use crate::error::{FormatError, Result, unsupported_file};
use crate::types::{Extent, SpatialInfo};

/// Geotransform GDAL reports for a raster without georeferencing: origin at
/// (0, 0), one unit per pixel, rows growing downward.
pub const DEFAULT_GEO_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Trait for extracting spatial metadata from a geospatial file.
pub trait FormatReader {
    /// Category of data this reader produces.
    fn kind(&self) -> DataKind;

    /// Opens `path` and extracts its format, CRS and extent.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if GDAL cannot open or introspect the file.
    fn read(&self, path: &Path) -> Result<SpatialInfo>;
}

/// Reads vector datasets (GeoPackage, Shapefile, `GeoJSON`) through OGR.
#[derive(Debug, Default, Clone, Copy)]
pub struct VectorReader;

impl FormatReader for VectorReader {
    fn kind(&self) -> DataKind {
        DataKind::Vector
    }

    fn read(&self, path: &Path) -> Result<SpatialInfo> {
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_READONLY | GdalOpenFlags::GDAL_OF_VECTOR,
            ..DatasetOptions::default()
        };
        let dataset = Dataset::open_ex(path, options).map_err(|source| FormatError::Open {
            kind: self.kind().to_string(),
            path: path.to_path_buf(),
            source,
        })?;

        let format = dataset.driver().short_name();

        // Multi-layer containers report their first layer only.
        let layer = dataset
            .layers()
            .next()
            .ok_or_else(|| FormatError::NoLayers {
                path: path.to_path_buf(),
            })?;

        let envelope = layer.get_extent().map_err(|source| FormatError::Extent {
            path: path.to_path_buf(),
            source,
        })?;
        let extent = Extent::new(envelope.MinX, envelope.MinY, envelope.MaxX, envelope.MaxY);

        let spatial_reference = layer
            .spatial_ref()
            .map(|srs| crs_to_string(&srs))
            .unwrap_or_default();

        debug!("Read vector {} ({format})", path.display());

        Ok(SpatialInfo {
            data_type: self.kind(),
            format,
            spatial_reference,
            extent,
        })
    }
}

/// Reads raster datasets (`GeoTIFF`, ERDAS IMG) through GDAL.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterReader;

impl FormatReader for RasterReader {
    fn kind(&self) -> DataKind {
        DataKind::Raster
    }

    fn read(&self, path: &Path) -> Result<SpatialInfo> {
        let dataset = Dataset::open(path).map_err(|source| FormatError::Open {
            kind: self.kind().to_string(),
            path: path.to_path_buf(),
            source,
        })?;

        let format = dataset.driver().long_name();
        let spatial_reference = dataset.projection();
        // Ungeoreferenced rasters get GDAL's default pixel grid.
        let geo_transform = dataset.geo_transform().unwrap_or_else(|e| {
            debug!("No geotransform for {}: {e}", path.display());
            DEFAULT_GEO_TRANSFORM
        });
        let extent = raster_extent(&geo_transform, dataset.raster_size());

        debug!("Read raster {} ({format})", path.display());

        Ok(SpatialInfo {
            data_type: self.kind(),
            format,
            spatial_reference,
            extent,
        })
    }
}

/// Computes the bounding extent of a north-up raster.
///
/// `geo_transform` is GDAL's `[xmin, xres, rot1, ymax, rot2, yres]`; `yres` is
/// negative for north-up rasters so `ymin` lands below `ymax`. Rotation terms
/// are ignored.
///
/// # Examples
///
/// ```
/// use geoinventory_core::readers::raster_extent;
/// use geoinventory_core::types::Extent;
///
/// let extent = raster_extent(&[100.0, 10.0, 0.0, 500.0, 0.0, -10.0], (50, 50));
/// assert_eq!(extent, Extent::new(100.0, 0.0, 600.0, 500.0));
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn raster_extent(geo_transform: &[f64; 6], (width, height): (usize, usize)) -> Extent {
    let [xmin, xres, _, ymax, _, yres] = *geo_transform;
    let xmax = xmin + width as f64 * xres;
    let ymin = ymax + height as f64 * yres;
    Extent::new(xmin, ymin, xmax, ymax)
}

/// Normalizes a CRS to a short string.
///
/// Prefers `AUTHORITY:CODE`, then PROJ.4, then WKT; empty if none is available.
#[must_use]
pub fn crs_to_string(srs: &SpatialRef) -> String {
    if let (Ok(name), Ok(code)) = (srs.auth_name(), srs.auth_code()) {
        return format!("{name}:{code}");
    }
    srs.to_proj4()
        .map(|proj| proj.trim().to_string())
        .or_else(|_| srs.to_wkt())
        .unwrap_or_default()
}

/// Reads `path` with the reader matching its suffix.
///
/// # Errors
///
/// Returns [`FormatError::Unsupported`] for unrecognized suffixes, or the
/// reader's error if GDAL fails.
pub fn read_spatial_info(path: &Path) -> Result<SpatialInfo> {
    match crate::drivers::classify(path) {
        FileKind::Vector => VectorReader.read(path),
        FileKind::Raster => RasterReader.read(path),
        FileKind::Unsupported => Err(unsupported_file(path).into()),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{
        write_test_geotiff, write_test_img, write_ungeoreferenced_geotiff,
        write_unit_square_geojson, write_unit_square_vector,
    };
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_raster_extent_north_up() {
        let extent = raster_extent(&[100.0, 10.0, 0.0, 500.0, 0.0, -10.0], (50, 50));
        assert_eq!(extent, Extent::new(100.0, 0.0, 600.0, 500.0));
    }

    #[test]
    fn test_raster_extent_non_square() {
        let extent = raster_extent(&[-180.0, 0.5, 0.0, 90.0, 0.0, -0.25], (720, 720));
        assert_eq!(extent, Extent::new(-180.0, -90.0, 180.0, 90.0));
    }

    #[test]
    fn test_raster_extent_south_up() {
        // A positive yres makes "ymin" the larger value; kept as computed.
        let extent = raster_extent(&[0.0, 1.0, 0.0, 0.0, 0.0, 1.0], (10, 20));
        assert_eq!(extent, Extent::new(0.0, 20.0, 10.0, 0.0));
    }

    #[test]
    fn test_vector_reader_geojson() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("square.geojson");
        write_unit_square_geojson(&path);

        let info = VectorReader.read(&path).unwrap();
        assert_eq!(info.data_type, DataKind::Vector);
        assert_eq!(info.format, "GeoJSON");
        assert_eq!(info.extent, Extent::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(info.spatial_reference, "EPSG:4326");
    }

    #[test]
    fn test_raster_reader_geotiff() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("grid.tif");
        write_test_geotiff(&path);

        let info = RasterReader.read(&path).unwrap();
        assert_eq!(info.data_type, DataKind::Raster);
        assert_eq!(info.format, "GeoTIFF");
        assert_eq!(info.extent, Extent::new(100.0, 0.0, 600.0, 500.0));
        assert!(info.spatial_reference.contains("WGS 84"));
    }

    #[test]
    fn test_raster_reader_without_geotransform() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan.tif");
        write_ungeoreferenced_geotiff(&path, 30, 20);

        let info = RasterReader.read(&path).unwrap();
        assert_eq!(info.format, "GeoTIFF");
        assert_eq!(info.extent, Extent::new(0.0, 20.0, 30.0, 0.0));
        assert_eq!(info.spatial_reference, "");
    }

    #[test]
    fn test_raster_reader_erdas_img() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("landcover.img");
        write_test_img(&path);

        let info = RasterReader.read(&path).unwrap();
        assert_eq!(info.data_type, DataKind::Raster);
        assert_eq!(info.format, "Erdas Imagine Images (.img)");
        assert_eq!(info.extent, Extent::new(0.0, 0.0, 1200.0, 900.0));
        assert!(info.spatial_reference.contains("UTM"), "{}", info.spatial_reference);
    }

    #[test]
    fn test_vector_reader_shapefile() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("roads.shp");
        write_unit_square_vector(&path, "ESRI Shapefile");

        let info = VectorReader.read(&path).unwrap();
        assert_eq!(info.data_type, DataKind::Vector);
        assert_eq!(info.format, "ESRI Shapefile");
        assert_eq!(info.extent, Extent::new(0.0, 0.0, 1.0, 1.0));
        // .prj files carry ESRI WKT, which GDAL may not map back to an authority code
        assert!(
            info.spatial_reference == "EPSG:4326" || info.spatial_reference.contains("longlat"),
            "{}",
            info.spatial_reference
        );
    }

    #[test]
    fn test_vector_reader_geopackage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("parcels.gpkg");
        write_unit_square_vector(&path, "GPKG");

        let info = VectorReader.read(&path).unwrap();
        assert_eq!(info.data_type, DataKind::Vector);
        assert_eq!(info.format, "GPKG");
        assert_eq!(info.extent, Extent::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(info.spatial_reference, "EPSG:4326");
    }

    #[test]
    fn test_vector_reader_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.geojson");
        std::fs::write(&path, "this is not json").unwrap();

        let err = VectorReader.read(&path).unwrap_err();
        assert!(err.is_per_file(), "{err}");
    }

    #[test]
    fn test_raster_reader_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.tif");

        let err = RasterReader.read(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::InventoryError::Format(FormatError::Open { .. })
        ));
    }

    #[test]
    fn test_read_spatial_info_dispatches() {
        let temp_dir = TempDir::new().unwrap();
        let tif = temp_dir.path().join("grid.tif");
        write_test_geotiff(&tif);

        assert_eq!(read_spatial_info(&tif).unwrap().data_type, DataKind::Raster);

        let txt = temp_dir.path().join("notes.txt");
        std::fs::write(&txt, "hello").unwrap();
        let err = read_spatial_info(&txt).unwrap_err();
        assert!(matches!(
            err,
            crate::error::InventoryError::Format(FormatError::Unsupported { .. })
        ));
    }
}
