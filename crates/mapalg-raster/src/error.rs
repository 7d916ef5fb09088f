//! Error types for the raster crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing GeoTIFF rasters.
#[derive(Debug, Error)]
pub enum RasterError {
    /// I/O error opening or creating a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding or encoding error.
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - malformed or inconsistent tags.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Unsupported sample layout in the TIFF file.
    #[error("Unsupported TIFF data type: {0}")]
    UnsupportedDataType(String),

    /// The raster carries no georeferencing tags at all.
    #[error("{} has no geotransform (ModelTransformation or ModelTiepoint/ModelPixelScale)", path.display())]
    MissingGeotransform {
        /// Raster that was inspected.
        path: PathBuf,
    },

    /// Cell buffer length does not match the declared dimensions.
    #[error("Cell buffer holds {len} values, expected {rows}x{cols}")]
    DimensionMismatch {
        /// Declared rows.
        rows: usize,
        /// Declared columns.
        cols: usize,
        /// Actual buffer length.
        len: usize,
    },
}
