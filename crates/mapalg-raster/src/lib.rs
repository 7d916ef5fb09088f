//! # mapalg-raster
//!
//! Single-band GeoTIFF access for map-algebra operations.
//!
//! This crate reads and writes the raster files that map-algebra operations
//! consume and produce:
//! - Headers (dimensions, sample type, no-data sentinel) without decoding cells
//! - Two views of georeferencing: the simplified pixel-scale/tiepoint header
//!   and the full affine geotransform (including ModelTransformation)
//! - Value scales (boolean, nominal, ordinal, scalar, directional, ldd),
//!   stored as GDAL's `PCRASTER_VALUESCALE` metadata item
//! - Coordinate reference systems in the GeoKey directory, and in-place
//!   CRS assignment for already written files
//!
//! ## Example
//!
//! ```no_run
//! use mapalg_raster::{assign_crs, read_raster, Crs, RasterHeader};
//!
//! let header = RasterHeader::read("dem.tif")?;
//! println!("{} x {} {} cells", header.rows, header.cols, header.value_scale);
//!
//! let dem = read_raster("dem.tif")?;
//! let valid = dem.cells().iter().filter(|v| !v.is_nan()).count();
//! println!("{} valid cells", valid);
//!
//! assign_crs("slope.tif", &Crs::projected(32631))?;
//! # Ok::<(), mapalg_raster::RasterError>(())
//! ```

mod crs;
mod error;
mod geotiff;
mod header;
mod scale;
mod tags;
mod transform;

pub use crs::{assign_crs, Crs, GeoKey, GeoKeyValue, ModelType};
pub use error::RasterError;
pub use geotiff::{read_raster, write_raster, Raster, RasterImage};
pub use header::{read_geotransform, RasterHeader};
pub use scale::{CellRepr, SampleType, ValueScale};
pub use transform::GeoTransform;

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
