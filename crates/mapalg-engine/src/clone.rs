//! The computational grid ("clone") every read and write conforms to.

use crate::{EngineError, EngineResult};
use mapalg_raster::{GeoTransform, RasterHeader};
use std::fmt;

/// Relative tolerance, in cells, when comparing cell sizes and origins.
const CONFORMANCE_TOLERANCE: f64 = 1e-6;

/// Geometry of the active computational grid.
///
/// A clone is bound once per operation invocation and passed explicitly to
/// every raster read and write. Cells are square and the grid is north-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloneGrid {
    rows: usize,
    cols: usize,
    cell_size: f64,
    origin_x: f64,
    origin_y: f64,
}

impl CloneGrid {
    /// Bind a grid from explicit values.
    pub fn new(
        rows: usize,
        cols: usize,
        cell_size: f64,
        origin_x: f64,
        origin_y: f64,
    ) -> EngineResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidGrid(format!(
                "{}x{} cells; rows and columns must be positive",
                rows, cols
            )));
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(EngineError::InvalidGrid(format!(
                "cell size {} must be positive and finite",
                cell_size
            )));
        }
        if !origin_x.is_finite() || !origin_y.is_finite() {
            return Err(EngineError::InvalidGrid(format!(
                "origin ({}, {}) must be finite",
                origin_x, origin_y
            )));
        }
        Ok(Self {
            rows,
            cols,
            cell_size,
            origin_x,
            origin_y,
        })
    }

    /// Bind from a raster's simplified header.
    ///
    /// Rasters without pixel-scale georeferencing get cell size 1 and
    /// origin (0, 0).
    pub fn from_header(header: &RasterHeader) -> EngineResult<Self> {
        match header.header_transform {
            Some(t) => Self::new(header.rows, header.cols, t.pixel_width(), t.origin_x(), t.origin_y()),
            None => Self::new(header.rows, header.cols, 1.0, 0.0, 0.0),
        }
    }

    /// Bind from dimensions and a full geotransform.
    ///
    /// Uses cell size = `gt[1]`, origin = (`gt[0]`, `gt[3]`); rotation terms
    /// are not representable in a clone and are dropped.
    pub fn from_geotransform(rows: usize, cols: usize, gt: &GeoTransform) -> EngineResult<Self> {
        Self::new(rows, cols, gt.pixel_width(), gt.origin_x(), gt.origin_y())
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Always false; a bound clone has at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cell size in map units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// X coordinate of the upper-left corner.
    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }

    /// Y coordinate of the upper-left corner.
    pub fn origin_y(&self) -> f64 {
        self.origin_y
    }

    /// North-up geotransform written to rasters produced under this clone.
    pub fn transform(&self) -> GeoTransform {
        GeoTransform::north_up(self.origin_x, self.origin_y, self.cell_size, -self.cell_size)
    }

    /// Check that a raster's geometry conforms to this clone.
    ///
    /// Dimensions must always match. Cell size and origin are compared only
    /// when the raster carries pixel-scale georeferencing.
    pub fn check_conformance(&self, header: &RasterHeader) -> EngineResult<()> {
        let mismatch = |found: String| EngineError::GridMismatch {
            path: header.path.clone(),
            expected: self.to_string(),
            found,
        };

        if header.rows != self.rows || header.cols != self.cols {
            return Err(mismatch(format!("{}x{} cells", header.rows, header.cols)));
        }

        if let Some(t) = header.header_transform {
            let tolerance = CONFORMANCE_TOLERANCE * self.cell_size;
            let conforms = (t.pixel_width() - self.cell_size).abs() <= tolerance
                && (t.origin_x() - self.origin_x).abs() <= tolerance
                && (t.origin_y() - self.origin_y).abs() <= tolerance;
            if !conforms {
                return Err(mismatch(format!(
                    "cell size {} at ({}, {})",
                    t.pixel_width(),
                    t.origin_x(),
                    t.origin_y()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CloneGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} cells of size {} at ({}, {})",
            self.rows, self.cols, self.cell_size, self.origin_x, self.origin_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapalg_raster::{SampleType, ValueScale};
    use std::path::PathBuf;

    fn header(rows: usize, cols: usize, transform: Option<GeoTransform>) -> RasterHeader {
        RasterHeader {
            path: PathBuf::from("input.tif"),
            rows,
            cols,
            sample: SampleType::F32,
            value_scale: ValueScale::Scalar,
            nodata: None,
            header_transform: transform,
            geotransform: transform,
            crs: None,
        }
    }

    #[test]
    fn test_from_header() {
        let h = header(20, 30, Some(GeoTransform::north_up(1000.0, 2000.0, 5.0, -5.0)));
        let clone = CloneGrid::from_header(&h).unwrap();
        assert_eq!((clone.rows(), clone.cols()), (20, 30));
        assert_eq!(clone.cell_size(), 5.0);
        assert_eq!((clone.origin_x(), clone.origin_y()), (1000.0, 2000.0));
        assert_eq!(clone.len(), 600);
    }

    #[test]
    fn test_from_header_without_georeferencing() {
        let clone = CloneGrid::from_header(&header(2, 3, None)).unwrap();
        assert_eq!(clone.cell_size(), 1.0);
        assert_eq!((clone.origin_x(), clone.origin_y()), (0.0, 0.0));
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(matches!(CloneGrid::new(0, 5, 1.0, 0.0, 0.0), Err(EngineError::InvalidGrid(_))));
        assert!(matches!(CloneGrid::new(5, 5, -2.0, 0.0, 0.0), Err(EngineError::InvalidGrid(_))));
        assert!(matches!(
            CloneGrid::new(5, 5, f64::NAN, 0.0, 0.0),
            Err(EngineError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_conformance() {
        let gt = GeoTransform::north_up(0.0, 100.0, 10.0, -10.0);
        let clone = CloneGrid::new(10, 10, 10.0, 0.0, 100.0).unwrap();

        assert!(clone.check_conformance(&header(10, 10, Some(gt))).is_ok());
        assert!(clone.check_conformance(&header(10, 10, None)).is_ok());

        let shifted = GeoTransform::north_up(5.0, 100.0, 10.0, -10.0);
        assert!(matches!(
            clone.check_conformance(&header(10, 10, Some(shifted))),
            Err(EngineError::GridMismatch { .. })
        ));
        assert!(matches!(
            clone.check_conformance(&header(10, 11, Some(gt))),
            Err(EngineError::GridMismatch { .. })
        ));
        let coarser = GeoTransform::north_up(0.0, 100.0, 20.0, -20.0);
        assert!(clone.check_conformance(&header(10, 10, Some(coarser))).is_err());
    }

    #[test]
    fn test_transform_is_north_up() {
        let clone = CloneGrid::new(3, 4, 2.5, 10.0, 20.0).unwrap();
        let t = clone.transform();
        assert!(t.is_north_up());
        assert_eq!(t.pixel_height(), -2.5);
        assert_eq!((t.origin_x(), t.origin_y()), (10.0, 20.0));
    }
}
