//! Grid binding: derive the computational grid from a reference raster.

use crate::{GridMode, OperationError, OperationResult};
use mapalg_engine::CloneGrid;
use mapalg_raster::{read_geotransform, RasterHeader};
use std::path::Path;
use tracing::debug;

/// The grid bound for one invocation, with the header it was bound from.
#[derive(Debug, Clone)]
pub struct GridBinding {
    pub grid: CloneGrid,
    pub header: RasterHeader,
}

/// Bind a computational grid from the raster at `reference`.
pub fn bind(reference: &Path, mode: GridMode) -> OperationResult<GridBinding> {
    let read_error = |e: mapalg_raster::RasterError| {
        OperationError::EngineRead(format!("Cannot read {}: {}", reference.display(), e))
    };

    let header = RasterHeader::read(reference).map_err(read_error)?;
    let grid = match mode {
        GridMode::Header => CloneGrid::from_header(&header)?,
        GridMode::Geotransform => {
            let gt = read_geotransform(reference).map_err(read_error)?;
            if !gt.is_north_up() {
                debug!(
                    "{} is rotated; rotation terms are ignored by the grid",
                    reference.display()
                );
            }
            CloneGrid::from_geotransform(header.rows, header.cols, &gt)?
        }
    };

    debug!("bound grid {} from {} ({:?} mode)", grid, reference.display(), mode);
    Ok(GridBinding { grid, header })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapalg_raster::{write_raster, GeoTransform, RasterImage, ValueScale};

    fn write(path: &Path, transform: Option<GeoTransform>) {
        let image = RasterImage {
            rows: 3,
            cols: 4,
            value_scale: ValueScale::Scalar,
            transform,
            crs: None,
            cells: vec![1.0; 12],
        };
        write_raster(path, &image).unwrap();
    }

    #[test]
    fn test_header_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.tif");
        write(&path, Some(GeoTransform::north_up(10.0, 90.0, 2.0, -2.0)));

        let binding = bind(&path, GridMode::Header).unwrap();
        assert_eq!((binding.grid.rows(), binding.grid.cols()), (3, 4));
        assert_eq!(binding.grid.cell_size(), 2.0);
        assert_eq!((binding.grid.origin_x(), binding.grid.origin_y()), (10.0, 90.0));
    }

    #[test]
    fn test_modes_disagree_on_rotated_raster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotated.tif");
        write(
            &path,
            Some(GeoTransform::from_coefficients([500.0, 5.0, 0.5, 800.0, 0.5, -5.0])),
        );

        let header = bind(&path, GridMode::Header).unwrap();
        assert_eq!(header.grid.cell_size(), 1.0);
        assert_eq!((header.grid.origin_x(), header.grid.origin_y()), (0.0, 0.0));

        let full = bind(&path, GridMode::Geotransform).unwrap();
        assert_eq!(full.grid.cell_size(), 5.0);
        assert_eq!((full.grid.origin_x(), full.grid.origin_y()), (500.0, 800.0));
    }

    #[test]
    fn test_geotransform_mode_requires_georeferencing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.tif");
        write(&path, None);

        assert!(bind(&path, GridMode::Header).is_ok());
        assert!(matches!(
            bind(&path, GridMode::Geotransform),
            Err(OperationError::EngineRead(_))
        ));
    }

    #[test]
    fn test_missing_reference() {
        assert!(matches!(
            bind(Path::new("missing.tif"), GridMode::Header),
            Err(OperationError::EngineRead(_))
        ));
    }
}
