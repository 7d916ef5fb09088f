//! Raster I/O adapter between GeoTIFF files and in-memory fields.

use crate::error::describe_scales;
use crate::{CloneGrid, EngineError, EngineResult, Field};
use mapalg_raster::{read_raster, write_raster, RasterHeader, RasterImage, ValueScale};
use std::path::Path;
use tracing::debug;

/// Read a raster conformant with `clone` into a field.
///
/// Every call re-reads the file. Fails with [`EngineError::GridMismatch`]
/// when the raster's geometry differs from the clone and with
/// [`EngineError::Read`] when it cannot be decoded or its value scale is
/// not among `accepted`.
pub fn read_field(clone: &CloneGrid, path: &Path, accepted: &[ValueScale]) -> EngineResult<Field> {
    let header = RasterHeader::read(path).map_err(|e| EngineError::read(path, e))?;
    clone.check_conformance(&header)?;
    if !accepted.contains(&header.value_scale) {
        return Err(EngineError::read(
            path,
            format!(
                "raster has value scale {}, expected {}",
                header.value_scale,
                describe_scales(accepted)
            ),
        ));
    }

    let (header, cells) = read_raster(path)
        .map_err(|e| EngineError::read(path, e))?
        .into_parts();
    let field = Field::from_cells(header.rows, header.cols, header.value_scale, cells)
        .ok_or_else(|| EngineError::read(path, "cell count does not match dimensions"))?;

    debug!(
        "read {} ({} field, {} of {} cells valid)",
        path.display(),
        field.scale(),
        field.valid_count(),
        clone.len()
    );
    Ok(field)
}

/// Write a field to `path` as GeoTIFF georeferenced by `clone`.
///
/// Missing parent directories are created. No CRS is written; the clone
/// carries none.
pub fn write_field(clone: &CloneGrid, field: &Field, path: &Path) -> EngineResult<()> {
    if !field.conforms_to(clone) {
        return Err(EngineError::GridMismatch {
            path: path.to_path_buf(),
            expected: clone.to_string(),
            found: format!("{}x{} cells", field.rows(), field.cols()),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::write(path, e))?;
    }

    let image = RasterImage {
        rows: field.rows(),
        cols: field.cols(),
        value_scale: field.scale(),
        transform: Some(clone.transform()),
        crs: None,
        cells: field.cells().to_vec(),
    };
    write_raster(path, &image).map_err(|e| EngineError::write(path, e))?;

    debug!("wrote {} field to {}", field.scale(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_under_same_clone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("field.tif");
        let clone = CloneGrid::new(2, 3, 30.0, 100_000.0, 450_000.0).unwrap();
        let field = Field::from_cells(
            2,
            3,
            ValueScale::Scalar,
            vec![1.5, f64::NAN, 3.0, 4.0, 5.0, -6.25],
        )
        .unwrap();

        write_field(&clone, &field, &path).unwrap();
        let back = read_field(&clone, &path, &[ValueScale::Scalar]).unwrap();
        assert_eq!(back.scale(), ValueScale::Scalar);
        assert_eq!(back.get(0, 0), Some(1.5));
        assert_eq!(back.get(0, 1), None);
        assert_eq!(back.get(1, 2), Some(-6.25));
    }

    #[test]
    fn test_read_rejects_other_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.tif");
        let written = CloneGrid::new(2, 2, 10.0, 0.0, 20.0).unwrap();
        write_field(&written, &Field::filled(&written, ValueScale::Scalar, 1.0), &path).unwrap();

        let shifted = CloneGrid::new(2, 2, 10.0, 10.0, 20.0).unwrap();
        assert!(matches!(
            read_field(&shifted, &path, &[ValueScale::Scalar]),
            Err(EngineError::GridMismatch { .. })
        ));
    }

    #[test]
    fn test_read_rejects_unaccepted_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.tif");
        let clone = CloneGrid::new(1, 2, 1.0, 0.0, 0.0).unwrap();
        write_field(&clone, &Field::filled(&clone, ValueScale::Nominal, 3.0), &path).unwrap();

        match read_field(&clone, &path, &[ValueScale::Ordinal, ValueScale::Scalar]) {
            Err(EngineError::Read { reason, .. }) => {
                assert!(reason.contains("nominal"), "{}", reason);
                assert!(reason.contains("ordinal or scalar"), "{}", reason);
            }
            other => panic!("expected Read error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let clone = CloneGrid::new(1, 1, 1.0, 0.0, 0.0).unwrap();
        let result = read_field(&clone, Path::new("missing.tif"), &[ValueScale::Scalar]);
        assert!(matches!(result, Err(EngineError::Read { .. })));
    }

    #[test]
    fn test_write_rejects_nonconforming_field() {
        let dir = tempfile::tempdir().unwrap();
        let clone = CloneGrid::new(2, 2, 1.0, 0.0, 0.0).unwrap();
        let field = Field::from_cells(1, 4, ValueScale::Scalar, vec![0.0; 4]).unwrap();
        let path = dir.path().join("out.tif");
        assert!(matches!(
            write_field(&clone, &field, &path),
            Err(EngineError::GridMismatch { .. })
        ));
        assert!(!path.exists());
    }
}
