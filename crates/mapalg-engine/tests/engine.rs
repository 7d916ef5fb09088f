//! Integration tests running engine kernels against files on disk.

use approx::assert_relative_eq;
use mapalg_engine::{load, CloneGrid, EngineError};
use mapalg_raster::{write_raster, GeoTransform, RasterHeader, RasterImage, ValueScale};
use std::path::Path;

fn write_dem(path: &Path, rows: usize, cols: usize) {
    let image = RasterImage {
        rows,
        cols,
        value_scale: ValueScale::Scalar,
        transform: Some(GeoTransform::north_up(200_000.0, 500_000.0, 10.0, -10.0)),
        crs: None,
        cells: (0..rows * cols).map(|i| 3.0 * (i % cols) as f64).collect(),
    };
    write_raster(path, &image).unwrap();
}

#[test]
fn test_slope_from_file_keeps_clone_georeferencing() {
    let dir = tempfile::tempdir().unwrap();
    let dem_path = dir.path().join("dem.tif");
    let out_path = dir.path().join("out").join("slope.tif");
    write_dem(&dem_path, 5, 5);

    let engine = load("native").unwrap();
    engine.probe().unwrap();
    let clone = CloneGrid::from_header(&RasterHeader::read(&dem_path).unwrap()).unwrap();
    let dem = engine.read(&clone, &dem_path, &[ValueScale::Scalar]).unwrap();
    let slope = engine.slope(&clone, &dem).unwrap();
    engine.write(&clone, &slope, &out_path).unwrap();

    let header = RasterHeader::read(&out_path).unwrap();
    assert_eq!((header.rows, header.cols), (5, 5));
    assert_eq!(header.value_scale, ValueScale::Scalar);
    assert_eq!(header.header_transform, Some(clone.transform()));
    assert_eq!(header.crs, None);

    let back = engine.read(&clone, &out_path, &[ValueScale::Scalar]).unwrap();
    assert_relative_eq!(back.get(2, 2).unwrap(), 0.3, epsilon = 1e-6);
}

#[test]
fn test_minimum_then_round_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("values.tif");
    let image = RasterImage {
        rows: 2,
        cols: 2,
        value_scale: ValueScale::Scalar,
        transform: None,
        crs: None,
        cells: vec![4.5, 2.5, f64::NAN, 7.25],
    };
    write_raster(&path, &image).unwrap();

    let engine = load("native").unwrap();
    let clone = CloneGrid::from_header(&RasterHeader::read(&path).unwrap()).unwrap();
    assert_eq!(clone.cell_size(), 1.0);

    let field = engine.read(&clone, &path, &[ValueScale::Scalar]).unwrap();
    let minimum = engine.map_minimum(&field).unwrap();
    assert!(minimum.cells().iter().all(|&v| v == 2.5));
    let rounded = engine.round_off(&minimum).unwrap();
    assert!(rounded.cells().iter().all(|&v| v == 3.0));
}

#[test]
fn test_lookup_with_invalid_table_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("table.txt");
    std::fs::write(&table, "# key value\n0 10\nten 20\n").unwrap();

    let engine = load("native").unwrap();
    let clone = CloneGrid::new(1, 1, 1.0, 0.0, 0.0).unwrap();
    let field = mapalg_engine::Field::filled(&clone, ValueScale::Scalar, 1.0);
    match engine.lookup_linear(&table, &field) {
        Err(EngineError::InvalidTable { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected InvalidTable, got {:?}", other),
    }
}
