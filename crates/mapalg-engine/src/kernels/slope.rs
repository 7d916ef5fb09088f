//! Slope from a digital elevation model.

use super::require_scale;
use crate::{CloneGrid, EngineError, EngineResult, Field};
use mapalg_raster::ValueScale;

/// Slope (rise over run) of a scalar DEM using Horn's 3x3 method.
///
/// With the neighborhood
/// ```text
/// a b c
/// d e f
/// g h i
/// ```
/// dz/dx = ((c + 2f + i) - (a + 2d + g)) / (8 * cellsize)
/// dz/dy = ((g + 2h + i) - (a + 2b + c)) / (8 * cellsize)
/// slope = sqrt(dz/dx² + dz/dy²)
///
/// Cells without an elevation stay no-data. Neighbors outside the map or
/// without an elevation take the center cell's elevation, so border cells
/// still get a slope.
pub fn slope(clone: &CloneGrid, dem: &Field) -> EngineResult<Field> {
    require_scale("slope", dem, &[ValueScale::Scalar])?;
    if !dem.conforms_to(clone) {
        return Err(EngineError::InvalidGrid(format!(
            "DEM of {}x{} cells does not cover clone {}",
            dem.rows(),
            dem.cols(),
            clone
        )));
    }

    let eight_cell_size = 8.0 * clone.cell_size();
    let (rows, cols) = (dem.rows(), dem.cols());
    let mut cells = vec![f64::NAN; rows * cols];

    for row in 0..rows {
        for col in 0..cols {
            let Some(e) = dem.get(row, col) else {
                continue;
            };
            let (r, c) = (row as isize, col as isize);
            let z = |dr: isize, dc: isize| dem.get_signed(r + dr, c + dc).unwrap_or(e);

            let (a, b, cc) = (z(-1, -1), z(-1, 0), z(-1, 1));
            let (d, f) = (z(0, -1), z(0, 1));
            let (g, h, i) = (z(1, -1), z(1, 0), z(1, 1));

            let dzdx = ((cc + 2.0 * f + i) - (a + 2.0 * d + g)) / eight_cell_size;
            let dzdy = ((g + 2.0 * h + i) - (a + 2.0 * b + cc)) / eight_cell_size;
            cells[row * cols + col] = (dzdx * dzdx + dzdy * dzdy).sqrt();
        }
    }

    Field::from_cells(rows, cols, ValueScale::Scalar, cells)
        .ok_or_else(|| EngineError::InvalidGrid(format!("slope buffer does not cover {}", clone)))
}
