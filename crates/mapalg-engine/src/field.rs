//! In-memory rasters.

use crate::CloneGrid;
use mapalg_raster::ValueScale;

/// A 2-D field of typed cell values conformant with a clone.
///
/// Cells are row-major; NaN marks no-data regardless of value scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    rows: usize,
    cols: usize,
    scale: ValueScale,
    cells: Vec<f64>,
}

impl Field {
    /// Create a field from row-major cells.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_cells(rows: usize, cols: usize, scale: ValueScale, cells: Vec<f64>) -> Option<Self> {
        (cells.len() == rows * cols).then_some(Self {
            rows,
            cols,
            scale,
            cells,
        })
    }

    /// A field covering the clone with every cell set to `value`.
    pub fn filled(clone: &CloneGrid, scale: ValueScale, value: f64) -> Self {
        Self {
            rows: clone.rows(),
            cols: clone.cols(),
            scale,
            cells: vec![value; clone.len()],
        }
    }

    /// A field with the same shape and scale, with cells mapped by `f`.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            scale: self.scale,
            cells: self.cells.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn scale(&self) -> ValueScale {
        self.scale
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Cell value, `None` for no-data or out-of-range indices.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let value = self.cells[row * self.cols + col];
        (!value.is_nan()).then_some(value)
    }

    /// Cell value at signed indices, `None` outside the field or for no-data.
    pub fn get_signed(&self, row: isize, col: isize) -> Option<f64> {
        if row < 0 || col < 0 {
            return None;
        }
        self.get(row as usize, col as usize)
    }

    /// Number of cells holding a value.
    pub fn valid_count(&self) -> usize {
        self.cells.iter().filter(|v| !v.is_nan()).count()
    }

    /// True when the field's shape matches the clone.
    pub fn conforms_to(&self, clone: &CloneGrid) -> bool {
        self.rows == clone.rows() && self.cols == clone.cols()
    }
}
