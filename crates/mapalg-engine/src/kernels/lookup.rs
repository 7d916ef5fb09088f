//! Linear table lookup.

use super::require_scale;
use crate::{EngineResult, Field, LookupTable};
use mapalg_raster::ValueScale;

/// Assign table values to a scalar field with linear interpolation between keys.
///
/// Cells outside the table's key range, and no-data cells, become no-data.
pub fn lookup_linear(table: &LookupTable, field: &Field) -> EngineResult<Field> {
    require_scale("lookuplinear", field, &[ValueScale::Scalar])?;
    Ok(field.map(|v| table.interpolate(v).unwrap_or(f64::NAN)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;
    use std::path::Path;

    fn table() -> LookupTable {
        LookupTable::parse(Path::new("t.txt"), "0 10\n10 20\n").unwrap()
    }

    #[test]
    fn test_interpolates_each_cell() {
        let field = Field::from_cells(1, 5, ValueScale::Scalar, vec![5.0, -1.0, 11.0, f64::NAN, 2.5]).unwrap();
        let result = lookup_linear(&table(), &field).unwrap();
        let cells = result.cells();
        assert_eq!(cells[0], 15.0);
        assert!(cells[1].is_nan());
        assert!(cells[2].is_nan());
        assert!(cells[3].is_nan());
        assert_eq!(cells[4], 12.5);
        assert_eq!(result.scale(), ValueScale::Scalar);
    }

    #[test]
    fn test_rejects_nominal_input() {
        let field = Field::from_cells(1, 1, ValueScale::Nominal, vec![1.0]).unwrap();
        assert!(matches!(
            lookup_linear(&table(), &field),
            Err(EngineError::IncompatibleScale { kernel: "lookuplinear", .. })
        ));
    }
}
