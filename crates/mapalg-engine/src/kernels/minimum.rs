//! Global minimum reduction.

use super::require_scale;
use crate::{EngineResult, Field};
use mapalg_raster::ValueScale;

/// Replace every cell with the minimum over all non-no-data cells.
///
/// The output keeps the input's value scale. A field without any valid
/// cell reduces to an all no-data field.
pub fn map_minimum(field: &Field) -> EngineResult<Field> {
    require_scale("mapminimum", field, &[ValueScale::Ordinal, ValueScale::Scalar])?;
    let minimum = field
        .cells()
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f64::min)
        .unwrap_or(f64::NAN);
    Ok(field.map(|_| minimum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    #[test]
    fn test_global_minimum() {
        let field = Field::from_cells(2, 2, ValueScale::Scalar, vec![3.5, f64::NAN, -1.25, 8.0]).unwrap();
        let result = map_minimum(&field).unwrap();
        assert!(result.cells().iter().all(|&v| v == -1.25));
    }

    #[test]
    fn test_keeps_ordinal_scale_and_is_idempotent() {
        let field = Field::from_cells(1, 3, ValueScale::Ordinal, vec![4.0, 2.0, 9.0]).unwrap();
        let once = map_minimum(&field).unwrap();
        assert_eq!(once.scale(), ValueScale::Ordinal);
        assert_eq!(map_minimum(&once).unwrap(), once);
    }

    #[test]
    fn test_all_missing() {
        let field = Field::from_cells(2, 1, ValueScale::Scalar, vec![f64::NAN, f64::NAN]).unwrap();
        let result = map_minimum(&field).unwrap();
        assert_eq!(result.valid_count(), 0);
    }

    #[test]
    fn test_rejects_boolean_input() {
        let field = Field::from_cells(1, 1, ValueScale::Boolean, vec![1.0]).unwrap();
        assert!(matches!(map_minimum(&field), Err(EngineError::IncompatibleScale { .. })));
    }
}
