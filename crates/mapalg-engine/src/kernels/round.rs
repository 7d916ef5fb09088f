//! Rounding to whole numbers.

use super::require_scale;
use crate::{EngineResult, Field};
use mapalg_raster::ValueScale;

/// Round every scalar cell to the nearest whole number.
///
/// Halves round away from zero (2.5 -> 3, -2.5 -> -3). No-data propagates.
pub fn round_off(field: &Field) -> EngineResult<Field> {
    require_scale("roundoff", field, &[ValueScale::Scalar])?;
    Ok(field.map(f64::round))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_away_from_zero() {
        let field = Field::from_cells(
            1,
            7,
            ValueScale::Scalar,
            vec![2.5, -2.5, 0.49, -0.51, 7.0, f64::NAN, 1e9 + 0.5],
        )
        .unwrap();
        let result = round_off(&field).unwrap();
        let cells = result.cells();
        assert_eq!(&cells[..5], &[3.0, -3.0, 0.0, -1.0, 7.0]);
        assert!(cells[5].is_nan());
        assert_eq!(cells[6], 1e9 + 1.0);
    }

    #[test]
    fn test_idempotent() {
        let field = Field::from_cells(1, 4, ValueScale::Scalar, vec![0.5, -3.7, 12.2, f64::NAN]).unwrap();
        let once = round_off(&field).unwrap();
        let twice = round_off(&once).unwrap();
        for (a, b) in once.cells().iter().zip(twice.cells()) {
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }
}
