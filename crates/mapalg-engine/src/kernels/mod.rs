//! Raster-algebra primitives.
//!
//! Each kernel is a pure function of its input fields. Value scales are
//! checked on entry; no-data (NaN) propagates as documented per kernel.

mod lookup;
mod minimum;
mod round;
mod slope;

pub use lookup::lookup_linear;
pub use minimum::map_minimum;
pub use round::round_off;
pub use slope::slope;

use crate::error::describe_scales;
use crate::{EngineError, EngineResult, Field};
use mapalg_raster::ValueScale;

/// Fail with [`EngineError::IncompatibleScale`] unless the field's scale is accepted.
fn require_scale(kernel: &'static str, field: &Field, accepted: &[ValueScale]) -> EngineResult<()> {
    if accepted.contains(&field.scale()) {
        Ok(())
    } else {
        Err(EngineError::IncompatibleScale {
            kernel,
            found: field.scale(),
            expected: describe_scales(accepted),
        })
    }
}
