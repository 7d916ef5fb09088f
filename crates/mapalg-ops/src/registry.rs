//! Lookup of operations by id.

use crate::ops::{LookupLinear, MapMinimum, RoundOff, Slope};
use crate::{Operation, OperationError, OperationResult};

static OPERATIONS: [&dyn Operation; 4] = [&LookupLinear, &MapMinimum, &RoundOff, &Slope];

/// Every registered operation, in display order.
pub fn operations() -> &'static [&'static dyn Operation] {
    &OPERATIONS
}

/// Resolve an operation id, ignoring ASCII case.
pub fn find(id: &str) -> OperationResult<&'static dyn Operation> {
    OPERATIONS
        .iter()
        .copied()
        .find(|op| op.metadata().id.eq_ignore_ascii_case(id))
        .ok_or_else(|| OperationError::UnknownOperation(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CrsPolicy, GridMode};
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = operations().iter().map(|op| op.metadata().id).collect();
        assert_eq!(ids.len(), operations().len());
    }

    #[test]
    fn test_find_ignores_case() {
        let slope = find("Slope").unwrap();
        assert_eq!(slope.metadata().id, "slope");
        assert_eq!(slope.metadata().group_id, "demderivatives");
        assert_eq!(slope.grid_mode(), GridMode::Geotransform);
        assert_eq!(slope.crs_policy(), CrsPolicy::Explicit);

        let lookup = find("LOOKUPLINEAR").unwrap();
        assert_eq!(lookup.parameters().len(), 3);
        assert_eq!(lookup.crs_policy(), CrsPolicy::Host);
    }

    #[test]
    fn test_unknown_operation() {
        assert!(matches!(find("mapmaximum"), Err(OperationError::UnknownOperation(_))));
    }

    #[test]
    fn test_every_operation_declares_one_output() {
        for op in operations() {
            let outputs = op
                .parameters()
                .iter()
                .filter(|p| p.kind == crate::ParameterKind::RasterDestination)
                .count();
            assert_eq!(outputs, 1, "{}", op.metadata().id);
            assert!(op.metadata().doc_url.ends_with(&format!("op_{}.html", op.metadata().id)));
        }
    }
}
