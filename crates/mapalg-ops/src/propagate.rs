//! CRS propagation from a source raster to written outputs.

use crate::params::{ParameterKind, ParameterMap};
use crate::{CrsPolicy, Operation, OperationError, OperationOutputs, OperationResult};
use mapalg_raster::{assign_crs, Crs, RasterHeader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Assign `source_crs` to the raster at `output`.
///
/// Returns true when the file was rewritten. A source without a CRS is
/// logged and leaves the output untouched.
pub fn propagate_crs(output: &Path, source_crs: Option<&Crs>) -> OperationResult<bool> {
    let Some(crs) = source_crs else {
        warn!("source of {} has no CRS; none assigned", output.display());
        return Ok(false);
    };

    let assigned = assign_crs(output, crs).map_err(|e| OperationError::CrsPropagation {
        path: output.to_path_buf(),
        reason: e.to_string(),
    })?;
    if assigned {
        info!("assigned {} to {}", crs, output.display());
    } else {
        debug!("{} already carries {}", output.display(), crs);
    }
    Ok(assigned)
}

/// Host-side propagation for operations with [`CrsPolicy::Host`].
///
/// The CRS of the operation's first raster input is assigned to every
/// output. Operations that propagate on their own are skipped. The source
/// path is resolved the same way `execute` resolved it. Returns the number
/// of outputs rewritten.
pub fn propagate_host_crs(
    operation: &dyn Operation,
    parameters: &ParameterMap,
    outputs: &OperationOutputs,
) -> OperationResult<usize> {
    if operation.crs_policy() == CrsPolicy::Explicit {
        return Ok(0);
    }

    let Some(spec) = operation
        .parameters()
        .iter()
        .find(|p| p.kind == ParameterKind::RasterLayer)
    else {
        return Ok(0);
    };
    let validated = parameters.validate(operation.metadata().id, operation.parameters())?;
    let source = validated.path(spec.key)?;

    let header = RasterHeader::read(source).map_err(|e| {
        OperationError::EngineRead(format!("Cannot read {}: {}", source.display(), e))
    })?;

    let mut assigned = 0;
    for (_, path) in outputs.iter() {
        if propagate_crs(path, header.crs.as_ref())? {
            assigned += 1;
        }
    }
    Ok(assigned)
}
