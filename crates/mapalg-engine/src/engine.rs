//! Engine handle used by operations.
//!
//! An engine bundles the I/O adapter and the kernels behind one object so
//! operations never touch either directly. Engines are resolved by name with
//! [`load`]; callers must [`Engine::probe`] before any other use.

use crate::{io, kernels, CloneGrid, EngineError, EngineResult, Field, LookupTable};
use mapalg_raster::ValueScale;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

/// A raster-algebra engine.
pub trait Engine: Send + Sync + Debug {
    /// Name the engine is registered under.
    fn name(&self) -> &str;

    /// Check that the engine is usable in this process.
    fn probe(&self) -> EngineResult<()>;

    /// Read a raster conformant with `clone`, rejecting scales outside `accepted`.
    fn read(&self, clone: &CloneGrid, path: &Path, accepted: &[ValueScale]) -> EngineResult<Field>;

    /// Write a field georeferenced by `clone`.
    fn write(&self, clone: &CloneGrid, field: &Field, path: &Path) -> EngineResult<()>;

    /// Linear lookup of `field` in the table file at `table`.
    fn lookup_linear(&self, table: &Path, field: &Field) -> EngineResult<Field>;

    fn map_minimum(&self, field: &Field) -> EngineResult<Field>;

    fn round_off(&self, field: &Field) -> EngineResult<Field>;

    /// Slope of a DEM on the clone's cell size.
    fn slope(&self, clone: &CloneGrid, dem: &Field) -> EngineResult<Field>;
}

/// The in-process engine backed by this crate's kernels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

impl NativeEngine {
    pub const NAME: &'static str = "native";
}

impl Engine for NativeEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn probe(&self) -> EngineResult<()> {
        Ok(())
    }

    fn read(&self, clone: &CloneGrid, path: &Path, accepted: &[ValueScale]) -> EngineResult<Field> {
        io::read_field(clone, path, accepted)
    }

    fn write(&self, clone: &CloneGrid, field: &Field, path: &Path) -> EngineResult<()> {
        io::write_field(clone, field, path)
    }

    fn lookup_linear(&self, table: &Path, field: &Field) -> EngineResult<Field> {
        let table_rows = LookupTable::from_file(table)?;
        debug!("{} rows in lookup table {}", table_rows.rows().len(), table.display());
        kernels::lookup_linear(&table_rows, field)
    }

    fn map_minimum(&self, field: &Field) -> EngineResult<Field> {
        let result = kernels::map_minimum(field)?;
        match result.cells().first().filter(|v| !v.is_nan()) {
            Some(minimum) => info!("map minimum: {}", minimum),
            None => info!("map minimum: no valid cells"),
        }
        Ok(result)
    }

    fn round_off(&self, field: &Field) -> EngineResult<Field> {
        kernels::round_off(field)
    }

    fn slope(&self, clone: &CloneGrid, dem: &Field) -> EngineResult<Field> {
        kernels::slope(clone, dem)
    }
}

/// Names of the engines [`load`] can resolve.
pub fn available() -> &'static [&'static str] {
    &[NativeEngine::NAME]
}

/// Load an engine by name.
///
/// Names are matched case-insensitively. Unknown names fail with
/// [`EngineError::Unavailable`].
pub fn load(name: &str) -> EngineResult<Box<dyn Engine>> {
    if name.eq_ignore_ascii_case(NativeEngine::NAME) {
        Ok(Box::new(NativeEngine))
    } else {
        Err(EngineError::Unavailable {
            engine: name.to_string(),
            reason: format!("no such engine (available: {})", available().join(", ")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_native() {
        let engine = load("native").unwrap();
        assert_eq!(engine.name(), "native");
        assert!(engine.probe().is_ok());
        assert!(load("Native").is_ok());
    }

    #[test]
    fn test_load_unknown() {
        match load("pcraster") {
            Err(EngineError::Unavailable { engine, reason }) => {
                assert_eq!(engine, "pcraster");
                assert!(reason.contains("native"));
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_reads_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("table.txt");
        std::fs::write(&table, "0 10\n10 20\n").unwrap();
        let field = Field::from_cells(1, 2, ValueScale::Scalar, vec![5.0, 20.0]).unwrap();

        let result = NativeEngine.lookup_linear(&table, &field).unwrap();
        assert_eq!(result.get(0, 0), Some(15.0));
        assert_eq!(result.get(0, 1), None);
    }
}
