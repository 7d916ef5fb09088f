//! The operation contract shared by all operations.
//!
//! Operations implement the typed [`RasterOperation`] trait: a configuration
//! type built from validated parameters, the reference raster the grid is
//! bound from, and a compute step. The object-safe [`Operation`] trait is
//! derived from it and runs the uniform execute pipeline:
//!
//! 1. probe the engine
//! 2. validate parameters into the typed configuration
//! 3. bind the computational grid from the reference raster
//! 4. read inputs, compute, write the destination
//! 5. propagate the CRS when the operation's policy is [`CrsPolicy::Explicit`]
//! 6. return the output mapping

use crate::binding::bind;
use crate::params::{ParameterMap, ParameterSpec, ValidatedParameters, OUTPUT};
use crate::propagate::propagate_crs;
use crate::{OperationError, OperationResult};
use mapalg_engine::{CloneGrid, Engine, Field};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Descriptive metadata shown by hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationMetadata {
    /// Stable identifier, unique within the registry.
    pub id: &'static str,
    pub display_name: &'static str,
    pub group: &'static str,
    pub group_id: &'static str,
    pub help: &'static str,
    pub doc_url: &'static str,
}

/// How the computational grid is derived from the reference raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    /// Simplified header georeferencing (pixel scale and tiepoint).
    #[default]
    Header,
    /// Full affine geotransform, including ModelTransformation.
    Geotransform,
}

/// Who assigns the source CRS to written outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrsPolicy {
    /// The execute pipeline assigns it after writing.
    Explicit,
    /// The host is expected to assign it.
    #[default]
    Host,
}

/// Output key to absolute path of each written raster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OperationOutputs(BTreeMap<String, PathBuf>);

impl OperationOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, path: PathBuf) {
        self.0.insert(key.into(), path);
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.0.get(key).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

/// An operation with a typed configuration.
pub trait RasterOperation: Send + Sync + Debug {
    /// Configuration built from validated parameters.
    type Config: Debug;

    const METADATA: &'static OperationMetadata;
    const PARAMETERS: &'static [ParameterSpec];
    const GRID_MODE: GridMode = GridMode::Header;
    const CRS_POLICY: CrsPolicy = CrsPolicy::Host;

    fn configure(&self, parameters: &ValidatedParameters) -> OperationResult<Self::Config>;

    /// Raster the computational grid is bound from.
    fn reference<'c>(&self, config: &'c Self::Config) -> &'c Path;

    /// Path the result is written to under [`OUTPUT`].
    fn destination<'c>(&self, config: &'c Self::Config) -> &'c Path;

    /// Read inputs under `grid` and compute the result field.
    fn compute(&self, engine: &dyn Engine, grid: &CloneGrid, config: &Self::Config) -> OperationResult<Field>;
}

/// Object-safe view of an operation, as used by hosts and the registry.
pub trait Operation: Send + Sync + Debug {
    fn metadata(&self) -> &OperationMetadata;

    fn parameters(&self) -> &[ParameterSpec];

    fn grid_mode(&self) -> GridMode;

    fn crs_policy(&self) -> CrsPolicy;

    /// Run the operation. Either every declared output is written and
    /// returned or an error is returned.
    fn execute(&self, engine: &dyn Engine, parameters: &ParameterMap) -> OperationResult<OperationOutputs>;
}

impl<T: RasterOperation> Operation for T {
    fn metadata(&self) -> &OperationMetadata {
        T::METADATA
    }

    fn parameters(&self) -> &[ParameterSpec] {
        T::PARAMETERS
    }

    fn grid_mode(&self) -> GridMode {
        T::GRID_MODE
    }

    fn crs_policy(&self) -> CrsPolicy {
        T::CRS_POLICY
    }

    fn execute(&self, engine: &dyn Engine, parameters: &ParameterMap) -> OperationResult<OperationOutputs> {
        let id = T::METADATA.id;
        let started = Instant::now();
        info!("{}: starting on engine '{}'", id, engine.name());

        engine
            .probe()
            .map_err(|e| OperationError::EngineUnavailable(e.to_string()))?;

        let validated = parameters.validate(id, T::PARAMETERS)?;
        let config = self.configure(&validated)?;
        debug!("{}: {:?}", id, config);

        let binding = bind(self.reference(&config), T::GRID_MODE)?;
        let result = self.compute(engine, &binding.grid, &config)?;
        debug!("{}: computed {} cells ({} valid)", id, binding.grid.len(), result.valid_count());

        let destination = self.destination(&config);
        engine.write(&binding.grid, &result, destination)?;

        if T::CRS_POLICY == CrsPolicy::Explicit {
            propagate_crs(destination, binding.header.crs.as_ref())?;
        }

        let absolute = std::fs::canonicalize(destination).map_err(|e| {
            OperationError::EngineWrite(format!("Cannot resolve {}: {}", destination.display(), e))
        })?;
        let mut outputs = OperationOutputs::new();
        outputs.insert(OUTPUT, absolute);

        info!("{}: finished in {:.2?}", id, started.elapsed());
        Ok(outputs)
    }
}
