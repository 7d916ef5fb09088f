//! mapminimum: global minimum cell value.

use super::{PCRASTER_GROUP, PCRASTER_GROUP_ID};
use crate::params::{ParameterKind, ParameterSpec, ValidatedParameters, INPUT, OUTPUT};
use crate::{OperationMetadata, OperationResult, RasterOperation};
use mapalg_engine::{CloneGrid, Engine, Field};
use mapalg_raster::ValueScale;
use std::path::{Path, PathBuf};

/// Fills the map with the minimum cell value of an ordinal or scalar raster.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapMinimum;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMinimumConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl RasterOperation for MapMinimum {
    type Config = MapMinimumConfig;

    const METADATA: &'static OperationMetadata = &OperationMetadata {
        id: "mapminimum",
        display_name: "mapminimum",
        group: PCRASTER_GROUP,
        group_id: PCRASTER_GROUP_ID,
        help: "Minimum cell value\n\n\
               Input raster layer: ordinal or scalar raster.\n\
               Output minimum value layer: raster of the input's type holding the minimum cell value.",
        doc_url: "https://pcraster.geo.uu.nl/pcraster/4.3.1/documentation/pcraster_manual/sphinx/op_mapminimum.html",
    };

    const PARAMETERS: &'static [ParameterSpec] = &[
        ParameterSpec::new(INPUT, "Input raster layer", ParameterKind::RasterLayer),
        ParameterSpec::new(OUTPUT, "Output minimum value layer", ParameterKind::RasterDestination),
    ];

    fn configure(&self, parameters: &ValidatedParameters) -> OperationResult<Self::Config> {
        Ok(MapMinimumConfig {
            input: parameters.path(INPUT)?.to_path_buf(),
            output: parameters.path(OUTPUT)?.to_path_buf(),
        })
    }

    fn reference<'c>(&self, config: &'c Self::Config) -> &'c Path {
        &config.input
    }

    fn destination<'c>(&self, config: &'c Self::Config) -> &'c Path {
        &config.output
    }

    fn compute(&self, engine: &dyn Engine, grid: &CloneGrid, config: &Self::Config) -> OperationResult<Field> {
        let field = engine.read(grid, &config.input, &[ValueScale::Ordinal, ValueScale::Scalar])?;
        Ok(engine.map_minimum(&field)?)
    }
}
