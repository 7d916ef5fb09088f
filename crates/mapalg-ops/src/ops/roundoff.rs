//! roundoff: round cell values to whole numbers.

use super::{PCRASTER_GROUP, PCRASTER_GROUP_ID};
use crate::params::{ParameterKind, ParameterSpec, ValidatedParameters, INPUT, OUTPUT};
use crate::{OperationMetadata, OperationResult, RasterOperation};
use mapalg_engine::{CloneGrid, Engine, Field};
use mapalg_raster::ValueScale;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct RoundOff;

#[derive(Debug, Clone, PartialEq)]
pub struct RoundOffConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl RasterOperation for RoundOff {
    type Config = RoundOffConfig;

    const METADATA: &'static OperationMetadata = &OperationMetadata {
        id: "roundoff",
        display_name: "roundoff",
        group: PCRASTER_GROUP,
        group_id: PCRASTER_GROUP_ID,
        help: "Rounding off of cell values to whole numbers\n\n\
               Scalar raster layer: scalar raster.\n\
               Output roundoff layer: scalar raster with the result.",
        doc_url: "https://pcraster.geo.uu.nl/pcraster/4.3.1/documentation/pcraster_manual/sphinx/op_roundoff.html",
    };

    const PARAMETERS: &'static [ParameterSpec] = &[
        ParameterSpec::new(INPUT, "Scalar raster layer", ParameterKind::RasterLayer),
        ParameterSpec::new(OUTPUT, "Output roundoff layer", ParameterKind::RasterDestination),
    ];

    fn configure(&self, parameters: &ValidatedParameters) -> OperationResult<Self::Config> {
        Ok(RoundOffConfig {
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
        let field = engine.read(grid, &config.input, &[ValueScale::Scalar])?;
        Ok(engine.round_off(&field)?)
    }
}
