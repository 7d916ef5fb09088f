//! lookuplinear: table lookup with linear interpolation.

use super::{PCRASTER_GROUP, PCRASTER_GROUP_ID};
use crate::params::{ParameterKind, ParameterSpec, ValidatedParameters, INPUT, INPUT1, OUTPUT};
use crate::{OperationMetadata, OperationResult, RasterOperation};
use mapalg_engine::{CloneGrid, Engine, Field};
use mapalg_raster::ValueScale;
use std::path::{Path, PathBuf};

/// Assigns table values to scalar cells, interpolating between keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupLinear;

#[derive(Debug, Clone, PartialEq)]
pub struct LookupLinearConfig {
    pub input: PathBuf,
    pub table: PathBuf,
    pub output: PathBuf,
}

impl RasterOperation for LookupLinear {
    type Config = LookupLinearConfig;

    const METADATA: &'static OperationMetadata = &OperationMetadata {
        id: "lookuplinear",
        display_name: "lookuplinear",
        group: PCRASTER_GROUP,
        group_id: PCRASTER_GROUP_ID,
        help: "Assigns table key values with possible interpolation between key values.\n\n\
               Input raster layer: raster of scalar data type.\n\
               Input lookup table: plain-text table in PCRaster column table format.\n\
               Output raster layer: raster of scalar data type.",
        doc_url: "https://pcraster.geo.uu.nl/pcraster/4.3.1/documentation/pcraster_manual/sphinx/op_lookuplinear.html",
    };

    const PARAMETERS: &'static [ParameterSpec] = &[
        ParameterSpec::new(INPUT, "Input raster layer", ParameterKind::RasterLayer),
        ParameterSpec::new(INPUT1, "Input lookup table", ParameterKind::LookupTableFile),
        ParameterSpec::new(OUTPUT, "Output raster layer", ParameterKind::RasterDestination),
    ];

    fn configure(&self, parameters: &ValidatedParameters) -> OperationResult<Self::Config> {
        Ok(LookupLinearConfig {
            input: parameters.path(INPUT)?.to_path_buf(),
            table: parameters.path(INPUT1)?.to_path_buf(),
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
        Ok(engine.lookup_linear(&config.table, &field)?)
    }
}
