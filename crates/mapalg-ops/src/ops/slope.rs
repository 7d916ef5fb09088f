//! slope: slope of a digital elevation model.

use crate::params::{ParameterKind, ParameterSpec, ValidatedParameters, INPUT, OUTPUT};
use crate::{CrsPolicy, GridMode, OperationMetadata, OperationResult, RasterOperation};
use mapalg_engine::{CloneGrid, Engine, Field};
use mapalg_raster::ValueScale;
use std::path::{Path, PathBuf};

/// Slope of a scalar DEM, as a fraction (rise over run).
///
/// The grid is bound from the DEM's full geotransform and the DEM's CRS is
/// assigned to the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Slope;

#[derive(Debug, Clone, PartialEq)]
pub struct SlopeConfig {
    pub dem: PathBuf,
    pub output: PathBuf,
}

impl RasterOperation for Slope {
    type Config = SlopeConfig;

    const METADATA: &'static OperationMetadata = &OperationMetadata {
        id: "slope",
        display_name: "slope",
        group: "Derivatives of digital elevation models",
        group_id: "demderivatives",
        help: "Slope of cells using a digital elevation model\n\n\
               DEM layer: scalar raster.\n\
               Slope layer: scalar raster with slope as a fraction.",
        doc_url: "https://pcraster.geo.uu.nl/pcraster/4.3.1/documentation/pcraster_manual/sphinx/op_slope.html",
    };

    const PARAMETERS: &'static [ParameterSpec] = &[
        ParameterSpec::new(INPUT, "DEM layer", ParameterKind::RasterLayer),
        ParameterSpec::new(OUTPUT, "Slope layer", ParameterKind::RasterDestination),
    ];

    const GRID_MODE: GridMode = GridMode::Geotransform;
    const CRS_POLICY: CrsPolicy = CrsPolicy::Explicit;

    fn configure(&self, parameters: &ValidatedParameters) -> OperationResult<Self::Config> {
        Ok(SlopeConfig {
            dem: parameters.path(INPUT)?.to_path_buf(),
            output: parameters.path(OUTPUT)?.to_path_buf(),
        })
    }

    fn reference<'c>(&self, config: &'c Self::Config) -> &'c Path {
        &config.dem
    }

    fn destination<'c>(&self, config: &'c Self::Config) -> &'c Path {
        &config.output
    }

    fn compute(&self, engine: &dyn Engine, grid: &CloneGrid, config: &Self::Config) -> OperationResult<Field> {
        let dem = engine.read(grid, &config.dem, &[ValueScale::Scalar])?;
        Ok(engine.slope(grid, &dem)?)
    }
}
