//! # mapalg-ops
//!
//! Map-algebra operations exposed to a host through one uniform contract.
//!
//! Each operation declares its parameters and metadata, validates the
//! host's untyped parameter map into a typed configuration, binds a
//! computational grid from its reference raster and runs its kernel on an
//! [`Engine`](mapalg_engine::Engine). The result maps the output key to
//! the absolute path of the written raster.
//!
//! | id | group | inputs |
//! |----|-------|--------|
//! | `lookuplinear` | PCRaster | `INPUT` scalar raster, `INPUT1` lookup table |
//! | `mapminimum` | PCRaster | `INPUT` ordinal or scalar raster |
//! | `roundoff` | PCRaster | `INPUT` scalar raster |
//! | `slope` | Derivatives of digital elevation models | `INPUT` scalar DEM |
//!
//! All operations write `OUTPUT`.
//!
//! ## Example
//!
//! ```no_run
//! use mapalg_ops::{find, ParameterMap};
//!
//! let engine = mapalg_engine::load("native")?;
//! let slope = find("slope")?;
//! let params = ParameterMap::new()
//!     .with("INPUT", "dem.tif")
//!     .with("OUTPUT", "slope.tif");
//! let outputs = slope.execute(engine.as_ref(), &params)?;
//! println!("{:?}", outputs.get("OUTPUT"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod binding;
mod contract;
mod error;
pub mod ops;
mod params;
mod propagate;
mod registry;

pub use binding::{bind, GridBinding};
pub use contract::{CrsPolicy, GridMode, Operation, OperationMetadata, OperationOutputs, RasterOperation};
pub use error::{OperationError, OperationResult};
pub use params::{
    ParameterKind, ParameterMap, ParameterSpec, ValidatedParameters, INPUT, INPUT1, OUTPUT,
};
pub use propagate::{propagate_crs, propagate_host_crs};
pub use registry::{find, operations};
