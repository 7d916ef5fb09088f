//! # mapalg-engine
//!
//! In-process raster-algebra engine.
//!
//! The engine works on a bound computational grid (the "clone"):
//! - [`CloneGrid`] holds rows, columns, cell size and origin and is passed
//!   explicitly to every read and write
//! - [`Field`] is an in-memory raster with NaN as no-data
//! - [`kernels`] implements lookuplinear, mapminimum, roundoff and slope
//! - [`Engine`] bundles I/O and kernels; [`load`] resolves one by name
//!
//! ## Example
//!
//! ```no_run
//! use mapalg_engine::{load, CloneGrid};
//! use mapalg_raster::ValueScale;
//! use std::path::Path;
//!
//! let engine = load("native")?;
//! engine.probe()?;
//!
//! let clone = CloneGrid::new(400, 600, 25.0, 155_000.0, 463_000.0)?;
//! let dem = engine.read(&clone, Path::new("dem.tif"), &[ValueScale::Scalar])?;
//! let slope = engine.slope(&clone, &dem)?;
//! engine.write(&clone, &slope, Path::new("slope.tif"))?;
//! # Ok::<(), mapalg_engine::EngineError>(())
//! ```

mod clone;
mod engine;
mod error;
mod field;
mod io;
pub mod kernels;
mod table;

pub use clone::CloneGrid;
pub use engine::{available, load, Engine, NativeEngine};
pub use error::{EngineError, EngineResult};
pub use field::Field;
pub use io::{read_field, write_field};
pub use table::{LookupTable, TableRow};
