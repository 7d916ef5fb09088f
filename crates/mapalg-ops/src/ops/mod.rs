//! The map-algebra operations.

mod lookuplinear;
mod mapminimum;
mod roundoff;
mod slope;

pub use lookuplinear::{LookupLinear, LookupLinearConfig};
pub use mapminimum::{MapMinimum, MapMinimumConfig};
pub use roundoff::{RoundOff, RoundOffConfig};
pub use slope::{Slope, SlopeConfig};

/// Group shared by the general-purpose operations.
const PCRASTER_GROUP: &str = "PCRaster";
const PCRASTER_GROUP_ID: &str = "pcraster";
