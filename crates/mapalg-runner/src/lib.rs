//! # mapalg-runner
//!
//! Host for map-algebra operations on the command line. The `mapalg`
//! binary resolves operations from the registry, runs them on the
//! configured engine and, for operations that leave it to the host,
//! assigns the input CRS to their outputs.

pub mod commands;
mod config;

pub use config::{ConfigError, RunnerConfig, DEFAULT_CONFIG_FILE};
