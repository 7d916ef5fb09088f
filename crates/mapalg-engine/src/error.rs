//! Error types for engine operations

use mapalg_raster::ValueScale;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by a raster-algebra engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine cannot be loaded or used in this process
    #[error("Raster-algebra engine '{engine}' is not available: {reason}")]
    Unavailable { engine: String, reason: String },

    /// A computational grid with unusable geometry was requested
    #[error("Invalid computational grid: {0}")]
    InvalidGrid(String),

    /// A raster does not conform to the bound computational grid
    #[error("{} does not match the computational grid: expected {expected}, found {found}", path.display())]
    GridMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A raster could not be opened, decoded or accepted
    #[error("Cannot read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    /// A raster could not be written
    #[error("Cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// A lookup table could not be parsed
    #[error("Invalid lookup table {}, line {line}: {reason}", path.display())]
    InvalidTable {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A kernel received a field of a value scale it does not accept
    #[error("{kernel} does not accept {found} input (expected {expected})")]
    IncompatibleScale {
        kernel: &'static str,
        found: ValueScale,
        expected: String,
    },
}

impl EngineError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EngineError::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EngineError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Human-readable list of accepted value scales, e.g. "ordinal or scalar".
pub(crate) fn describe_scales(scales: &[ValueScale]) -> String {
    let names: Vec<String> = scales.iter().map(|s| s.to_string()).collect();
    match names.split_last() {
        None => "nothing".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_scales() {
        assert_eq!(describe_scales(&[ValueScale::Scalar]), "scalar");
        assert_eq!(
            describe_scales(&[ValueScale::Ordinal, ValueScale::Scalar]),
            "ordinal or scalar"
        );
        assert_eq!(
            describe_scales(&[ValueScale::Boolean, ValueScale::Nominal, ValueScale::Ldd]),
            "boolean, nominal or ldd"
        );
    }
}
