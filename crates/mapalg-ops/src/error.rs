//! Error types reported by operations to their host.

use mapalg_engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for operation execution.
pub type OperationResult<T> = Result<T, OperationError>;

/// A failed operation invocation.
///
/// Every variant carries a complete human-readable message; hosts display
/// it as is.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("The raster-algebra engine is not available. {0}")]
    EngineUnavailable(String),

    #[error("Input does not match the computational grid. {0}")]
    GridMismatch(String),

    #[error("Cannot bind a computational grid. {0}")]
    InvalidGrid(String),

    #[error("Engine read failed. {0}")]
    EngineRead(String),

    #[error("Engine write failed. {0}")]
    EngineWrite(String),

    #[error("{0}")]
    InvalidTable(String),

    #[error("Incompatible value scale. {0}")]
    IncompatibleValueScale(String),

    #[error("Missing required parameter {key} for {operation}")]
    MissingParameter { operation: String, key: String },

    #[error("Unexpected parameter {key} for {operation}")]
    UnexpectedParameter { operation: String, key: String },

    #[error("Invalid value for parameter {key}: {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("Cannot assign CRS to {}: {reason}", path.display())]
    CrsPropagation { path: PathBuf, reason: String },

    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),
}

impl From<EngineError> for OperationError {
    fn from(e: EngineError) -> Self {
        let message = e.to_string();
        match e {
            EngineError::Unavailable { .. } => OperationError::EngineUnavailable(message),
            EngineError::InvalidGrid(_) => OperationError::InvalidGrid(message),
            EngineError::GridMismatch { .. } => OperationError::GridMismatch(message),
            EngineError::Read { .. } => OperationError::EngineRead(message),
            EngineError::Write { .. } => OperationError::EngineWrite(message),
            EngineError::InvalidTable { .. } => OperationError::InvalidTable(message),
            EngineError::IncompatibleScale { .. } => OperationError::IncompatibleValueScale(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_operation_errors() {
        let unavailable = EngineError::Unavailable {
            engine: "pcraster".to_string(),
            reason: "no such engine".to_string(),
        };
        let e = OperationError::from(unavailable);
        assert!(matches!(e, OperationError::EngineUnavailable(_)));
        assert!(e.to_string().contains("'pcraster'"));

        let table = EngineError::InvalidTable {
            path: PathBuf::from("table.txt"),
            line: 4,
            reason: "'x' is not a number".to_string(),
        };
        let e = OperationError::from(table);
        assert!(matches!(e, OperationError::InvalidTable(_)));
        assert_eq!(
            e.to_string(),
            "Invalid lookup table table.txt, line 4: 'x' is not a number"
        );
    }
}
