//! Parameter declarations and validation.

use crate::{OperationError, OperationResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key of the primary raster input.
pub const INPUT: &str = "INPUT";
/// Key of the secondary input (the lookup table of lookuplinear).
pub const INPUT1: &str = "INPUT1";
/// Key of the raster destination.
pub const OUTPUT: &str = "OUTPUT";

/// What a parameter's value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    /// An existing raster file.
    RasterLayer,
    /// An existing plain-text lookup table.
    LookupTableFile,
    /// A raster file to be written.
    RasterDestination,
}

impl ParameterKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKind::RasterLayer => "raster-layer",
            ParameterKind::LookupTableFile => "lookup-table-file",
            ParameterKind::RasterDestination => "raster-destination",
        }
    }

    /// True for kinds whose file must exist before execution.
    pub fn is_input(&self) -> bool {
        !matches!(self, ParameterKind::RasterDestination)
    }
}

/// Declaration of one operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ParameterKind,
}

impl ParameterSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: ParameterKind) -> Self {
        Self { key, label, kind }
    }
}

/// Untyped parameter values supplied by the host, keyed by parameter key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap(BTreeMap<String, String>);

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse `KEY=VALUE` assignments, as given on a command line.
    ///
    /// The value may itself contain `=`. Repeated keys are rejected.
    pub fn from_assignments<I, S>(assignments: I) -> OperationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, value) = assignment.split_once('=').ok_or_else(|| OperationError::InvalidParameter {
                key: assignment.to_string(),
                reason: "expected KEY=VALUE".to_string(),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(OperationError::InvalidParameter {
                    key: assignment.to_string(),
                    reason: "empty parameter key".to_string(),
                });
            }
            if map.insert(key, value).is_some() {
                return Err(OperationError::InvalidParameter {
                    key: key.to_string(),
                    reason: "given more than once".to_string(),
                });
            }
        }
        Ok(map)
    }

    /// Check the values against an operation's declarations.
    ///
    /// Unknown keys, missing keys, empty values and input files that do not
    /// exist are rejected. Nothing is opened or read.
    pub fn validate(&self, operation: &str, specs: &[ParameterSpec]) -> OperationResult<ValidatedParameters> {
        if let Some(key) = self.0.keys().find(|k| !specs.iter().any(|s| s.key == k.as_str())) {
            return Err(OperationError::UnexpectedParameter {
                operation: operation.to_string(),
                key: key.clone(),
            });
        }

        let mut paths = BTreeMap::new();
        for spec in specs {
            let value = self.get(spec.key).ok_or_else(|| OperationError::MissingParameter {
                operation: operation.to_string(),
                key: spec.key.to_string(),
            })?;
            let value = value.trim();
            if value.is_empty() {
                return Err(OperationError::InvalidParameter {
                    key: spec.key.to_string(),
                    reason: format!("empty {} path", spec.kind.name()),
                });
            }

            let path = PathBuf::from(value);
            if spec.kind.is_input() && !path.is_file() {
                return Err(OperationError::InvalidParameter {
                    key: spec.key.to_string(),
                    reason: format!("file not found: {}", path.display()),
                });
            }
            if !spec.kind.is_input() && path.is_dir() {
                return Err(OperationError::InvalidParameter {
                    key: spec.key.to_string(),
                    reason: format!("{} is a directory", path.display()),
                });
            }
            paths.insert(spec.key, path);
        }

        Ok(ValidatedParameters {
            operation: operation.to_string(),
            paths,
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parameter values that passed [`ParameterMap::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedParameters {
    operation: String,
    paths: BTreeMap<&'static str, PathBuf>,
}

impl ValidatedParameters {
    /// Path given for `key`.
    pub fn path(&self, key: &str) -> OperationResult<&Path> {
        self.paths
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| OperationError::MissingParameter {
                operation: self.operation.clone(),
                key: key.to_string(),
            })
    }
}
