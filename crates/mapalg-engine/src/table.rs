//! Lookup tables in plain-text column format.
//!
//! Each non-blank line holds either `<key> <value>` or
//! `<keyLow> <keyHigh> <value>`. Lines starting with `#` are comments. Rows
//! must be sorted by key and must not overlap.

use crate::{EngineError, EngineResult};
use std::path::Path;

/// One table row covering the closed key range `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub low: f64,
    pub high: f64,
    pub value: f64,
}

/// A parsed lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    rows: Vec<TableRow>,
}

impl LookupTable {
    /// Read and parse a table file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::read(path, e))?;
        Self::parse(path, &text)
    }

    /// Parse table text; `path` is only used for error reporting.
    pub fn parse(path: &Path, text: &str) -> EngineResult<Self> {
        let invalid = |line: usize, reason: String| EngineError::InvalidTable {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut rows: Vec<TableRow> = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = Vec::with_capacity(3);
            for token in line.split_whitespace() {
                let value: f64 = token
                    .parse()
                    .map_err(|_| invalid(number, format!("'{}' is not a number", token)))?;
                if !value.is_finite() {
                    return Err(invalid(number, format!("'{}' is not finite", token)));
                }
                columns.push(value);
            }

            let row = match columns[..] {
                [key, value] => TableRow { low: key, high: key, value },
                [low, high, value] => TableRow { low, high, value },
                _ => {
                    return Err(invalid(
                        number,
                        format!("expected 2 or 3 columns, found {}", columns.len()),
                    ))
                }
            };
            if row.low > row.high {
                return Err(invalid(
                    number,
                    format!("key range [{}, {}] is reversed", row.low, row.high),
                ));
            }
            if let Some(previous) = rows.last() {
                if row.low <= previous.high {
                    return Err(invalid(
                        number,
                        format!(
                            "key {} is not above the previous row's key {}; keys must ascend without overlap",
                            row.low, previous.high
                        ),
                    ));
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(invalid(0, "table has no rows".to_string()));
        }
        Ok(Self { rows })
    }

    /// Rows in ascending key order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Look up `x` with linear interpolation between bracketing rows.
    ///
    /// Keys inside a row's range take that row's value. Keys between two
    /// rows are interpolated between the upper key of the lower row and the
    /// lower key of the upper row. NaN and keys outside the table give `None`.
    pub fn interpolate(&self, x: f64) -> Option<f64> {
        if x.is_nan() {
            return None;
        }
        let index = self.rows.partition_point(|row| row.high < x);
        let upper = self.rows.get(index)?;
        if x >= upper.low {
            return Some(upper.value);
        }
        let lower = self.rows.get(index.checked_sub(1)?)?;
        let t = (x - lower.high) / (upper.low - lower.high);
        Some(lower.value + t * (upper.value - lower.value))
    }
}
