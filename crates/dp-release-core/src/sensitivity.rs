//! Sensitivity Estimation
//!
//! A numeric column is first normalised: every cell becomes an `f64`, with
//! nulls, unparsable text and non-finite numbers replaced by `0.0` so that row
//! alignment is preserved. The sensitivity is then `max - min` over the
//! normalised values, unless the caller supplies one explicitly.
//!
//! A sensitivity of zero (constant or empty column) is valid and means the
//! column is released without noise.

use crate::dp::{validate_sensitivity, DpValidationError};
use crate::table::{Column, Value};
use serde::{Deserialize, Serialize};

/// Replacement for cells that cannot be read as numbers
pub const NUMERIC_DEFAULT: f64 = 0.0;

/// A column after numeric normalisation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumn {
    pub values: Vec<f64>,
    /// Null cells replaced by the default
    pub missing: usize,
    /// Non-null cells that were not finite numbers, replaced by the default
    pub malformed: usize,
}

/// Non-negative bound used to calibrate noise for one column
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Sensitivity(f64);

impl Sensitivity {
    /// Validated sensitivity
    pub fn new(value: f64) -> Result<Self, DpValidationError> {
        validate_sensitivity(value)?;
        Ok(Sensitivity(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Zero sensitivity: no perturbation is applied
    pub fn is_degenerate(&self) -> bool {
        self.0 == 0.0
    }
}

/// Normalises numeric columns and computes their sensitivity
pub struct SensitivityEstimator;

impl SensitivityEstimator {
    /// Coerce every cell to a finite f64
    pub fn normalize(column: &Column) -> NormalizedColumn {
        let mut missing = 0;
        let mut malformed = 0;

        let values = column
            .values()
            .iter()
            .map(|cell| match cell {
                Value::Null => {
                    missing += 1;
                    NUMERIC_DEFAULT
                }
                Value::Number(n) if n.is_finite() => *n,
                Value::Number(_) => {
                    malformed += 1;
                    NUMERIC_DEFAULT
                }
                Value::Text(s) => match s.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => n,
                    _ => {
                        malformed += 1;
                        NUMERIC_DEFAULT
                    }
                },
            })
            .collect();

        NormalizedColumn {
            values,
            missing,
            malformed,
        }
    }

    /// `max - min`, or zero for an empty slice
    pub fn range(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        max - min
    }

    /// Sensitivity for normalised values; an explicit value wins verbatim
    pub fn estimate(values: &[f64], explicit: Option<f64>) -> Result<Sensitivity, DpValidationError> {
        match explicit {
            Some(value) => Sensitivity::new(value),
            None => {
                let range = Self::range(values);
                // Finite cells can still span more than f64::MAX
                if !range.is_finite() {
                    return Err(DpValidationError::InvalidSensitivity {
                        value: range,
                        reason: format!(
                            "measured range overflows f64 (values span more than {:e}); supply an explicit sensitivity",
                            f64::MAX
                        ),
                    });
                }
                Sensitivity::new(range)
            }
        }
    }
}
