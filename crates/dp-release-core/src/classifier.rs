//! Column Classification
//!
//! Decides how each released column is treated. The decision depends only on
//! the column's name and, for columns not named in either fixed list, on
//! whether its cells are numeric. The category being released plays no part.
//!
//! Resolution order:
//! 1. structured identifiers → [`Disposition::Mask`]
//! 2. designated free-text / categorical columns → [`Disposition::Passthrough`]
//! 3. numeric columns → [`Disposition::Noise`]
//! 4. everything else → [`Disposition::Passthrough`]

use crate::dp::NoiseMechanism;
use crate::masking::MaskFormat;
use crate::table::Column;
use serde::{Deserialize, Serialize};

/// Identifier columns and the format used to mask them
pub const MASKED_COLUMNS: &[(&str, MaskFormat)] = &[
    ("Aadhaar Number", MaskFormat::NationalId),
    ("Mobile Number", MaskFormat::Phone),
    ("Email Address", MaskFormat::Email),
];

/// Columns that are never noised, whatever their cells look like
pub const PASSTHROUGH_COLUMNS: &[&str] = &[
    "Name",
    "Address",
    "Gender",
    "Religion",
    "Caste",
    "Occupation",
    "State",
    "City",
    "Program Name",
];

/// Per-column decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    Mask(MaskFormat),
    Noise,
    Passthrough,
}

/// Executable plan for one column, built fresh for every release
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColumnTransformPlan {
    Mask(MaskFormat),
    Noise {
        mechanism: NoiseMechanism,
        epsilon: f64,
        /// Explicit sensitivity; `None` means measure the column's range
        sensitivity: Option<f64>,
    },
    Passthrough,
}

/// Name- and type-based column classifier
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Mask format for an identifier column, if it is one
    pub fn mask_format(name: &str) -> Option<MaskFormat> {
        MASKED_COLUMNS
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, format)| *format)
    }

    /// True for columns that must never receive noise
    pub fn is_designated_passthrough(name: &str) -> bool {
        PASSTHROUGH_COLUMNS.contains(&name)
    }

    /// Classify a column
    pub fn classify(column: &Column) -> Disposition {
        let name = column.name();

        if let Some(format) = Self::mask_format(name) {
            return Disposition::Mask(format);
        }
        if Self::is_designated_passthrough(name) {
            return Disposition::Passthrough;
        }
        if column.is_numeric() {
            return Disposition::Noise;
        }
        Disposition::Passthrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn test_identifier_columns_are_masked() {
        let column = Column::new("Aadhaar Number", [123456789012.0]);
        assert_eq!(
            ColumnClassifier::classify(&column),
            Disposition::Mask(MaskFormat::NationalId)
        );
        let column = Column::new("Email Address", ["a@b.in"]);
        assert_eq!(
            ColumnClassifier::classify(&column),
            Disposition::Mask(MaskFormat::Email)
        );
    }

    #[test]
    fn test_designated_columns_never_noised_even_when_numeric() {
        // Coded values that happen to be numeric
        let column = Column::new("Caste", [1.0, 2.0, 3.0]);
        assert_eq!(ColumnClassifier::classify(&column), Disposition::Passthrough);
    }

    #[test]
    fn test_numeric_fallback() {
        let column = Column::new("Household Size", [Some(3.0), None, Some(5.0)]);
        assert_eq!(ColumnClassifier::classify(&column), Disposition::Noise);
    }

    #[test]
    fn test_text_fallback() {
        let column = Column::new("Verification Status", [Value::text("Verified"), Value::Number(1.0)]);
        assert_eq!(ColumnClassifier::classify(&column), Disposition::Passthrough);
    }
}
