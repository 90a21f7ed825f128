//! DP Release Core
//!
//! Category-scoped release of sensitive tabular records. For each requested
//! category the engine either masks structured identifiers (national IDs,
//! phone numbers, email addresses) or adds calibrated random noise to numeric
//! columns, and copies free-text columns unchanged.
//!
//! # Components
//!
//! - [`ColumnClassifier`] decides mask / noise / pass-through per column
//! - [`StructuredMasker`] redacts identifiers to a fixed-length form
//! - [`SensitivityEstimator`] normalises numeric columns and measures their range
//! - [`NoiseInjector`] adds Laplace (or Gaussian) noise scaled to sensitivity / ε
//! - [`CategoryEngine`] ties it together over the fixed [`Category`] taxonomy
//!
//! # Example
//!
//! ```rust
//! use dp_release_core::{transform, Column, Table, Value};
//!
//! let source = Table::new(vec![
//!     Column::new("Aadhaar Number", ["123456789012"]),
//!     Column::new("Name", ["Asha"]),
//!     Column::new("Gender", ["F"]),
//!     Column::new("Date of Birth", ["1990-01-01"]),
//!     Column::new("Address", ["12 MG Road"]),
//!     Column::new("Mobile Number", ["9876543210"]),
//!     Column::new("Email Address", ["john.doe@example.com"]),
//! ]).unwrap();
//!
//! let released = transform(&source, "Identity and Contact Information", 1.0).unwrap();
//! assert_eq!(
//!     released.column("Mobile Number").unwrap().values(),
//!     &[Value::text("98******10")]
//! );
//! ```
//!
//! # Features
//!
//! - `csv-io` (default): read and write tables as delimited text
//! - `parallel`: transform columns concurrently with rayon
//! - `cli`: the `dp-release` command-line tool

pub mod classifier;
pub mod dp;
pub mod engine;
pub mod masking;
pub mod noise;
pub mod sensitivity;
pub mod table;
pub mod taxonomy;

#[cfg(feature = "csv-io")]
pub mod csv_io;

// Re-export commonly used types for convenience
pub use classifier::{ColumnClassifier, ColumnTransformPlan, Disposition};
pub use dp::{DpValidationError, NoiseMechanism};
pub use engine::{
    transform, CategoryEngine, ColumnOutcome, ColumnPlan, ColumnReport, Release, ReleaseConfig,
    ReleasePlan, ReleaseReport, DEFAULT_EPSILON,
};
pub use masking::{MaskFormat, StructuredMasker};
pub use noise::NoiseInjector;
pub use sensitivity::{Sensitivity, SensitivityEstimator};
pub use table::{Column, Table, TableError, Value};
pub use taxonomy::Category;

use thiserror::Error;

/// Errors that abort a release
///
/// All of them are raised before any output exists; a release either
/// completes for every column or produces nothing.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The requested category is not part of the taxonomy
    #[error("unknown category '{category}'")]
    UnknownCategory { category: String },

    /// A taxonomy column is absent from the source table
    #[error("schema mismatch for category '{category}': column '{column}' is missing from the source table")]
    SchemaMismatch { category: String, column: String },

    /// Epsilon, delta or an explicit sensitivity is out of range
    #[error("invalid privacy parameters for category '{category}': {source}")]
    InvalidParameters {
        category: String,
        #[source]
        source: DpValidationError,
    },

    /// A numeric column's values cannot be calibrated
    #[error("cannot calibrate noise for column '{column}' of category '{category}': {source}")]
    InvalidColumn {
        category: String,
        column: String,
        #[source]
        source: DpValidationError,
    },

    /// The table itself is malformed
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Delimited-text reading or writing failed
    #[cfg(feature = "csv-io")]
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration file could not be parsed
    #[cfg(feature = "serde_json")]
    #[error("invalid configuration '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON emission failed
    #[cfg(feature = "serde_json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReleaseError {
    /// Stable name of the failure kind, for user-facing reports
    pub fn kind(&self) -> &'static str {
        match self {
            ReleaseError::UnknownCategory { .. } => "UnknownCategory",
            ReleaseError::SchemaMismatch { .. } => "SchemaMismatch",
            ReleaseError::InvalidParameters { .. } => "InvalidParameters",
            ReleaseError::InvalidColumn { .. } => "InvalidColumn",
            ReleaseError::Table(_) => "InvalidTable",
            #[cfg(feature = "csv-io")]
            ReleaseError::Csv(_) => "Csv",
            #[cfg(feature = "serde_json")]
            ReleaseError::Config { .. } => "Config",
            #[cfg(feature = "serde_json")]
            ReleaseError::Json(_) => "Json",
            ReleaseError::Io(_) => "Io",
        }
    }

    /// Category the failure belongs to, when there is one
    pub fn category(&self) -> Option<&str> {
        match self {
            ReleaseError::UnknownCategory { category }
            | ReleaseError::SchemaMismatch { category, .. }
            | ReleaseError::InvalidParameters { category, .. }
            | ReleaseError::InvalidColumn { category, .. } => Some(category),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reports_category_and_kind() {
        let err = ReleaseError::SchemaMismatch {
            category: "Aadhaar Usage and Linkages".to_string(),
            column: "Access Location".to_string(),
        };
        assert_eq!(err.kind(), "SchemaMismatch");
        assert_eq!(err.category(), Some("Aadhaar Usage and Linkages"));
        assert!(err.to_string().contains("Access Location"));
    }

    #[test]
    fn test_table_error_has_no_category() {
        let err = ReleaseError::from(TableError::DuplicateColumn("Name".to_string()));
        assert_eq!(err.kind(), "InvalidTable");
        assert_eq!(err.category(), None);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_malformed_config_reports_config_kind() {
        let source = serde_json::from_str::<ReleaseConfig>("{\"epsilon\": ").unwrap_err();
        let err = ReleaseError::Config {
            path: "release.json".to_string(),
            source,
        };
        assert_eq!(err.kind(), "Config");
        assert_eq!(err.category(), None);
        assert!(err.to_string().contains("release.json"));
    }
}
