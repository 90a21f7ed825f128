//! Category Release Engine
//!
//! Turns a source table and a category name into an independent, transformed
//! table holding exactly that category's columns.
//!
//! Each invocation:
//! 1. resolves the category (unknown names fail before anything else),
//! 2. validates epsilon, mechanism parameters and sensitivity overrides,
//! 3. checks every taxonomy column exists in the source (fail fast on drift),
//! 4. projects the source to the category's columns as a copy,
//! 5. classifies each column into a [`ColumnTransformPlan`],
//! 6. executes the plans (optionally in parallel, one generator per column).
//!
//! Either every column is transformed or the caller gets an error and no
//! output at all. No state survives between invocations.
//!
//! # Example
//!
//! ```ignore
//! use dp_release_core::{CategoryEngine, ReleaseConfig, Table};
//!
//! let engine = CategoryEngine::new(ReleaseConfig::default().with_epsilon(0.5));
//! let released = engine.transform(&source, "Geographical and Demographic Details")?;
//! ```

use crate::classifier::{ColumnClassifier, ColumnTransformPlan, Disposition};
use crate::dp::{column_rng, validate_sensitivity, DpValidationError, NoiseMechanism};
use crate::masking::{MaskFormat, StructuredMasker};
use crate::noise::NoiseInjector;
use crate::sensitivity::SensitivityEstimator;
use crate::table::{Column, Table, Value};
use crate::taxonomy::Category;
use crate::ReleaseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Epsilon used when the caller does not choose one
pub const DEFAULT_EPSILON: f64 = 1.0;

/// Configuration for a release
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Privacy budget for this release (lower = more noise)
    pub epsilon: f64,
    /// Distribution noise is drawn from
    pub mechanism: NoiseMechanism,
    /// Explicit per-column sensitivities, used instead of the measured range
    pub sensitivity_overrides: BTreeMap<String, f64>,
    /// Transform columns in parallel (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            epsilon: DEFAULT_EPSILON,
            mechanism: NoiseMechanism::Laplace,
            sensitivity_overrides: BTreeMap::new(),
            parallel: false,
        }
    }
}

impl ReleaseConfig {
    /// Set epsilon
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the noise mechanism
    pub fn with_mechanism(mut self, mechanism: NoiseMechanism) -> Self {
        self.mechanism = mechanism;
        self
    }

    /// Use an explicit sensitivity for one column
    pub fn with_sensitivity(mut self, column: impl Into<String>, sensitivity: f64) -> Self {
        self.sensitivity_overrides.insert(column.into(), sensitivity);
        self
    }

    /// Enable/disable parallel column processing
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// Plan for one column of a release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnPlan {
    pub column: String,
    pub disposition: Disposition,
    pub plan: ColumnTransformPlan,
}

/// Plans for every column of a category, in release order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleasePlan {
    pub category: Category,
    pub columns: Vec<ColumnPlan>,
}

/// What happened to a column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ColumnOutcome {
    Masked { format: MaskFormat },
    Noised { sensitivity: f64, scale: f64 },
    Passthrough,
}

/// Per-column entry of a [`ReleaseReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub column: String,
    pub outcome: ColumnOutcome,
    /// Null cells replaced by zero before noising
    pub missing_values: usize,
    /// Unparsable cells replaced by zero before noising
    pub malformed_values: usize,
}

/// Summary of a release. Contains no cell values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseReport {
    pub category: Category,
    pub epsilon: f64,
    pub mechanism: NoiseMechanism,
    pub row_count: usize,
    pub columns: Vec<ColumnReport>,
    pub processing_time_ms: u64,
}

impl ReleaseReport {
    /// Columns that received noise
    pub fn noised_columns(&self) -> impl Iterator<Item = &ColumnReport> {
        self.columns
            .iter()
            .filter(|c| matches!(c.outcome, ColumnOutcome::Noised { .. }))
    }

    /// Total malformed numeric cells absorbed across the release
    pub fn malformed_total(&self) -> usize {
        self.columns.iter().map(|c| c.malformed_values).sum()
    }
}

/// A transformed table plus its report
#[derive(Debug, Clone)]
pub struct Release {
    pub table: Table,
    pub report: ReleaseReport,
}

/// Orchestrates classification, masking and noise for one category
#[derive(Debug, Clone, Default)]
pub struct CategoryEngine {
    config: ReleaseConfig,
}

impl CategoryEngine {
    /// Create an engine with the given configuration
    pub fn new(config: ReleaseConfig) -> Self {
        CategoryEngine { config }
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Build the per-column plan without transforming anything
    pub fn plan(&self, source: &Table, category_name: &str) -> Result<ReleasePlan, ReleaseError> {
        let (category, _, columns) = self.prepare(source, category_name)?;
        Ok(ReleasePlan { category, columns })
    }

    /// Release a category: the transformed table only
    pub fn transform(&self, source: &Table, category_name: &str) -> Result<Table, ReleaseError> {
        Ok(self.transform_with_report(source, category_name)?.table)
    }

    /// Release a category with a per-column report
    pub fn transform_with_report(
        &self,
        source: &Table,
        category_name: &str,
    ) -> Result<Release, ReleaseError> {
        let start_time = Instant::now();
        let (category, projected, plans) = self.prepare(source, category_name)?;

        tracing::info!(
            category = %category,
            rows = projected.row_count(),
            columns = plans.len(),
            epsilon = self.config.epsilon,
            mechanism = %self.config.mechanism,
            "releasing category"
        );

        let work: Vec<(Column, ColumnPlan)> =
            projected.into_columns().into_iter().zip(plans).collect();

        let results = if self.config.parallel {
            self.execute_parallel(category, &work)
        } else {
            self.execute_sequential(category, &work)
        }?;

        let (columns, reports): (Vec<Column>, Vec<ColumnReport>) = results.into_iter().unzip();
        let table = Table::new(columns)?;

        let report = ReleaseReport {
            category,
            epsilon: self.config.epsilon,
            mechanism: self.config.mechanism,
            row_count: table.row_count(),
            columns: reports,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        tracing::info!(
            category = %category,
            noised = report.noised_columns().count(),
            malformed = report.malformed_total(),
            "category released"
        );

        Ok(Release { table, report })
    }

    /// Resolve, validate, check schema, project and classify
    fn prepare(
        &self,
        source: &Table,
        category_name: &str,
    ) -> Result<(Category, Table, Vec<ColumnPlan>), ReleaseError> {
        let category =
            Category::resolve(category_name).ok_or_else(|| ReleaseError::UnknownCategory {
                category: category_name.to_string(),
            })?;

        self.validate(category)?;

        if let Some(missing) = category
            .columns()
            .iter()
            .find(|name| !source.contains_column(name))
        {
            return Err(ReleaseError::SchemaMismatch {
                category: category.name().to_string(),
                column: missing.to_string(),
            });
        }

        let projected = source.select(category.columns())?;

        let plans = projected
            .columns()
            .iter()
            .map(|column| {
                let disposition = ColumnClassifier::classify(column);
                let plan = self.plan_for(column.name(), disposition);
                tracing::debug!(column = column.name(), ?disposition, "column planned");
                ColumnPlan {
                    column: column.name().to_string(),
                    disposition,
                    plan,
                }
            })
            .collect();

        Ok((category, projected, plans))
    }

    fn validate(&self, category: Category) -> Result<(), ReleaseError> {
        let invalid = |source| ReleaseError::InvalidParameters {
            category: category.name().to_string(),
            source,
        };

        self.config.mechanism.validate(self.config.epsilon).map_err(invalid)?;
        for sensitivity in self.config.sensitivity_overrides.values() {
            validate_sensitivity(*sensitivity).map_err(invalid)?;
        }
        Ok(())
    }

    fn plan_for(&self, column: &str, disposition: Disposition) -> ColumnTransformPlan {
        match disposition {
            Disposition::Mask(format) => ColumnTransformPlan::Mask(format),
            Disposition::Noise => ColumnTransformPlan::Noise {
                mechanism: self.config.mechanism,
                epsilon: self.config.epsilon,
                sensitivity: self.config.sensitivity_overrides.get(column).copied(),
            },
            Disposition::Passthrough => ColumnTransformPlan::Passthrough,
        }
    }

    /// Transform columns with parallel processing
    #[cfg(feature = "parallel")]
    fn execute_parallel(
        &self,
        category: Category,
        work: &[(Column, ColumnPlan)],
    ) -> Result<Vec<(Column, ColumnReport)>, ReleaseError> {
        use rayon::prelude::*;

        work.par_iter()
            .map(|(column, plan)| apply_plan(category, column, &plan.plan))
            .collect()
    }

    /// Fallback when parallel feature is disabled
    #[cfg(not(feature = "parallel"))]
    fn execute_parallel(
        &self,
        category: Category,
        work: &[(Column, ColumnPlan)],
    ) -> Result<Vec<(Column, ColumnReport)>, ReleaseError> {
        self.execute_sequential(category, work)
    }

    fn execute_sequential(
        &self,
        category: Category,
        work: &[(Column, ColumnPlan)],
    ) -> Result<Vec<(Column, ColumnReport)>, ReleaseError> {
        work.iter()
            .map(|(column, plan)| apply_plan(category, column, &plan.plan))
            .collect()
    }
}

/// Release one category with the default mechanism and the given epsilon
pub fn transform(source: &Table, category_name: &str, epsilon: f64) -> Result<Table, ReleaseError> {
    CategoryEngine::new(ReleaseConfig::default().with_epsilon(epsilon)).transform(source, category_name)
}

/// Execute one column's plan. Owns its own generator.
fn apply_plan(
    category: Category,
    column: &Column,
    plan: &ColumnTransformPlan,
) -> Result<(Column, ColumnReport), ReleaseError> {
    let invalid = |source: DpValidationError| ReleaseError::InvalidParameters {
        category: category.name().to_string(),
        source,
    };

    let (out, outcome, missing, malformed) = match plan {
        ColumnTransformPlan::Mask(format) => (
            StructuredMasker::mask_column(column, *format),
            ColumnOutcome::Masked { format: *format },
            0,
            0,
        ),
        ColumnTransformPlan::Passthrough => (column.clone(), ColumnOutcome::Passthrough, 0, 0),
        ColumnTransformPlan::Noise {
            mechanism,
            epsilon,
            sensitivity,
        } => {
            let normalized = SensitivityEstimator::normalize(column);
            if normalized.malformed > 0 {
                tracing::warn!(
                    category = %category,
                    column = column.name(),
                    malformed = normalized.malformed,
                    "non-numeric values in numeric column replaced with 0"
                );
            }

            let sensitivity = SensitivityEstimator::estimate(&normalized.values, *sensitivity)
                .map_err(|source| ReleaseError::InvalidColumn {
                    category: category.name().to_string(),
                    column: column.name().to_string(),
                    source,
                })?;
            let injector = NoiseInjector::new(*mechanism, *epsilon).map_err(invalid)?;
            let scale = injector.scale(sensitivity).map_err(invalid)?;

            let mut rng = column_rng();
            let noised = injector
                .perturb_all(&normalized.values, sensitivity, &mut rng)
                .map_err(invalid)?;

            (
                column.with_values(noised.into_iter().map(Value::Number).collect()),
                ColumnOutcome::Noised {
                    sensitivity: sensitivity.value(),
                    scale,
                },
                normalized.missing,
                normalized.malformed,
            )
        }
    };

    let report = ColumnReport {
        column: column.name().to_string(),
        outcome,
        missing_values: missing,
        malformed_values: malformed,
    };
    Ok((out, report))
}
