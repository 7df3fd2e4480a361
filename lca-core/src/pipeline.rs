//! Engine Facade
//!
//! Runs validation, calculation and aggregation in sequence under one
//! configuration:
//!
//! ```text
//! ActivityTable ──► RecordValidator ──► ImpactCalculator ──► Aggregator ──► LcaReport
//!                        │                    │
//!                        ▼                    ▼
//!                  ValidationReport     RowDiagnostic
//!                  (table rejected)     (row skipped)
//! ```
//!
//! A rejected table is an error; everything below that is reported inside
//! the [`LcaReport`] and summarized by its [`RunStatus`].
//!
//! ## Example
//!
//! ```rust
//! use lca_core::{ActivityTable, ImpactFactorTable, LcaEngine, RunStatus};
//!
//! let engine = LcaEngine::default();
//! let report = engine
//!     .run(&ActivityTable::with_required_columns(), &ImpactFactorTable::new())
//!     .unwrap();
//! assert_eq!(report.status, RunStatus::NoValidInput);
//! ```

use alloc::vec::Vec;

use crate::aggregation::{Aggregator, ImpactSummaries};
use crate::calculator::{
    enriched_table, CalculatorConfig, ImpactCalculator, ImpactResult, RowDiagnostic,
};
use crate::errors::EngineError;
use crate::lookup::ImpactFactorTable;
use crate::record::ActivityTable;
use crate::validators::{RecordValidator, RowRejection, ValidatorConfig};

/// Outcome class of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunStatus {
    /// Every row produced a result from real factors
    Complete,
    /// Some rows were rejected, skipped, or fell back to zero impact
    Partial,
    /// No row produced a result
    NoValidInput,
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Validation rules and policy
    pub validator: ValidatorConfig,
    /// Fallback policy and driver table
    pub calculator: CalculatorConfig,
}

impl EngineConfig {
    /// Parse from JSON, missing fields take their defaults
    #[cfg(all(feature = "serde", feature = "serde_json"))]
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        use alloc::string::ToString;
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq)]
pub struct LcaReport {
    /// Outcome class
    pub status: RunStatus,
    /// Rows in the input table
    pub source_rows: usize,
    /// Per-record impacts in source row order
    pub results: Vec<ImpactResult>,
    /// Rows skipped for missing factors
    pub diagnostics: Vec<RowDiagnostic>,
    /// Rows dropped by row-level validation
    pub rejected: Vec<RowRejection>,
    /// Per-product summary views
    pub summaries: ImpactSummaries,
}

impl LcaReport {
    /// True when every row produced a result from real factors
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Complete
    }

    /// Results as one flat table, record columns followed by impact columns
    pub fn enriched_table(&self) -> ActivityTable {
        enriched_table(&self.results)
    }
}

/// Validation, calculation and aggregation under one configuration
#[derive(Debug)]
pub struct LcaEngine {
    validator: RecordValidator,
    calculator: ImpactCalculator,
    aggregator: Aggregator,
}

impl Default for LcaEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LcaEngine {
    /// Create engine
    pub fn new(config: EngineConfig) -> Self {
        Self {
            validator: RecordValidator::new(config.validator),
            calculator: ImpactCalculator::new(config.calculator),
            aggregator: Aggregator::new(),
        }
    }

    /// Engine with a custom validator, e.g. one carrying extra checks
    pub fn with_validator(mut self, validator: RecordValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Active validator
    pub fn validator(&self) -> &RecordValidator {
        &self.validator
    }

    /// Active calculator
    pub fn calculator(&self) -> &ImpactCalculator {
        &self.calculator
    }

    /// Validate, calculate and aggregate one table
    ///
    /// Fails only when validation rejects the table.
    pub fn run(
        &self,
        table: &ActivityTable,
        factors: &ImpactFactorTable,
    ) -> Result<LcaReport, EngineError> {
        let batch = self.validator.accept(table).map_err(|report| {
            let issues = report.into_issues();
            EngineError::TableRejected {
                count: issues.len(),
                issues,
            }
        })?;

        let outcome = self.calculator.calculate(&batch, factors);
        let summaries = self.aggregator.aggregate(&outcome.results);

        let status = if outcome.results.is_empty() {
            RunStatus::NoValidInput
        } else if outcome.is_complete() && batch.rejected().is_empty() {
            RunStatus::Complete
        } else {
            RunStatus::Partial
        };

        match status {
            RunStatus::Complete => log_info!(
                "LCA run complete: {} result(s), {} product(s)",
                outcome.results.len(),
                summaries.len()
            ),
            RunStatus::Partial => log_warn!(
                "LCA run partial: {} result(s), {} skipped, {} rejected",
                outcome.results.len(),
                outcome.diagnostics.len(),
                batch.rejected().len()
            ),
            RunStatus::NoValidInput => {
                log_warn!("LCA run produced no results from {} row(s)", table.len())
            }
        }

        Ok(LcaReport {
            status,
            source_rows: batch.source_rows(),
            results: outcome.results,
            diagnostics: outcome.diagnostics,
            rejected: batch.rejected().to_vec(),
            summaries,
        })
    }
}
