//! Activity Table Validation
//!
//! ## Overview
//!
//! Raw activity tables come from spreadsheets and exports, so nothing about
//! them is trusted until checked. The [`RecordValidator`] runs a list of
//! independent [`TableCheck`] rules and collects every issue they find into a
//! [`ValidationReport`]. Only a table (or, under the row-level policy, the
//! rows) that passes becomes a [`ValidatedBatch`], the sole input the
//! calculator accepts.
//!
//! ## Rules
//!
//! | rule | issue | kind |
//! |------|-------|------|
//! | [`RequiredColumns`] | `MissingColumn` | schema |
//! | [`NumericCells`] | `NonNumeric` | type |
//! | [`RateFractions`] | `RateSumOutOfTolerance`, `RateOutOfBounds` | invariant |
//! | [`NonNegativeQuantities`] | `NegativeValue` | invariant |
//! | [`Identifiers`] | `EmptyField` | invariant |
//!
//! The first three always run. The last two, and the per-rate bounds inside
//! [`RateFractions`], are hardening switched by [`ValidatorConfig`].
//!
//! ## Policies
//!
//! ### Table (default)
//! Any issue rejects the table. Nothing is calculated.
//!
//! ### Row level
//! A missing column still rejects the table. Rows with type or invariant
//! issues are dropped and listed as [`RowRejection`]s; the remaining rows
//! proceed.
//!
//! ## Usage Example
//!
//! ```rust
//! use lca_core::{ActivityTable, RecordValidator};
//!
//! let mut table = ActivityTable::with_required_columns();
//! let validator = RecordValidator::default();
//!
//! // An empty table with every column is structurally valid
//! assert!(validator.validate(&table));
//!
//! table.drop_column("product_id")?;
//! let report = validator.check(&table);
//! assert!(!report.is_valid());
//! assert_eq!(report.missing_columns(), ["product_id"]);
//! # Ok::<(), lca_core::TableError>(())
//! ```

mod identifiers;
mod numeric;
mod rates;
mod schema;
mod utils;

pub use identifiers::Identifiers;
pub use numeric::{NonNegativeQuantities, NumericCells};
pub use rates::RateFractions;
pub use schema::RequiredColumns;
pub use utils::{in_range, within_tolerance};

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::columns::PRODUCT_ID;
use crate::constants::tolerances::RATE_SUM_TOLERANCE;
use crate::errors::{ErrorKind, ValidationError};
use crate::record::{ActivityRecord, ActivityTable, ColumnMap};
use crate::traits::TableCheck;

/// How validation issues translate into accepted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValidationPolicy {
    /// Any issue rejects the whole table
    #[default]
    Table,
    /// Schema issues reject the table; other issues reject only their row
    RowLevel,
}

/// Validator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidatorConfig {
    /// Allowed deviation of the rate sum from 1
    pub rate_tolerance: f64,
    /// Require each rate to lie in [0, 1]
    pub enforce_rate_bounds: bool,
    /// Require mass, energy, distance and waste to be non-negative
    pub enforce_non_negative: bool,
    /// Require product, stage and material to be non-blank
    pub enforce_identifiers: bool,
    /// Table or row granularity
    pub policy: ValidationPolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl ValidatorConfig {
    /// All rules, table-level policy
    pub fn strict() -> Self {
        Self {
            rate_tolerance: RATE_SUM_TOLERANCE,
            enforce_rate_bounds: true,
            enforce_non_negative: true,
            enforce_identifiers: true,
            policy: ValidationPolicy::Table,
        }
    }

    /// Only columns, numeric cells and the rate sum
    ///
    /// Matches tables that were checked by the legacy tooling, which did
    /// not look at signs, per-rate bounds or blank identifiers.
    pub fn source_compatible() -> Self {
        Self {
            rate_tolerance: RATE_SUM_TOLERANCE,
            enforce_rate_bounds: false,
            enforce_non_negative: false,
            enforce_identifiers: false,
            policy: ValidationPolicy::Table,
        }
    }

    /// Same rules, different policy
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Every issue found in one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<ValidationError>,
}

impl ValidationReport {
    /// Create new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no issue was found
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// All issues in rule order
    pub fn issues(&self) -> &[ValidationError] {
        &self.issues
    }

    /// Take the issues out of the report
    pub fn into_issues(self) -> Vec<ValidationError> {
        self.issues
    }

    /// Number of issues
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True when the report holds no issue
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// First issue found
    pub fn first(&self) -> Option<&ValidationError> {
        self.issues.first()
    }

    /// Add an issue
    pub fn push(&mut self, issue: ValidationError) {
        self.issues.push(issue);
    }

    /// True when a required column is missing
    pub fn has_schema_errors(&self) -> bool {
        self.issues.iter().any(ValidationError::is_table_fatal)
    }

    /// Names of missing required columns
    pub fn missing_columns(&self) -> Vec<&'static str> {
        self.issues
            .iter()
            .filter_map(|issue| match issue {
                ValidationError::MissingColumn { column } => Some(*column),
                _ => None,
            })
            .collect()
    }

    /// Number of issues of one kind
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.issues.iter().filter(|i| i.kind() == kind).count()
    }

    /// Issues that refer to one row
    pub fn issues_for_row(&self, row: usize) -> impl Iterator<Item = &ValidationError> {
        self.issues.iter().filter(move |i| i.row() == Some(row))
    }

    /// Rows with at least one issue
    pub fn rows_with_issues(&self) -> BTreeSet<usize> {
        self.issues.iter().filter_map(ValidationError::row).collect()
    }
}

/// A row dropped under the row-level policy
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    /// Zero-based row index in the source table
    pub row: usize,
    /// Product identifier as found in the row (may be blank)
    pub product_id: String,
    /// Why the row was dropped
    pub issues: Vec<ValidationError>,
}

/// Records that passed validation, tagged with their source row
///
/// Only [`RecordValidator::accept`] builds a batch, so holding one proves the
/// records were checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedBatch {
    entries: Vec<(usize, ActivityRecord)>,
    rejected: Vec<RowRejection>,
    source_rows: usize,
}

impl ValidatedBatch {
    /// Accepted records with their source row index, in table order
    pub fn entries(&self) -> &[(usize, ActivityRecord)] {
        &self.entries
    }

    /// Accepted records in table order
    pub fn records(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    /// Rows dropped under the row-level policy
    pub fn rejected(&self) -> &[RowRejection] {
        &self.rejected
    }

    /// Number of accepted records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no record was accepted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows in the source table
    pub fn source_rows(&self) -> usize {
        self.source_rows
    }

    /// Number of accepted records per normalized life-cycle stage
    pub fn stage_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records() {
            *counts.entry(record.normalized_stage()).or_insert(0) += 1;
        }
        counts
    }
}

/// Checks activity tables against the record schema
pub struct RecordValidator {
    config: ValidatorConfig,
    checks: Vec<Box<dyn TableCheck + Send + Sync>>,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl core::fmt::Debug for RecordValidator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordValidator")
            .field("config", &self.config)
            .field("checks", &self.checks.iter().map(|c| c.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl RecordValidator {
    /// Create a validator with the rules enabled by `config`
    pub fn new(config: ValidatorConfig) -> Self {
        let mut checks: Vec<Box<dyn TableCheck + Send + Sync>> = Vec::new();
        checks.push(Box::new(RequiredColumns));
        checks.push(Box::new(NumericCells));
        checks.push(Box::new(RateFractions::new(
            config.rate_tolerance,
            config.enforce_rate_bounds,
        )));
        if config.enforce_non_negative {
            checks.push(Box::new(NonNegativeQuantities));
        }
        if config.enforce_identifiers {
            checks.push(Box::new(Identifiers));
        }
        Self { config, checks }
    }

    /// Add a custom rule, run after the built-in ones
    pub fn with_check<C>(mut self, check: C) -> Self
    where
        C: TableCheck + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Names of the active rules, in run order
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every rule and collect all issues
    pub fn check(&self, table: &ActivityTable) -> ValidationReport {
        let mut issues = Vec::new();
        for check in &self.checks {
            let before = issues.len();
            check.check(table, &mut issues);
            if issues.len() > before {
                log_debug!("{}: {} issue(s)", check.name(), issues.len() - before);
            }
        }
        ValidationReport { issues }
    }

    /// True when the table passes every rule
    ///
    /// Table-level answer regardless of the configured policy.
    pub fn validate(&self, table: &ActivityTable) -> bool {
        self.check(table).is_valid()
    }

    /// Apply the configured policy and convert accepted rows into records
    ///
    /// Returns the full report when the table is rejected.
    pub fn accept(&self, table: &ActivityTable) -> Result<ValidatedBatch, ValidationReport> {
        let mut report = self.check(table);

        let reject_table = match self.config.policy {
            ValidationPolicy::Table => !report.is_valid(),
            ValidationPolicy::RowLevel => report.has_schema_errors(),
        };
        if reject_table {
            log_warn!(
                "Activity table rejected: {} issue(s), first: {:?}",
                report.len(),
                report.first()
            );
            return Err(report);
        }

        // All required columns exist at this point
        let columns = match ColumnMap::resolve(table) {
            Ok(columns) => columns,
            Err(missing) => {
                for issue in missing {
                    report.push(issue);
                }
                return Err(report);
            }
        };

        let flagged = report.rows_with_issues();
        let mut entries = Vec::with_capacity(table.len());
        let mut rejected = Vec::new();

        for (row, cells) in table.rows().enumerate() {
            if flagged.contains(&row) {
                rejected.push(RowRejection {
                    row,
                    product_id: product_id_of(table, row),
                    issues: report.issues_for_row(row).copied().collect(),
                });
                continue;
            }
            match columns.record(cells, row) {
                Ok(record) => entries.push((row, record)),
                Err(issue) => {
                    report.push(issue);
                    rejected.push(RowRejection {
                        row,
                        product_id: product_id_of(table, row),
                        issues: alloc::vec![issue],
                    });
                }
            }
        }

        if self.config.policy == ValidationPolicy::Table && !rejected.is_empty() {
            return Err(report);
        }

        if !rejected.is_empty() {
            log_warn!(
                "{} of {} row(s) rejected by validation",
                rejected.len(),
                table.len()
            );
        }
        log_info!("Validated {} activity record(s)", entries.len());

        Ok(ValidatedBatch {
            entries,
            rejected,
            source_rows: table.len(),
        })
    }
}

fn product_id_of(table: &ActivityTable, row: usize) -> String {
    table
        .cell(row, PRODUCT_ID)
        .map(|c| c.to_text())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Cell;

    fn record(product: &str, stage: &str, rates: [f64; 3]) -> ActivityRecord {
        ActivityRecord {
            product_id: product.into(),
            product_name: "Widget".into(),
            life_cycle_stage: stage.into(),
            material_type: "steel".into(),
            quantity_kg: 100.0,
            energy_consumption_kwh: 50.0,
            transport_distance_km: 10.0,
            transport_mode: "truck".into(),
            waste_generated_kg: 5.0,
            recycling_rate: rates[0],
            landfill_rate: rates[1],
            incineration_rate: rates[2],
            carbon_footprint_kg_co2e: 20.0,
            water_usage_liters: 100.0,
        }
    }

    fn sample() -> ActivityTable {
        ActivityTable::from_records(&[
            record("P001", "manufacturing", [0.8, 0.1, 0.1]),
            record("P002", "manufacturing", [0.7, 0.2, 0.1]),
            record("P003", "manufacturing", [0.6, 0.3, 0.1]),
        ])
    }

    #[test]
    fn valid_table_passes() {
        let validator = RecordValidator::default();
        assert!(validator.validate(&sample()));
        let batch = validator.accept(&sample()).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.source_rows(), 3);
        assert!(batch.rejected().is_empty());
    }

    #[test]
    fn missing_product_id_is_schema_error() {
        let mut table = sample();
        table.drop_column("product_id").unwrap();

        let report = RecordValidator::default().check(&table);
        assert!(!report.is_valid());
        assert!(report.has_schema_errors());
        assert_eq!(
            report.first(),
            Some(&ValidationError::MissingColumn { column: "product_id" })
        );
    }

    #[test]
    fn non_numeric_cell_rejects_table() {
        let mut table = sample();
        table.set_cell(0, "quantity_kg", Cell::from("invalid")).unwrap();

        let validator = RecordValidator::default();
        assert!(!validator.validate(&table));
        let report = validator.accept(&table).unwrap_err();
        assert_eq!(report.count_of(ErrorKind::Type), 1);
    }

    #[test]
    fn bad_rates_reject_table() {
        let mut table = sample();
        table.set_cell(0, "recycling_rate", Cell::from(0.6)).unwrap();
        table.set_cell(0, "landfill_rate", Cell::from(0.6)).unwrap();
        table.set_cell(0, "incineration_rate", Cell::from(0.6)).unwrap();

        assert!(!RecordValidator::default().validate(&table));
        assert!(!RecordValidator::new(ValidatorConfig::source_compatible()).validate(&table));
    }

    #[test]
    fn row_level_policy_keeps_good_rows() {
        let mut table = sample();
        table.set_cell(1, "quantity_kg", Cell::from("invalid")).unwrap();

        let config = ValidatorConfig::strict().with_policy(ValidationPolicy::RowLevel);
        let batch = RecordValidator::new(config).accept(&table).unwrap();

        assert_eq!(batch.len(), 2);
        let rows: Vec<usize> = batch.entries().iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, [0, 2]);
        assert_eq!(batch.rejected().len(), 1);
        assert_eq!(batch.rejected()[0].row, 1);
        assert_eq!(batch.rejected()[0].product_id, "P002");
        assert_eq!(
            batch.rejected()[0].issues,
            [ValidationError::NonNumeric { row: 1, column: "quantity_kg" }]
        );
    }

    #[test]
    fn row_level_policy_still_rejects_missing_columns() {
        let mut table = sample();
        table.drop_column("water_usage_liters").unwrap();

        let config = ValidatorConfig::strict().with_policy(ValidationPolicy::RowLevel);
        let report = RecordValidator::new(config).accept(&table).unwrap_err();
        assert_eq!(report.missing_columns(), ["water_usage_liters"]);
    }

    #[test]
    fn hardening_rules_are_configurable() {
        let mut table = sample();
        table.set_cell(2, "transport_distance_km", Cell::from(-10.0)).unwrap();

        assert!(!RecordValidator::default().validate(&table));
        assert!(RecordValidator::new(ValidatorConfig::source_compatible()).validate(&table));
    }

    #[test]
    fn empty_table_is_valid_but_empty() {
        let table = ActivityTable::with_required_columns();
        let batch = RecordValidator::default().accept(&table).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn custom_checks_run_last() {
        struct NoTrucks;
        impl TableCheck for NoTrucks {
            fn name(&self) -> &'static str {
                "no_trucks"
            }
            fn check(&self, table: &ActivityTable, issues: &mut Vec<ValidationError>) {
                for row in 0..table.len() {
                    if table.cell(row, "transport_mode") == Some(&Cell::from("truck")) {
                        issues.push(ValidationError::EmptyField { row, column: "transport_mode" });
                    }
                }
            }
        }

        let validator = RecordValidator::default().with_check(NoTrucks);
        assert_eq!(validator.check_names().last(), Some(&"no_trucks"));
        assert_eq!(validator.check(&sample()).len(), 3);
    }

    #[test]
    fn stage_counts_use_normalized_names() {
        let table = ActivityTable::from_records(&[
            record("P001", "Manufacturing", [1.0, 0.0, 0.0]),
            record("P001", "manufacturing", [1.0, 0.0, 0.0]),
            record("P001", "End of Life", [0.5, 0.5, 0.0]),
        ]);
        let batch = RecordValidator::default().accept(&table).unwrap();
        let counts = batch.stage_counts();
        assert_eq!(counts.get("manufacturing"), Some(&2));
        assert_eq!(counts.get("end-of-life"), Some(&1));
    }
}
