//! Error Types for Validation, Lookup and Calculation Failures
//!
//! ## Categories
//!
//! ### Table-level (returned by the validator)
//! - `MissingColumn`: a required column is absent. Schema problem, always
//!   fatal for the whole table.
//! - `NonNumeric`: a numeric cell does not coerce to a finite number.
//! - `RateSumOutOfTolerance`, `RateOutOfBounds`, `NegativeValue`,
//!   `EmptyField`: semantic invariants of a single row.
//!
//! Under the default policy any of these rejects the table. Under the
//! row-level policy only `MissingColumn` does; the others drop their row.
//!
//! ### Row-level (returned alongside calculation results)
//! - [`LookupError`]: the (material, stage) pair has no impact factors. The
//!   row is skipped and reported, the run continues.
//!
//! ### Construction
//! - [`FactorTableError`]: malformed factor source.
//! - [`TableError`]: malformed in-memory activity table.
//!
//! ## Size
//!
//! [`ValidationError`] stays `Copy`: column names are `&'static str` taken
//! from [`crate::constants::columns`], so a report with thousands of issues
//! holds no per-issue heap allocation.

use alloc::string::String;
use alloc::vec::Vec;

use thiserror_no_std::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for factor lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// Coarse classification of validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Table structure is wrong (missing column)
    Schema,
    /// A cell has the wrong type
    Type,
    /// A row breaks a semantic invariant
    Invariant,
}

/// Activity table validation errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// Required column not present in the table
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the absent column
        column: &'static str,
    },

    /// Cell could not be read as a finite number
    #[error("Row {row}: column '{column}' is not numeric")]
    NonNumeric {
        /// Zero-based row index
        row: usize,
        /// Offending column
        column: &'static str,
    },

    /// Recycling + landfill + incineration rates do not add up to one
    #[error("Row {row}: end-of-life rates sum to {sum}, expected 1 ± {tolerance}")]
    RateSumOutOfTolerance {
        /// Zero-based row index
        row: usize,
        /// Actual sum of the three rates
        sum: f64,
        /// Tolerance that was applied
        tolerance: f64,
    },

    /// A single rate is outside [0, 1]
    #[error("Row {row}: column '{column}' value {value} outside [0, 1]")]
    RateOutOfBounds {
        /// Zero-based row index
        row: usize,
        /// Offending rate column
        column: &'static str,
        /// Actual value
        value: f64,
    },

    /// A physical quantity is negative
    #[error("Row {row}: column '{column}' value {value} is negative")]
    NegativeValue {
        /// Zero-based row index
        row: usize,
        /// Offending column
        column: &'static str,
        /// Actual value
        value: f64,
    },

    /// An identifier cell is blank
    #[error("Row {row}: column '{column}' is empty")]
    EmptyField {
        /// Zero-based row index
        row: usize,
        /// Offending column
        column: &'static str,
    },
}

impl ValidationError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumn { .. } => ErrorKind::Schema,
            Self::NonNumeric { .. } => ErrorKind::Type,
            Self::RateSumOutOfTolerance { .. }
            | Self::RateOutOfBounds { .. }
            | Self::NegativeValue { .. }
            | Self::EmptyField { .. } => ErrorKind::Invariant,
        }
    }

    /// Row the error refers to, `None` for table-wide errors
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::MissingColumn { .. } => None,
            Self::NonNumeric { row, .. }
            | Self::RateSumOutOfTolerance { row, .. }
            | Self::RateOutOfBounds { row, .. }
            | Self::NegativeValue { row, .. }
            | Self::EmptyField { row, .. } => Some(*row),
        }
    }

    /// Column the error refers to, `None` when several columns are involved
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::MissingColumn { column }
            | Self::NonNumeric { column, .. }
            | Self::RateOutOfBounds { column, .. }
            | Self::NegativeValue { column, .. }
            | Self::EmptyField { column, .. } => Some(*column),
            Self::RateSumOutOfTolerance { .. } => None,
        }
    }

    /// True when the error invalidates the table regardless of policy
    pub fn is_table_fatal(&self) -> bool {
        self.kind() == ErrorKind::Schema
    }
}

/// Impact factor lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LookupError {
    /// No factors at all for this material
    #[error("No impact factors for material '{material}'")]
    MissingMaterial {
        /// Normalized material name
        material: String,
    },

    /// Material known, but not for this stage
    #[error("No impact factors for material '{material}' at stage '{stage}'")]
    MissingStage {
        /// Normalized material name
        material: String,
        /// Normalized stage name
        stage: String,
    },
}

/// Impact factor table construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactorTableError {
    /// Factor is negative, NaN or infinite
    #[error("Invalid {metric} factor {value} for '{material}' / '{stage}'")]
    InvalidFactor {
        /// Material key as given
        material: String,
        /// Stage key as given
        stage: String,
        /// Metric name
        metric: &'static str,
        /// Offending value
        value: f64,
    },

    /// Two source keys normalize to the same (material, stage) pair
    #[error("Duplicate impact factors for '{material}' / '{stage}'")]
    DuplicateEntry {
        /// Normalized material name
        material: String,
        /// Normalized stage name
        stage: String,
    },

    /// Material or stage key is blank
    #[error("Empty material or stage key")]
    EmptyKey,

    /// Source text could not be parsed
    #[error("Failed to parse impact factors: {0}")]
    Parse(String),
}

/// Activity table construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Row has a different number of cells than the table has columns
    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidthMismatch {
        /// Index the row would have had
        row: usize,
        /// Number of columns
        expected: usize,
        /// Number of cells supplied
        found: usize,
    },

    /// Column name appears twice
    #[error("Duplicate column '{column}'")]
    DuplicateColumn {
        /// Repeated column name
        column: String,
    },

    /// Column name not present in the table
    #[error("Unknown column '{column}'")]
    UnknownColumn {
        /// Requested column name
        column: String,
    },

    /// Row index past the end of the table
    #[error("Row {row} out of bounds (table has {len} rows)")]
    RowOutOfBounds {
        /// Requested row
        row: usize,
        /// Number of rows
        len: usize,
    },
}

/// Errors surfaced by the engine facade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Validation rejected the activity table, calculation did not run
    #[error("Activity table rejected with {count} issue(s)")]
    TableRejected {
        /// Number of issues found
        count: usize,
        /// Every issue found, in rule order
        issues: Vec<ValidationError>,
    },

    /// Engine configuration could not be parsed
    #[error("Invalid engine configuration: {0}")]
    Config(String),
}
