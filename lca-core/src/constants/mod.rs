//! Constants for the LCA core
//!
//! Column names and numeric limits used by validation and calculation.
//! Always reference these instead of repeating string literals or magic
//! numbers at call sites.
//!
//! ## Organization
//!
//! - **Columns**: activity table column names and the column groups each
//!   validation rule inspects
//! - **Tolerances**: end-of-life rate limits and comparison tolerances

/// Activity table column names and column groups.
pub mod columns;

/// Numeric tolerances and bounds.
pub mod tolerances;

pub use columns::{
    IDENTIFIER_COLUMNS, NON_NEGATIVE_COLUMNS, NUMERIC_COLUMNS, RATE_COLUMNS, REQUIRED_COLUMNS,
};

pub use tolerances::{RATE_MAX, RATE_MIN, RATE_SUM_TARGET, RATE_SUM_TOLERANCE};
