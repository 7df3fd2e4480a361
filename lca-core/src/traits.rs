//! Core traits for table checks
//!
//! Each validation rule is a [`TableCheck`]. Rules are independent: a rule
//! inspects only the columns it owns and skips the ones that are missing,
//! leaving missing columns to the schema rule.

use alloc::vec::Vec;

use crate::errors::ValidationError;
use crate::record::ActivityTable;

/// One validation rule over an activity table
pub trait TableCheck {
    /// Short rule name used in logs
    fn name(&self) -> &'static str;

    /// Inspect the table and append every issue found
    fn check(&self, table: &ActivityTable, issues: &mut Vec<ValidationError>);
}

/// Trait for values that can be validated
pub trait Validatable {
    /// Check if the value is usable (not NaN, not infinite)
    fn is_valid(&self) -> bool;
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}
