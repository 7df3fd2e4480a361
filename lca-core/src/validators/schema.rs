//! Required-column completeness

use alloc::vec::Vec;

use crate::constants::columns::REQUIRED_COLUMNS;
use crate::errors::ValidationError;
use crate::record::ActivityTable;
use crate::traits::TableCheck;

/// Every activity column must be present
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredColumns;

impl TableCheck for RequiredColumns {
    fn name(&self) -> &'static str {
        "required_columns"
    }

    fn check(&self, table: &ActivityTable, issues: &mut Vec<ValidationError>) {
        for column in REQUIRED_COLUMNS {
            if !table.has_column(column) {
                issues.push(ValidationError::MissingColumn { column });
            }
        }
    }
}
