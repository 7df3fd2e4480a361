//! Identifier completeness: product, stage and material cannot be blank

use alloc::vec::Vec;

use crate::constants::columns::IDENTIFIER_COLUMNS;
use crate::errors::ValidationError;
use crate::record::ActivityTable;
use crate::traits::TableCheck;

use super::utils;

/// Identifier cells must be non-blank
#[derive(Debug, Clone, Copy, Default)]
pub struct Identifiers;

impl TableCheck for Identifiers {
    fn name(&self) -> &'static str {
        "identifiers"
    }

    fn check(&self, table: &ActivityTable, issues: &mut Vec<ValidationError>) {
        for column in IDENTIFIER_COLUMNS {
            let Some(cells) = utils::column_cells(table, column) else {
                continue;
            };
            for (row, cell) in cells {
                if cell.is_blank() {
                    issues.push(ValidationError::EmptyField { row, column });
                }
            }
        }
    }
}
