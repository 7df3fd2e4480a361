//! Numeric-type conformance and sign checks

use alloc::vec::Vec;

use crate::constants::columns::{NON_NEGATIVE_COLUMNS, NUMERIC_COLUMNS};
use crate::errors::ValidationError;
use crate::record::ActivityTable;
use crate::traits::TableCheck;

use super::utils;

/// Every numeric column must hold a finite number on every row
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericCells;

impl TableCheck for NumericCells {
    fn name(&self) -> &'static str {
        "numeric_cells"
    }

    fn check(&self, table: &ActivityTable, issues: &mut Vec<ValidationError>) {
        for column in NUMERIC_COLUMNS {
            let Some(cells) = utils::column_cells(table, column) else {
                continue;
            };
            for (row, cell) in cells {
                if cell.as_number().is_none() {
                    issues.push(ValidationError::NonNumeric { row, column });
                }
            }
        }
    }
}

/// Mass, energy, distance and waste cannot be negative
///
/// Non-numeric cells are left to [`NumericCells`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NonNegativeQuantities;

impl TableCheck for NonNegativeQuantities {
    fn name(&self) -> &'static str {
        "non_negative_quantities"
    }

    fn check(&self, table: &ActivityTable, issues: &mut Vec<ValidationError>) {
        for column in NON_NEGATIVE_COLUMNS {
            let Some(cells) = utils::column_cells(table, column) else {
                continue;
            };
            for (row, cell) in cells {
                match cell.as_number() {
                    Some(value) if value < 0.0 => {
                        issues.push(ValidationError::NegativeValue { row, column, value })
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Cell;
    use alloc::vec;

    fn table(quantity: Cell) -> ActivityTable {
        let mut table = ActivityTable::new(["quantity_kg", "transport_mode"]).unwrap();
        table.push_row(vec![Cell::from(100.0), Cell::from("truck")]).unwrap();
        table.push_row(vec![quantity, Cell::from("rail")]).unwrap();
        table
    }

    #[test]
    fn numeric_text_accepted() {
        let mut issues = Vec::new();
        NumericCells.check(&table(Cell::from("200")), &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn text_cell_rejected() {
        let mut issues = Vec::new();
        NumericCells.check(&table(Cell::from("invalid")), &mut issues);
        assert_eq!(issues, [ValidationError::NonNumeric { row: 1, column: "quantity_kg" }]);
    }

    #[test]
    fn empty_cell_rejected() {
        let mut issues = Vec::new();
        NumericCells.check(&table(Cell::Empty), &mut issues);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn negative_quantity_rejected() {
        let mut issues = Vec::new();
        NonNegativeQuantities.check(&table(Cell::from(-5.0)), &mut issues);
        assert_eq!(
            issues,
            [ValidationError::NegativeValue { row: 1, column: "quantity_kg", value: -5.0 }]
        );
    }

    #[test]
    fn sign_check_ignores_non_numeric() {
        let mut issues = Vec::new();
        NonNegativeQuantities.check(&table(Cell::from("invalid")), &mut issues);
        assert!(issues.is_empty());
    }
}
