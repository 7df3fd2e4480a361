//! End-of-life allocation fractions
//!
//! Recycling, landfill and incineration shares describe how one row's waste
//! is split across disposal routes. They must add up to one, within a
//! tolerance for rounded inputs, and with bounds enforcement each share must
//! also lie in [0, 1] on its own: 1.5 / -0.3 / -0.2 sums to one but is not
//! an allocation.

use alloc::vec::Vec;

use crate::constants::columns::RATE_COLUMNS;
use crate::constants::tolerances::{RATE_MAX, RATE_MIN, RATE_SUM_TARGET, RATE_SUM_TOLERANCE};
use crate::errors::ValidationError;
use crate::record::ActivityTable;
use crate::traits::TableCheck;

use super::utils;

/// Rate-fraction invariant
#[derive(Debug, Clone, Copy)]
pub struct RateFractions {
    tolerance: f64,
    enforce_bounds: bool,
}

impl Default for RateFractions {
    fn default() -> Self {
        Self {
            tolerance: RATE_SUM_TOLERANCE,
            enforce_bounds: true,
        }
    }
}

impl RateFractions {
    /// Create with a custom sum tolerance
    pub fn new(tolerance: f64, enforce_bounds: bool) -> Self {
        Self {
            tolerance: libm::fabs(tolerance),
            enforce_bounds,
        }
    }
}

impl TableCheck for RateFractions {
    fn name(&self) -> &'static str {
        "rate_fractions"
    }

    fn check(&self, table: &ActivityTable, issues: &mut Vec<ValidationError>) {
        let mut indices = [0usize; 3];
        for (slot, column) in indices.iter_mut().zip(RATE_COLUMNS) {
            match table.column_index(column) {
                Some(idx) => *slot = idx,
                // Missing rate columns are a schema issue
                None => return,
            }
        }

        for (row, cells) in table.rows().enumerate() {
            let mut rates = [0.0f64; 3];
            let mut numeric = true;
            for (rate, &idx) in rates.iter_mut().zip(indices.iter()) {
                match cells.get(idx).and_then(|c| c.as_number()) {
                    Some(value) => *rate = value,
                    None => numeric = false,
                }
            }
            // Non-numeric cells are reported by NumericCells
            if !numeric {
                continue;
            }

            if self.enforce_bounds {
                for (&value, column) in rates.iter().zip(RATE_COLUMNS) {
                    if !utils::in_range(value, RATE_MIN, RATE_MAX) {
                        issues.push(ValidationError::RateOutOfBounds { row, column, value });
                    }
                }
            }

            let sum: f64 = rates.iter().sum();
            if !utils::within_tolerance(sum, RATE_SUM_TARGET, self.tolerance) {
                issues.push(ValidationError::RateSumOutOfTolerance {
                    row,
                    sum,
                    tolerance: self.tolerance,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Cell;

    fn table(rows: &[[f64; 3]]) -> ActivityTable {
        let mut table = ActivityTable::new(RATE_COLUMNS).unwrap();
        for r in rows {
            table
                .push_row(r.iter().map(|&v| Cell::from(v)).collect())
                .unwrap();
        }
        table
    }

    #[test]
    fn valid_allocations_pass() {
        let mut issues = Vec::new();
        RateFractions::default().check(
            &table(&[[0.8, 0.1, 0.1], [0.7, 0.2, 0.1], [0.6, 0.3, 0.1], [1.0, 0.0, 0.0]]),
            &mut issues,
        );
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn rounding_within_tolerance_passes() {
        let mut issues = Vec::new();
        RateFractions::default().check(&table(&[[0.5, 0.3, 0.205]]), &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn over_allocation_fails() {
        let mut issues = Vec::new();
        RateFractions::default().check(&table(&[[0.8, 0.1, 0.1], [0.6, 0.6, 0.6]]), &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0],
            ValidationError::RateSumOutOfTolerance { row: 1, .. }
        ));
    }

    #[test]
    fn negative_share_fails_bounds() {
        let mut issues = Vec::new();
        RateFractions::default().check(&table(&[[1.5, -0.3, -0.2]]), &mut issues);
        assert_eq!(issues.len(), 3);
        assert!(issues
            .iter()
            .all(|e| matches!(e, ValidationError::RateOutOfBounds { row: 0, .. })));
    }

    #[test]
    fn bounds_can_be_disabled() {
        let mut issues = Vec::new();
        RateFractions::new(0.01, false).check(&table(&[[1.5, -0.3, -0.2]]), &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn non_numeric_rows_skipped() {
        let mut t = table(&[[0.6, 0.6, 0.6]]);
        t.set_cell(0, "landfill_rate", Cell::from("n/a")).unwrap();
        let mut issues = Vec::new();
        RateFractions::default().check(&t, &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn missing_rate_column_skipped() {
        let mut t = table(&[[0.6, 0.6, 0.6]]);
        t.drop_column("incineration_rate").unwrap();
        let mut issues = Vec::new();
        RateFractions::default().check(&t, &mut issues);
        assert!(issues.is_empty());
    }
}
