//! Shared helpers for table checks
//!
//! Pure functions, no allocation. Rules use them to walk a column and to
//! compare floats against bounds.

use crate::record::{ActivityTable, Cell};

/// True when `value` lies in the closed range [min, max]
pub fn in_range(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// True when `actual` is within `tolerance` of `target`
pub fn within_tolerance(actual: f64, target: f64, tolerance: f64) -> bool {
    libm::fabs(actual - target) <= tolerance
}

/// Iterate `(row, cell)` pairs of one column, `None` if the column is absent
pub fn column_cells<'a>(
    table: &'a ActivityTable,
    column: &str,
) -> Option<impl Iterator<Item = (usize, &'a Cell)> + 'a> {
    let idx = table.column_index(column)?;
    Some(
        table
            .rows()
            .enumerate()
            .filter_map(move |(row, cells)| cells.get(idx).map(|cell| (row, cell))),
    )
}
