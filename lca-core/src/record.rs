//! Activity records and the loosely typed table they arrive in
//!
//! External readers (CSV, JSON, spreadsheets) hand over an [`ActivityTable`]:
//! named columns and rows of [`Cell`]s whose types are not yet trusted. The
//! validator checks the table and only then converts rows into typed
//! [`ActivityRecord`]s.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::{Add, AddAssign};

use crate::constants::columns::{self, REQUIRED_COLUMNS};
use crate::errors::{TableError, ValidationError, ValidationResult};
use crate::lookup::normalize_key;
use crate::traits::Validatable;

/// One cell of an activity table, as delivered by the reader
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Cell {
    /// Numeric cell
    Number(f64),
    /// Text cell (may still hold a number, e.g. "12.5")
    Text(String),
    /// Missing value
    Empty,
}

impl Cell {
    /// Coerce the cell to a finite number
    ///
    /// Text is trimmed and parsed. Empty cells, unparsable text, NaN and
    /// infinities yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty => return None,
        };
        value.is_valid().then_some(value)
    }

    /// Render the cell as text
    pub fn to_text(&self) -> String {
        match self {
            Cell::Number(v) => format!("{}", v),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Empty => true,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// In-memory activity table: named columns, rows of untyped cells
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl ActivityTable {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if names.contains(&column) {
                return Err(TableError::DuplicateColumn { column });
            }
            names.push(column);
        }
        Ok(Self {
            columns: names,
            rows: Vec::new(),
        })
    }

    /// Create an empty table carrying exactly the required columns
    pub fn with_required_columns() -> Self {
        Self {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Assemble a table whose rows are known to match `columns`
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from typed records
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ActivityRecord>,
    {
        let mut table = Self::with_required_columns();
        for record in records {
            table.rows.push(record.to_cells().to_vec());
        }
        table
    }

    /// Append a row; the number of cells must match the number of columns
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), TableError> {
        if cells.len() != self.columns.len() {
            return Err(TableError::RowWidthMismatch {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Append a typed record, placing each field under its column
    ///
    /// Columns the record does not know about receive [`Cell::Empty`];
    /// record fields without a matching column are dropped.
    pub fn push_record(&mut self, record: &ActivityRecord) {
        let cells = record.to_cells();
        let row = self
            .columns
            .iter()
            .map(|name| {
                REQUIRED_COLUMNS
                    .iter()
                    .position(|c| *c == name.as_str())
                    .map(|i| cells[i].clone())
                    .unwrap_or(Cell::Empty)
            })
            .collect();
        self.rows.push(row);
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// True when the column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one row
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Cell at (row, column)
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Replace one cell
    pub fn set_cell(&mut self, row: usize, column: &str, cell: Cell) -> Result<(), TableError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| TableError::UnknownColumn {
                column: column.to_string(),
            })?;
        let len = self.rows.len();
        let expected = self.columns.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfBounds { row, len })?;
        let found = target.len();
        let slot = target
            .get_mut(idx)
            .ok_or(TableError::RowWidthMismatch { row, expected, found })?;
        *slot = cell;
        Ok(())
    }

    /// Remove a column and its cells
    pub fn drop_column(&mut self, column: &str) -> Result<(), TableError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| TableError::UnknownColumn {
                column: column.to_string(),
            })?;
        // Check every row first so a failure leaves the table untouched
        let expected = self.columns.len();
        if let Some((row, cells)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(TableError::RowWidthMismatch {
                row,
                expected,
                found: cells.len(),
            });
        }
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        Ok(())
    }

    /// Table with rows reordered by `order` (indices into the current rows)
    ///
    /// Indices past the end are ignored.
    pub fn reordered(&self, order: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: order
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

/// Column positions of every required field, resolved once per table
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnMap {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnMap {
    /// Resolve all required columns, listing every missing one on failure
    pub(crate) fn resolve(table: &ActivityTable) -> Result<Self, Vec<ValidationError>> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match table.column_index(column) {
                Some(idx) => *slot = idx,
                None => missing.push(ValidationError::MissingColumn { column }),
            }
        }
        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            Err(missing)
        }
    }

    fn cell<'a>(&self, cells: &'a [Cell], column: &'static str) -> &'a Cell {
        // Ragged rows can only come from deserialized tables
        static EMPTY: Cell = Cell::Empty;
        REQUIRED_COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|field| cells.get(self.positions[field]))
            .unwrap_or(&EMPTY)
    }

    fn number(&self, cells: &[Cell], row: usize, column: &'static str) -> ValidationResult<f64> {
        self.cell(cells, column)
            .as_number()
            .ok_or(ValidationError::NonNumeric { row, column })
    }

    /// Convert one row into a typed record
    pub(crate) fn record(&self, cells: &[Cell], row: usize) -> ValidationResult<ActivityRecord> {
        Ok(ActivityRecord {
            product_id: self.cell(cells, columns::PRODUCT_ID).to_text(),
            product_name: self.cell(cells, columns::PRODUCT_NAME).to_text(),
            life_cycle_stage: self.cell(cells, columns::LIFE_CYCLE_STAGE).to_text(),
            material_type: self.cell(cells, columns::MATERIAL_TYPE).to_text(),
            quantity_kg: self.number(cells, row, columns::QUANTITY_KG)?,
            energy_consumption_kwh: self.number(cells, row, columns::ENERGY_CONSUMPTION_KWH)?,
            transport_distance_km: self.number(cells, row, columns::TRANSPORT_DISTANCE_KM)?,
            transport_mode: self.cell(cells, columns::TRANSPORT_MODE).to_text(),
            waste_generated_kg: self.number(cells, row, columns::WASTE_GENERATED_KG)?,
            recycling_rate: self.number(cells, row, columns::RECYCLING_RATE)?,
            landfill_rate: self.number(cells, row, columns::LANDFILL_RATE)?,
            incineration_rate: self.number(cells, row, columns::INCINERATION_RATE)?,
            carbon_footprint_kg_co2e: self.number(cells, row, columns::CARBON_FOOTPRINT_KG_CO2E)?,
            water_usage_liters: self.number(cells, row, columns::WATER_USAGE_LITERS)?,
        })
    }
}

/// One typed row of product activity
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityRecord {
    /// Product identifier, shared by all stages of the product
    pub product_id: String,
    /// Product display name
    pub product_name: String,
    /// Life-cycle stage as given in the source
    pub life_cycle_stage: String,
    /// Material as given in the source
    pub material_type: String,
    /// Material mass, kg
    pub quantity_kg: f64,
    /// Energy consumed, kWh
    pub energy_consumption_kwh: f64,
    /// Transport distance, km
    pub transport_distance_km: f64,
    /// Transport mode
    pub transport_mode: String,
    /// Waste generated, kg
    pub waste_generated_kg: f64,
    /// Recycled share of waste
    pub recycling_rate: f64,
    /// Landfilled share of waste
    pub landfill_rate: f64,
    /// Incinerated share of waste
    pub incineration_rate: f64,
    /// Carbon footprint supplied with the record, kg CO2e
    pub carbon_footprint_kg_co2e: f64,
    /// Water used, liters
    pub water_usage_liters: f64,
}

impl ActivityRecord {
    /// Stage name in canonical form (see [`normalize_key`])
    pub fn normalized_stage(&self) -> String {
        normalize_key(&self.life_cycle_stage)
    }

    /// Material name in canonical form (see [`normalize_key`])
    pub fn normalized_material(&self) -> String {
        normalize_key(&self.material_type)
    }

    /// Sum of the three end-of-life rates
    pub fn rate_sum(&self) -> f64 {
        self.recycling_rate + self.landfill_rate + self.incineration_rate
    }

    /// Cells in [`REQUIRED_COLUMNS`] order
    pub fn to_cells(&self) -> [Cell; REQUIRED_COLUMNS.len()] {
        [
            Cell::Text(self.product_id.clone()),
            Cell::Text(self.product_name.clone()),
            Cell::Text(self.life_cycle_stage.clone()),
            Cell::Text(self.material_type.clone()),
            Cell::Number(self.quantity_kg),
            Cell::Number(self.energy_consumption_kwh),
            Cell::Number(self.transport_distance_km),
            Cell::Text(self.transport_mode.clone()),
            Cell::Number(self.waste_generated_kg),
            Cell::Number(self.recycling_rate),
            Cell::Number(self.landfill_rate),
            Cell::Number(self.incineration_rate),
            Cell::Number(self.carbon_footprint_kg_co2e),
            Cell::Number(self.water_usage_liters),
        ]
    }
}

/// The three impact categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactMetric {
    /// Greenhouse gas emissions, kg CO2e
    Carbon,
    /// Energy demand
    Energy,
    /// Water demand
    Water,
}

impl ImpactMetric {
    /// All metrics in reporting order
    pub const ALL: [ImpactMetric; 3] = [Self::Carbon, Self::Energy, Self::Water];

    /// Output column name
    pub fn column(&self) -> &'static str {
        match self {
            Self::Carbon => "carbon_impact",
            Self::Energy => "energy_impact",
            Self::Water => "water_impact",
        }
    }
}

/// Carbon, energy and water impact values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactTotals {
    /// Carbon impact
    pub carbon: f64,
    /// Energy impact
    pub energy: f64,
    /// Water impact
    pub water: f64,
}

impl ImpactTotals {
    /// All-zero totals
    pub const ZERO: ImpactTotals = ImpactTotals {
        carbon: 0.0,
        energy: 0.0,
        water: 0.0,
    };

    /// Create totals
    pub const fn new(carbon: f64, energy: f64, water: f64) -> Self {
        Self {
            carbon,
            energy,
            water,
        }
    }

    /// Value of one metric
    pub fn get(&self, metric: ImpactMetric) -> f64 {
        match metric {
            ImpactMetric::Carbon => self.carbon,
            ImpactMetric::Energy => self.energy,
            ImpactMetric::Water => self.water,
        }
    }
}

impl Add for ImpactTotals {
    type Output = ImpactTotals;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            carbon: self.carbon + rhs.carbon,
            energy: self.energy + rhs.energy,
            water: self.water + rhs.water,
        }
    }
}

impl AddAssign for ImpactTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn record() -> ActivityRecord {
        ActivityRecord {
            product_id: "P001".into(),
            product_name: "Chair".into(),
            life_cycle_stage: "Manufacturing".into(),
            material_type: "Steel".into(),
            quantity_kg: 100.0,
            energy_consumption_kwh: 50.0,
            transport_distance_km: 10.0,
            transport_mode: "truck".into(),
            waste_generated_kg: 5.0,
            recycling_rate: 0.8,
            landfill_rate: 0.1,
            incineration_rate: 0.1,
            carbon_footprint_kg_co2e: 20.0,
            water_usage_liters: 100.0,
        }
    }

    #[test]
    fn cell_coercion() {
        assert_eq!(Cell::Number(2.5).as_number(), Some(2.5));
        assert_eq!(Cell::from(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(Cell::from("invalid").as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
        assert_eq!(Cell::Number(f64::INFINITY).as_number(), None);
    }

    #[test]
    fn blank_cells() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::from("P001").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn duplicate_columns_rejected() {
        let err = ActivityTable::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn { column: "a".into() });
    }

    #[test]
    fn row_width_checked() {
        let mut table = ActivityTable::new(["a", "b"]).unwrap();
        assert!(table.push_row(vec![Cell::from(1.0), Cell::from(2.0)]).is_ok());
        let err = table.push_row(vec![Cell::from(1.0)]).unwrap_err();
        assert!(matches!(err, TableError::RowWidthMismatch { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn records_survive_table_conversion() {
        let table = ActivityTable::from_records(&[record()]);
        let map = ColumnMap::resolve(&table).unwrap();
        let back = map.record(table.row(0).unwrap(), 0).unwrap();
        assert_eq!(back, record());
    }

    #[test]
    fn push_record_follows_column_order() {
        let mut table = ActivityTable::new(["quantity_kg", "product_id", "extra"]).unwrap();
        table.push_record(&record());
        assert_eq!(table.cell(0, "quantity_kg"), Some(&Cell::Number(100.0)));
        assert_eq!(table.cell(0, "product_id"), Some(&Cell::from("P001")));
        assert_eq!(table.cell(0, "extra"), Some(&Cell::Empty));
    }

    #[test]
    fn drop_and_set_cells() {
        let mut table = ActivityTable::from_records(&[record()]);
        table.set_cell(0, "quantity_kg", Cell::from("invalid")).unwrap();
        assert_eq!(table.cell(0, "quantity_kg"), Some(&Cell::from("invalid")));

        table.drop_column("product_id").unwrap();
        assert!(!table.has_column("product_id"));
        assert_eq!(table.row(0).unwrap().len(), REQUIRED_COLUMNS.len() - 1);
        assert!(ColumnMap::resolve(&table).is_err());

        assert!(table.set_cell(5, "quantity_kg", Cell::Empty).is_err());
    }

    #[test]
    fn ragged_rows_are_errors_not_panics() {
        let mut table = ActivityTable {
            columns: vec!["a".into(), "b".into(), "c".into()],
            rows: vec![
                vec![Cell::from(1.0), Cell::from(2.0), Cell::from(3.0)],
                vec![Cell::from(1.0)],
            ],
        };

        let err = table.set_cell(1, "c", Cell::Empty).unwrap_err();
        assert_eq!(err, TableError::RowWidthMismatch { row: 1, expected: 3, found: 1 });
        assert!(table.set_cell(0, "c", Cell::Empty).is_ok());

        let err = table.drop_column("a").unwrap_err();
        assert_eq!(err, TableError::RowWidthMismatch { row: 1, expected: 3, found: 1 });
        assert!(table.has_column("a"));
        assert_eq!(table.row(0).unwrap().len(), 3);
    }

    #[test]
    fn non_numeric_cell_fails_conversion() {
        let mut table = ActivityTable::from_records(&[record()]);
        table.set_cell(0, "landfill_rate", Cell::from("n/a")).unwrap();
        let map = ColumnMap::resolve(&table).unwrap();
        let err = map.record(table.row(0).unwrap(), 0).unwrap_err();
        assert_eq!(err, ValidationError::NonNumeric { row: 0, column: "landfill_rate" });
    }

    #[test]
    fn normalization_and_rates() {
        let r = record();
        assert_eq!(r.normalized_stage(), "manufacturing");
        assert_eq!(r.normalized_material(), "steel");
        assert!((r.rate_sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn totals_add() {
        let mut total = ImpactTotals::ZERO;
        total += ImpactTotals::new(180.0, 2000.0, 15000.0);
        total += ImpactTotals::new(20.0, 0.0, 5.0);
        assert_eq!(total, ImpactTotals::new(200.0, 2000.0, 15005.0));
        assert_eq!(total.get(ImpactMetric::Carbon), 200.0);
        assert_eq!(ImpactMetric::Water.column(), "water_impact");
    }
}
