//! Core validation and impact-calculation engine for product life-cycle assessment
//!
//! Turns raw activity records (material quantities, energy use, transport,
//! waste handling) into carbon, energy and water impacts per product and
//! life-cycle stage.
//!
//! Processing happens in four steps:
//! - [`RecordValidator`] checks the activity table (columns, numeric cells,
//!   end-of-life rate fractions)
//! - [`ImpactFactorTable`] resolves per-material, per-stage impact factors
//! - [`ImpactCalculator`] applies the stage driver table to every record
//! - [`Aggregator`] rolls the results up per product, stage and material
//!
//! [`LcaEngine`] runs all four in sequence.
//!
//! ```no_run
//! use lca_core::{ActivityTable, ImpactFactorTable, LcaEngine};
//!
//! # fn load() -> (ActivityTable, ImpactFactorTable) { unimplemented!() }
//! let (table, factors) = load();
//! let engine = LcaEngine::default();
//!
//! match engine.run(&table, &factors) {
//!     Ok(report) => {
//!         for row in report.summaries.comparison() {
//!             // hand off to reporting
//!             let _ = row.totals.carbon;
//!         }
//!     }
//!     Err(_rejected) => {} // inspect the validation issues
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod aggregation;
pub mod calculator;
pub mod constants;
pub mod errors;
pub mod lookup;
pub mod pipeline;
pub mod record;
pub mod traits;
pub mod validators;

// Public API
pub use aggregation::{
    Aggregator, ComparisonRow, Dimension, DisposalBreakdown, ImpactSummaries, ProductSummary,
};
pub use calculator::{
    enriched_table, CalculationOutcome, CalculatorConfig, Driver, DriverRule, DriverTable,
    FallbackPolicy, ImpactCalculator, ImpactResult, Provenance, RowDiagnostic, StageDrivers,
    StageKind,
};
pub use errors::{
    EngineError, ErrorKind, FactorTableError, LookupError, LookupResult, TableError,
    ValidationError, ValidationResult,
};
pub use lookup::{ImpactFactorTable, ImpactFactors, RouteFactors};
pub use pipeline::{EngineConfig, LcaEngine, LcaReport, RunStatus};
pub use record::{ActivityRecord, ActivityTable, Cell, ImpactMetric, ImpactTotals};
pub use traits::{TableCheck, Validatable};
pub use validators::{
    RecordValidator, RowRejection, ValidatedBatch, ValidationPolicy, ValidationReport,
    ValidatorConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
