//! Impact Calculation
//!
//! ## Overview
//!
//! Each validated record is turned into carbon, energy and water impacts by
//! multiplying a *driver* (one of the record's physical quantities) with the
//! per-unit factor looked up for the record's (material, stage):
//!
//! ```text
//! impact(metric) = driver(stage kind, metric) × factor(material, stage, metric)
//! ```
//!
//! ## Drivers
//!
//! Which quantity drives which metric depends on the kind of stage. The
//! mapping is a value, [`DriverTable`], rather than branching code, so it can
//! be inspected, serialized and replaced:
//!
//! | stage kind | carbon | energy | water |
//! |------------|--------|--------|-------|
//! | manufacturing | quantity | energy, else quantity | water, else quantity |
//! | transportation | distance | energy, else quantity | water, else quantity |
//! | use | quantity | energy, else quantity | water, else quantity |
//! | end-of-life | waste | energy, else quantity | water, else quantity |
//! | other | quantity | energy, else quantity | water, else quantity |
//!
//! "else" means the fallback driver applies when the primary one is zero.
//!
//! End-of-life carbon is split by disposal route when the factor entry
//! carries [`RouteFactors`](crate::lookup::RouteFactors):
//!
//! ```text
//! carbon = waste × (rr × f_recycling + lr × f_landfill + ir × f_incineration)
//! ```
//!
//! ## Missing Factors
//!
//! A record whose (material, stage) is not in the factor table either drops
//! out with a [`RowDiagnostic`] ([`FallbackPolicy::Skip`], the default) or
//! stays with zero impact and a [`Provenance::Fallback`] note
//! ([`FallbackPolicy::ZeroImpact`]). The run never aborts on a lookup miss.

use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::columns::REQUIRED_COLUMNS;
use crate::errors::LookupError;
use crate::lookup::{normalize_key, ImpactFactorTable, ImpactFactors};
use crate::record::{ActivityRecord, ActivityTable, Cell, ImpactMetric, ImpactTotals};
use crate::validators::ValidatedBatch;

/// Life-cycle stage families that share a driver mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StageKind {
    /// Raw material extraction, production, assembly
    Manufacturing,
    /// Transport and distribution
    Transportation,
    /// Product use phase
    Use,
    /// Disposal, recycling, landfill
    EndOfLife,
    /// Anything not recognized
    Other,
}

impl StageKind {
    /// All stage kinds
    pub const ALL: [StageKind; 5] = [
        Self::Manufacturing,
        Self::Transportation,
        Self::Use,
        Self::EndOfLife,
        Self::Other,
    ];

    /// Classify a stage name, in any spelling
    pub fn classify(stage: &str) -> Self {
        let key = normalize_key(stage);
        match key.as_str() {
            "manufacturing" | "production" | "assembly" | "processing" | "raw-materials"
            | "raw-material" | "raw-material-extraction" | "extraction" => Self::Manufacturing,
            "transportation" | "transport" | "distribution" | "logistics" => Self::Transportation,
            "use" | "use-phase" | "usage" | "operation" => Self::Use,
            "end-of-life" | "eol" | "disposal" | "recycling" | "waste" => Self::EndOfLife,
            _ if key.starts_with("transport") => Self::Transportation,
            _ if key.starts_with("manufactur") => Self::Manufacturing,
            _ if key.starts_with("end-of-life") => Self::EndOfLife,
            _ => Self::Other,
        }
    }
}

/// A record quantity that can drive an impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Driver {
    /// `quantity_kg`
    Quantity,
    /// `energy_consumption_kwh`
    Energy,
    /// `transport_distance_km`
    Distance,
    /// `waste_generated_kg`
    Waste,
    /// `water_usage_liters`
    Water,
}

impl Driver {
    /// Value of this driver on a record
    pub fn value(&self, record: &ActivityRecord) -> f64 {
        match self {
            Self::Quantity => record.quantity_kg,
            Self::Energy => record.energy_consumption_kwh,
            Self::Distance => record.transport_distance_km,
            Self::Waste => record.waste_generated_kg,
            Self::Water => record.water_usage_liters,
        }
    }
}

/// Primary driver with an optional fallback for when it is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverRule {
    /// Driver used when its value is positive
    pub primary: Driver,
    /// Driver used otherwise
    #[cfg_attr(feature = "serde", serde(default))]
    pub fallback: Option<Driver>,
}

impl DriverRule {
    /// Rule without fallback
    pub const fn only(primary: Driver) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Rule with fallback
    pub const fn or(primary: Driver, fallback: Driver) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    /// Driver value for a record, never negative
    pub fn resolve(&self, record: &ActivityRecord) -> f64 {
        let primary = self.primary.value(record);
        let value = match self.fallback {
            Some(fallback) if primary <= 0.0 => fallback.value(record),
            _ => primary,
        };
        value.max(0.0)
    }
}

/// Driver rules for the three metrics of one stage kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageDrivers {
    /// Carbon driver
    pub carbon: DriverRule,
    /// Energy driver
    pub energy: DriverRule,
    /// Water driver
    pub water: DriverRule,
}

impl StageDrivers {
    /// Standard energy and water rules with the given carbon driver
    pub const fn with_carbon(carbon: Driver) -> Self {
        Self {
            carbon: DriverRule::only(carbon),
            energy: DriverRule::or(Driver::Energy, Driver::Quantity),
            water: DriverRule::or(Driver::Water, Driver::Quantity),
        }
    }

    /// Rule for one metric
    pub fn get(&self, metric: ImpactMetric) -> &DriverRule {
        match metric {
            ImpactMetric::Carbon => &self.carbon,
            ImpactMetric::Energy => &self.energy,
            ImpactMetric::Water => &self.water,
        }
    }
}

/// Stage kind → driver rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverTable {
    /// Manufacturing-type stages
    pub manufacturing: StageDrivers,
    /// Transportation-type stages
    pub transportation: StageDrivers,
    /// Use phase
    pub use_phase: StageDrivers,
    /// End-of-life-type stages
    pub end_of_life: StageDrivers,
    /// Unrecognized stages
    pub other: StageDrivers,
}

impl Default for DriverTable {
    fn default() -> Self {
        Self {
            manufacturing: StageDrivers::with_carbon(Driver::Quantity),
            transportation: StageDrivers::with_carbon(Driver::Distance),
            use_phase: StageDrivers::with_carbon(Driver::Quantity),
            end_of_life: StageDrivers::with_carbon(Driver::Waste),
            other: StageDrivers::with_carbon(Driver::Quantity),
        }
    }
}

impl DriverTable {
    /// Rules for a stage kind
    pub fn get(&self, kind: StageKind) -> &StageDrivers {
        match kind {
            StageKind::Manufacturing => &self.manufacturing,
            StageKind::Transportation => &self.transportation,
            StageKind::Use => &self.use_phase,
            StageKind::EndOfLife => &self.end_of_life,
            StageKind::Other => &self.other,
        }
    }

    /// Replace the rules for one stage kind
    pub fn with_stage(mut self, kind: StageKind, drivers: StageDrivers) -> Self {
        let slot = match kind {
            StageKind::Manufacturing => &mut self.manufacturing,
            StageKind::Transportation => &mut self.transportation,
            StageKind::Use => &mut self.use_phase,
            StageKind::EndOfLife => &mut self.end_of_life,
            StageKind::Other => &mut self.other,
        };
        *slot = drivers;
        self
    }
}

/// What to do with a record whose factors are missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FallbackPolicy {
    /// Leave the record out and report it
    #[default]
    Skip,
    /// Keep the record with zero impact and a provenance note
    ZeroImpact,
}

/// Calculator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalculatorConfig {
    /// Missing-factor handling
    pub fallback: FallbackPolicy,
    /// Stage driver mapping
    pub drivers: DriverTable,
}

/// Where a result's factors came from
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Provenance {
    /// Factors found in the table
    #[default]
    Exact,
    /// Factors missing, zero impact substituted
    Fallback {
        /// Lookup failure that triggered the fallback
        reason: LookupError,
    },
}

impl Provenance {
    /// True when the result used substituted factors
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Calculated impacts for one record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactResult {
    /// Zero-based row index in the source table
    pub row: usize,
    /// The record the impacts were computed from
    pub record: ActivityRecord,
    /// Carbon impact
    pub carbon_impact: f64,
    /// Energy impact
    pub energy_impact: f64,
    /// Water impact
    pub water_impact: f64,
    /// Factor source
    pub provenance: Provenance,
}

impl ImpactResult {
    /// The three impacts together
    pub fn totals(&self) -> ImpactTotals {
        ImpactTotals::new(self.carbon_impact, self.energy_impact, self.water_impact)
    }

    /// Value of one metric
    pub fn impact(&self, metric: ImpactMetric) -> f64 {
        self.totals().get(metric)
    }
}

/// A record left out of the results
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowDiagnostic {
    /// Zero-based row index in the source table
    pub row: usize,
    /// Product of the skipped record
    pub product_id: String,
    /// Why the record was skipped
    pub error: LookupError,
}

/// Results plus per-row diagnostics for one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationOutcome {
    /// One result per calculated record, in source row order
    pub results: Vec<ImpactResult>,
    /// Records that were skipped
    pub diagnostics: Vec<RowDiagnostic>,
}

impl CalculationOutcome {
    /// True when every record produced a result from real factors
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty() && !self.results.iter().any(|r| r.provenance.is_fallback())
    }

    /// Number of results that used substituted factors
    pub fn fallback_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.provenance.is_fallback())
            .count()
    }

    /// Flat table of the results: record columns followed by the impact columns
    pub fn to_table(&self) -> ActivityTable {
        enriched_table(&self.results)
    }
}

/// One row per result: the record columns, then one column per impact metric
pub fn enriched_table(results: &[ImpactResult]) -> ActivityTable {
    let columns = REQUIRED_COLUMNS
        .iter()
        .copied()
        .chain(ImpactMetric::ALL.iter().map(ImpactMetric::column))
        .map(String::from)
        .collect();
    let rows = results
        .iter()
        .map(|result| {
            let mut cells = result.record.to_cells().to_vec();
            cells.extend(
                ImpactMetric::ALL
                    .iter()
                    .map(|&metric| Cell::Number(result.impact(metric))),
            );
            cells
        })
        .collect();
    ActivityTable::from_parts(columns, rows)
}

/// Applies the driver table and factor table to validated records
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactCalculator {
    config: CalculatorConfig,
}

impl ImpactCalculator {
    /// Create calculator
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Calculate impacts for every record in the batch
    pub fn calculate(
        &self,
        batch: &ValidatedBatch,
        factors: &ImpactFactorTable,
    ) -> CalculationOutcome {
        let mut outcome = CalculationOutcome {
            results: Vec::with_capacity(batch.len()),
            diagnostics: Vec::new(),
        };

        for (row, record) in batch.entries() {
            let lookup =
                factors.lookup_normalized(record.normalized_material(), record.normalized_stage());
            match lookup {
                Ok(entry) => {
                    let totals = self.impacts(record, entry);
                    outcome.results.push(ImpactResult {
                        row: *row,
                        record: record.clone(),
                        carbon_impact: totals.carbon,
                        energy_impact: totals.energy,
                        water_impact: totals.water,
                        provenance: Provenance::Exact,
                    });
                }
                Err(error) => match self.config.fallback {
                    FallbackPolicy::Skip => {
                        log_debug!("Row {}: skipped, {}", row, error);
                        outcome.diagnostics.push(RowDiagnostic {
                            row: *row,
                            product_id: record.product_id.clone(),
                            error,
                        });
                    }
                    FallbackPolicy::ZeroImpact => {
                        log_warn!("Row {}: {}, using zero impact", row, error);
                        outcome.results.push(ImpactResult {
                            row: *row,
                            record: record.clone(),
                            carbon_impact: 0.0,
                            energy_impact: 0.0,
                            water_impact: 0.0,
                            provenance: Provenance::Fallback { reason: error },
                        });
                    }
                },
            }
        }

        if !outcome.diagnostics.is_empty() {
            log_warn!(
                "{} record(s) skipped for missing impact factors",
                outcome.diagnostics.len()
            );
        }
        outcome
    }

    /// Impacts of one record given its factors
    pub fn impacts(&self, record: &ActivityRecord, factors: &ImpactFactors) -> ImpactTotals {
        let kind = StageKind::classify(&record.life_cycle_stage);
        let drivers = self.config.drivers.get(kind);

        // Out-of-bounds shares only pass validation with bounds disabled
        let carbon_factor = match (kind, &factors.routes) {
            (StageKind::EndOfLife, Some(routes)) => routes
                .weighted(
                    record.recycling_rate,
                    record.landfill_rate,
                    record.incineration_rate,
                )
                .max(0.0),
            _ => factors.carbon_impact,
        };

        ImpactTotals::new(
            drivers.carbon.resolve(record) * carbon_factor,
            drivers.energy.resolve(record) * factors.energy_impact,
            drivers.water.resolve(record) * factors.water_impact,
        )
    }
}
