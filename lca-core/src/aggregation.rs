//! Impact Aggregation
//!
//! Rolls per-record [`ImpactResult`]s up into per-product summaries:
//! totals, stage and material breakdowns, and the end-of-life mass split.
//!
//! ## Determinism
//!
//! Floating-point addition is not associative, so summing the same rows in a
//! different order can change the last bits of a total. The aggregator sorts
//! results into a canonical order (product, stage, material, then impacts)
//! before summing, which makes summaries independent of input row order.
//!
//! ## Double Counting
//!
//! Each source row contributes at most once. Results that repeat a row index
//! already seen are dropped with a warning.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::calculator::ImpactResult;
use crate::lookup::normalize_key;
use crate::record::{ImpactMetric, ImpactTotals};

/// Grouping dimension for overall breakdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Dimension {
    /// Group by normalized life-cycle stage
    Stage,
    /// Group by normalized material
    Material,
}

/// Waste mass split by disposal route, kg
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisposalBreakdown {
    /// Recycled mass
    pub recycled_kg: f64,
    /// Landfilled mass
    pub landfilled_kg: f64,
    /// Incinerated mass
    pub incinerated_kg: f64,
}

impl DisposalBreakdown {
    /// Total waste mass
    pub fn total_kg(&self) -> f64 {
        self.recycled_kg + self.landfilled_kg + self.incinerated_kg
    }
}

/// Aggregated impacts of one product
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductSummary {
    /// Product identifier
    pub product_id: String,
    /// Display name from the first record in canonical order
    pub product_name: String,
    /// Sum over all records of the product
    pub totals: ImpactTotals,
    /// Sums per normalized stage
    pub by_stage: BTreeMap<String, ImpactTotals>,
    /// Sums per normalized material
    pub by_material: BTreeMap<String, ImpactTotals>,
    /// Number of records summed
    pub record_count: usize,
    /// Waste mass by disposal route
    pub end_of_life: DisposalBreakdown,
}

/// One row of the cross-product comparison
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonRow {
    /// Product identifier
    pub product_id: String,
    /// Product display name
    pub product_name: String,
    /// Carbon, energy and water totals
    pub totals: ImpactTotals,
}

/// Summary views over one run
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactSummaries {
    /// Per-product summaries keyed by product id
    pub products: BTreeMap<String, ProductSummary>,
    /// Number of aggregated records per normalized stage
    pub stage_counts: BTreeMap<String, usize>,
}

impl ImpactSummaries {
    /// Summary of one product
    pub fn product(&self, product_id: &str) -> Option<&ProductSummary> {
        self.products.get(product_id)
    }

    /// Totals of one product
    pub fn total_by_product(&self, product_id: &str) -> Option<ImpactTotals> {
        self.product(product_id).map(|p| p.totals)
    }

    /// Stage breakdown of one product
    pub fn stage_breakdown(&self, product_id: &str) -> Option<&BTreeMap<String, ImpactTotals>> {
        self.product(product_id).map(|p| &p.by_stage)
    }

    /// Material breakdown of one product
    pub fn material_breakdown(
        &self,
        product_id: &str,
    ) -> Option<&BTreeMap<String, ImpactTotals>> {
        self.product(product_id).map(|p| &p.by_material)
    }

    /// One row per product, ordered by product id
    pub fn comparison(&self) -> Vec<ComparisonRow> {
        self.products
            .values()
            .map(|p| ComparisonRow {
                product_id: p.product_id.clone(),
                product_name: p.product_name.clone(),
                totals: p.totals,
            })
            .collect()
    }

    /// One metric summed across all products, grouped by stage or material
    pub fn breakdown(&self, metric: ImpactMetric, dimension: Dimension) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        for product in self.products.values() {
            let groups = match dimension {
                Dimension::Stage => &product.by_stage,
                Dimension::Material => &product.by_material,
            };
            for (key, totals) in groups {
                *out.entry(key.clone()).or_insert(0.0) += totals.get(metric);
            }
        }
        out
    }

    /// Sum over all products
    pub fn grand_total(&self) -> ImpactTotals {
        self.products
            .values()
            .fold(ImpactTotals::ZERO, |acc, p| acc + p.totals)
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when nothing was aggregated
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Groups and sums impact results
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Create aggregator
    pub fn new() -> Self {
        Self
    }

    /// Build every summary view from a set of results
    pub fn aggregate(&self, results: &[ImpactResult]) -> ImpactSummaries {
        let mut seen = BTreeSet::new();
        let mut ordered: Vec<Keyed<'_>> = Vec::with_capacity(results.len());
        for result in results {
            if !seen.insert(result.row) {
                log_warn!("Row {} appears more than once, counted once", result.row);
                continue;
            }
            ordered.push(Keyed::new(result));
        }
        ordered.sort_by(Keyed::canonical_cmp);

        let mut summaries = ImpactSummaries::default();
        for keyed in &ordered {
            let result = keyed.result;
            let record = &result.record;
            let totals = result.totals();

            let summary = summaries
                .products
                .entry(record.product_id.clone())
                .or_insert_with(|| ProductSummary {
                    product_id: record.product_id.clone(),
                    product_name: record.product_name.clone(),
                    ..ProductSummary::default()
                });

            summary.totals += totals;
            *summary
                .by_stage
                .entry(keyed.stage.clone())
                .or_insert(ImpactTotals::ZERO) += totals;
            *summary
                .by_material
                .entry(keyed.material.clone())
                .or_insert(ImpactTotals::ZERO) += totals;
            summary.record_count += 1;

            let waste = record.waste_generated_kg.max(0.0);
            summary.end_of_life.recycled_kg += waste * record.recycling_rate.max(0.0);
            summary.end_of_life.landfilled_kg += waste * record.landfill_rate.max(0.0);
            summary.end_of_life.incinerated_kg += waste * record.incineration_rate.max(0.0);

            *summaries.stage_counts.entry(keyed.stage.clone()).or_insert(0) += 1;
        }

        log_debug!(
            "Aggregated {} result(s) into {} product summaries",
            ordered.len(),
            summaries.products.len()
        );
        summaries
    }
}

/// Result with its grouping keys normalized once
struct Keyed<'a> {
    result: &'a ImpactResult,
    stage: String,
    material: String,
}

impl<'a> Keyed<'a> {
    fn new(result: &'a ImpactResult) -> Self {
        Self {
            result,
            stage: normalize_key(&result.record.life_cycle_stage),
            material: normalize_key(&result.record.material_type),
        }
    }

    fn canonical_cmp(a: &Self, b: &Self) -> Ordering {
        let (ra, rb) = (&a.result.record, &b.result.record);
        ra.product_id
            .cmp(&rb.product_id)
            .then_with(|| a.stage.cmp(&b.stage))
            .then_with(|| a.material.cmp(&b.material))
            .then_with(|| a.result.carbon_impact.total_cmp(&b.result.carbon_impact))
            .then_with(|| a.result.energy_impact.total_cmp(&b.result.energy_impact))
            .then_with(|| a.result.water_impact.total_cmp(&b.result.water_impact))
            .then_with(|| ra.waste_generated_kg.total_cmp(&rb.waste_generated_kg))
            .then_with(|| ra.recycling_rate.total_cmp(&rb.recycling_rate))
            .then_with(|| ra.landfill_rate.total_cmp(&rb.landfill_rate))
            .then_with(|| ra.incineration_rate.total_cmp(&rb.incineration_rate))
            .then_with(|| ra.product_name.cmp(&rb.product_name))
    }
}
