//! Product Comparison Example
//!
//! Builds a small activity table for three products, runs the engine and
//! prints the summary views a report would chart.
//!
//! ## What You'll Learn
//!
//! - Loading impact factors from JSON
//! - Running validation, calculation and aggregation in one call
//! - Reading product totals, stage breakdowns and the end-of-life split
//! - Handling rows whose factors are missing
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_product_comparison
//! ```

use lca_core::{
    ActivityRecord, ActivityTable, Dimension, EngineError, ImpactFactorTable, ImpactMetric,
    LcaEngine, RunStatus,
};

const FACTORS: &str = r#"{
    "steel": {
        "manufacturing": {"carbon_impact": 1.8, "energy_impact": 20, "water_impact": 150},
        "transportation": {"carbon_impact": 0.5, "energy_impact": 5, "water_impact": 30},
        "end-of-life": {
            "carbon_impact": 0.1, "energy_impact": 1, "water_impact": 10,
            "routes": {"recycling": 0.02, "landfill": 0.08, "incineration": 0.9}
        }
    },
    "aluminum": {
        "manufacturing": {"carbon_impact": 8.2, "energy_impact": 45, "water_impact": 120},
        "transportation": {"carbon_impact": 0.5, "energy_impact": 5, "water_impact": 30}
    }
}"#;

#[allow(clippy::too_many_arguments)]
fn row(
    product: &str,
    name: &str,
    stage: &str,
    material: &str,
    quantity: f64,
    distance: f64,
    waste: f64,
    rates: [f64; 3],
) -> ActivityRecord {
    ActivityRecord {
        product_id: product.to_string(),
        product_name: name.to_string(),
        life_cycle_stage: stage.to_string(),
        material_type: material.to_string(),
        quantity_kg: quantity,
        energy_consumption_kwh: quantity * 0.5,
        transport_distance_km: distance,
        transport_mode: "truck".to_string(),
        waste_generated_kg: waste,
        recycling_rate: rates[0],
        landfill_rate: rates[1],
        incineration_rate: rates[2],
        carbon_footprint_kg_co2e: 0.0,
        water_usage_liters: 0.0,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("LCA Product Comparison Example");
    println!("==============================\n");

    let factors = ImpactFactorTable::from_json_str(FACTORS)?;
    println!("Loaded {} factor entries\n", factors.len());

    let table = ActivityTable::from_records(&[
        row("P001", "Office Chair", "Manufacturing", "Steel", 12.0, 0.0, 0.0, [0.8, 0.1, 0.1]),
        row("P001", "Office Chair", "Transportation", "Steel", 0.0, 350.0, 0.0, [0.8, 0.1, 0.1]),
        row("P001", "Office Chair", "End of Life", "Steel", 0.0, 0.0, 12.0, [0.8, 0.1, 0.1]),
        row("P002", "Desk Lamp", "Manufacturing", "Aluminum", 1.5, 0.0, 0.0, [0.7, 0.2, 0.1]),
        row("P002", "Desk Lamp", "Transportation", "Aluminum", 0.0, 900.0, 0.0, [0.7, 0.2, 0.1]),
        // No factors for glass: reported, not fatal
        row("P003", "Vase", "Manufacturing", "Glass", 2.0, 0.0, 0.0, [0.6, 0.3, 0.1]),
    ]);

    let report = match LcaEngine::default().run(&table, &factors) {
        Ok(report) => report,
        Err(EngineError::TableRejected { issues, .. }) => {
            for issue in &issues {
                println!("  rejected: {issue}");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Run status: {:?}", report.status);
    if report.status == RunStatus::Partial {
        for diag in &report.diagnostics {
            println!("  row {} ({}) skipped: {}", diag.row, diag.product_id, diag.error);
        }
    }
    println!();

    println!("{:<6} {:<14} {:>12} {:>12} {:>12}", "id", "name", "carbon", "energy", "water");
    for row in report.summaries.comparison() {
        println!(
            "{:<6} {:<14} {:>12.2} {:>12.2} {:>12.2}",
            row.product_id, row.product_name, row.totals.carbon, row.totals.energy, row.totals.water
        );
    }
    println!();

    if let Some(stages) = report.summaries.stage_breakdown("P001") {
        println!("P001 carbon by stage:");
        for (stage, totals) in stages {
            println!("  {:<16} {:>10.3}", stage, totals.carbon);
        }
        println!();
    }

    println!("Carbon by material, all products:");
    for (material, carbon) in report
        .summaries
        .breakdown(ImpactMetric::Carbon, Dimension::Material)
    {
        println!("  {:<16} {:>10.3}", material, carbon);
    }
    println!();

    if let Some(p001) = report.summaries.product("P001") {
        let eol = p001.end_of_life;
        println!(
            "P001 waste: {:.1} kg recycled, {:.1} kg landfilled, {:.1} kg incinerated",
            eol.recycled_kg, eol.landfilled_kg, eol.incinerated_kg
        );
    }

    Ok(())
}
