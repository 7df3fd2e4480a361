//! Shared fixtures for integration tests
//!
//! Three steel products with one manufacturing row each, plus a factor table
//! covering steel manufacturing, transportation and end-of-life.

#![allow(dead_code)]

use lca_core::{ActivityRecord, ActivityTable, ImpactFactorTable, ImpactFactors};

/// Record with the given identity and quantities, all other fields neutral
pub fn record(product: &str, stage: &str, material: &str, quantity_kg: f64) -> ActivityRecord {
    ActivityRecord {
        product_id: product.to_string(),
        product_name: format!("Product {product}"),
        life_cycle_stage: stage.to_string(),
        material_type: material.to_string(),
        quantity_kg,
        energy_consumption_kwh: 0.0,
        transport_distance_km: 0.0,
        transport_mode: "truck".to_string(),
        waste_generated_kg: 0.0,
        recycling_rate: 1.0,
        landfill_rate: 0.0,
        incineration_rate: 0.0,
        carbon_footprint_kg_co2e: 0.0,
        water_usage_liters: 0.0,
    }
}

/// P001..P003, steel manufacturing, 100/200/300 kg
pub fn sample_records() -> Vec<ActivityRecord> {
    let rows = [
        ("P001", "A", 100.0, 50.0, 10.0, 5.0, [0.8, 0.1, 0.1], 20.0, 100.0),
        ("P002", "B", 200.0, 100.0, 20.0, 10.0, [0.7, 0.2, 0.1], 30.0, 200.0),
        ("P003", "C", 300.0, 150.0, 30.0, 15.0, [0.6, 0.3, 0.1], 40.0, 300.0),
    ];
    rows.iter()
        .map(|&(id, name, qty, energy, dist, waste, rates, carbon, water)| ActivityRecord {
            product_id: id.to_string(),
            product_name: name.to_string(),
            life_cycle_stage: "manufacturing".to_string(),
            material_type: "steel".to_string(),
            quantity_kg: qty,
            energy_consumption_kwh: energy,
            transport_distance_km: dist,
            transport_mode: "truck".to_string(),
            waste_generated_kg: waste,
            recycling_rate: rates[0],
            landfill_rate: rates[1],
            incineration_rate: rates[2],
            carbon_footprint_kg_co2e: carbon,
            water_usage_liters: water,
        })
        .collect()
}

/// Sample records as a table
pub fn sample_table() -> ActivityTable {
    ActivityTable::from_records(&sample_records())
}

/// Steel factors for three stages
pub fn steel_factors() -> ImpactFactorTable {
    ImpactFactorTable::new()
        .with_entry("steel", "manufacturing", ImpactFactors::new(1.8, 20.0, 150.0))
        .and_then(|t| t.with_entry("steel", "transportation", ImpactFactors::new(0.5, 5.0, 30.0)))
        .and_then(|t| t.with_entry("steel", "end-of-life", ImpactFactors::new(0.1, 1.0, 10.0)))
        .expect("fixture factors are valid")
}

/// Same factors as JSON source text
pub const STEEL_FACTORS_JSON: &str = r#"{
    "steel": {
        "manufacturing": {"carbon_impact": 1.8, "energy_impact": 20, "water_impact": 150},
        "transportation": {"carbon_impact": 0.5, "energy_impact": 5, "water_impact": 30},
        "end-of-life": {"carbon_impact": 0.1, "energy_impact": 1, "water_impact": 10}
    }
}"#;
