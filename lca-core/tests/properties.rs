//! Property tests for validation, calculation and aggregation

mod common;

use lca_core::{
    ActivityRecord, ActivityTable, Aggregator, ImpactCalculator, LcaEngine, RecordValidator,
};
use proptest::prelude::*;

use common::steel_factors;

fn stage() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "manufacturing",
        "Manufacturing",
        "transportation",
        "End of Life",
        "end-of-life",
    ])
}

fn rates() -> impl Strategy<Value = [f64; 3]> {
    (0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(a, b)| {
        let recycling = a;
        let landfill = (1.0 - recycling) * b;
        let incineration = 1.0 - recycling - landfill;
        [recycling, landfill, incineration.max(0.0)]
    })
}

prop_compose! {
    fn activity_record()(
        product in prop::sample::select(vec!["P001", "P002", "P003"]),
        stage in stage(),
        quantity in 0.0..10_000.0f64,
        energy in 0.0..5_000.0f64,
        distance in 0.0..2_000.0f64,
        waste in 0.0..500.0f64,
        rates in rates(),
        water in 0.0..1_000.0f64,
    ) -> ActivityRecord {
        ActivityRecord {
            product_id: product.to_string(),
            product_name: format!("Product {product}"),
            life_cycle_stage: stage.to_string(),
            material_type: "steel".to_string(),
            quantity_kg: quantity,
            energy_consumption_kwh: energy,
            transport_distance_km: distance,
            transport_mode: "truck".to_string(),
            waste_generated_kg: waste,
            recycling_rate: rates[0],
            landfill_rate: rates[1],
            incineration_rate: rates[2],
            carbon_footprint_kg_co2e: 0.0,
            water_usage_liters: water,
        }
    }
}

proptest! {
    #[test]
    fn prop_generated_tables_validate(records in prop::collection::vec(activity_record(), 0..40)) {
        let table = ActivityTable::from_records(&records);
        prop_assert!(RecordValidator::default().validate(&table));
    }

    #[test]
    fn prop_impacts_are_non_negative(records in prop::collection::vec(activity_record(), 1..40)) {
        let table = ActivityTable::from_records(&records);
        let report = LcaEngine::default().run(&table, &steel_factors()).unwrap();
        prop_assert_eq!(report.results.len(), records.len());
        for result in &report.results {
            prop_assert!(result.carbon_impact >= 0.0);
            prop_assert!(result.energy_impact >= 0.0);
            prop_assert!(result.water_impact >= 0.0);
        }
    }

    #[test]
    fn prop_permutation_does_not_change_summaries(
        (records, order) in prop::collection::vec(activity_record(), 1..30)
            .prop_flat_map(|records| {
                let order: Vec<usize> = (0..records.len()).collect();
                (Just(records), Just(order).prop_shuffle())
            })
    ) {
        let table = ActivityTable::from_records(&records);
        let shuffled = table.reordered(&order);

        let engine = LcaEngine::default();
        let a = engine.run(&table, &steel_factors()).unwrap();
        let b = engine.run(&shuffled, &steel_factors()).unwrap();
        prop_assert_eq!(a.summaries, b.summaries);
    }

    #[test]
    fn prop_single_row_groups_equal_row_impacts(record in activity_record()) {
        let table = ActivityTable::from_records(&[record]);
        let batch = RecordValidator::default().accept(&table).unwrap();
        let outcome = ImpactCalculator::default().calculate(&batch, &steel_factors());
        let summaries = Aggregator::new().aggregate(&outcome.results);

        let result = &outcome.results[0];
        let product = summaries.product(&result.record.product_id).unwrap();
        prop_assert_eq!(product.totals, result.totals());
        prop_assert_eq!(product.by_stage.len(), 1);
        prop_assert_eq!(product.by_material.len(), 1);
    }

    #[test]
    fn prop_lookup_ignores_case(upper in any::<bool>()) {
        let factors = steel_factors();
        let (material, stage) = if upper {
            ("STEEL", "MANUFACTURING")
        } else {
            ("Steel", "Manufacturing")
        };
        prop_assert_eq!(
            factors.lookup(material, stage),
            factors.lookup("steel", "manufacturing")
        );
    }
}
