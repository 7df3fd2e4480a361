//! Activity Table Columns
//!
//! One constant per column of an activity record, plus the groups of columns
//! that each validation rule works on. Column order in [`REQUIRED_COLUMNS`]
//! is the order used when a table is built from typed records.

/// Product identifier. Repeats across rows: one product spans several stages.
pub const PRODUCT_ID: &str = "product_id";

/// Human readable product name.
pub const PRODUCT_NAME: &str = "product_name";

/// Life-cycle stage (manufacturing, transportation, use, end-of-life, ...).
pub const LIFE_CYCLE_STAGE: &str = "life_cycle_stage";

/// Material name, matched case-insensitively against the factor table.
pub const MATERIAL_TYPE: &str = "material_type";

/// Mass of material handled in the stage, kg.
pub const QUANTITY_KG: &str = "quantity_kg";

/// Energy consumed in the stage, kWh.
pub const ENERGY_CONSUMPTION_KWH: &str = "energy_consumption_kwh";

/// Transport distance, km.
pub const TRANSPORT_DISTANCE_KM: &str = "transport_distance_km";

/// Transport mode (truck, rail, ship, ...). Informational.
pub const TRANSPORT_MODE: &str = "transport_mode";

/// Waste generated in the stage, kg.
pub const WASTE_GENERATED_KG: &str = "waste_generated_kg";

/// Share of waste recycled, fraction in [0, 1].
pub const RECYCLING_RATE: &str = "recycling_rate";

/// Share of waste sent to landfill, fraction in [0, 1].
pub const LANDFILL_RATE: &str = "landfill_rate";

/// Share of waste incinerated, fraction in [0, 1].
pub const INCINERATION_RATE: &str = "incineration_rate";

/// Carbon footprint supplied with the record, kg CO2e.
pub const CARBON_FOOTPRINT_KG_CO2E: &str = "carbon_footprint_kg_co2e";

/// Water used in the stage, liters.
pub const WATER_USAGE_LITERS: &str = "water_usage_liters";

/// Every column an activity table must carry.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    PRODUCT_ID,
    PRODUCT_NAME,
    LIFE_CYCLE_STAGE,
    MATERIAL_TYPE,
    QUANTITY_KG,
    ENERGY_CONSUMPTION_KWH,
    TRANSPORT_DISTANCE_KM,
    TRANSPORT_MODE,
    WASTE_GENERATED_KG,
    RECYCLING_RATE,
    LANDFILL_RATE,
    INCINERATION_RATE,
    CARBON_FOOTPRINT_KG_CO2E,
    WATER_USAGE_LITERS,
];

/// Columns whose every cell must coerce to a finite number.
pub const NUMERIC_COLUMNS: [&str; 9] = [
    QUANTITY_KG,
    ENERGY_CONSUMPTION_KWH,
    TRANSPORT_DISTANCE_KM,
    WASTE_GENERATED_KG,
    RECYCLING_RATE,
    LANDFILL_RATE,
    INCINERATION_RATE,
    CARBON_FOOTPRINT_KG_CO2E,
    WATER_USAGE_LITERS,
];

/// Physical quantities that cannot be negative.
pub const NON_NEGATIVE_COLUMNS: [&str; 4] = [
    QUANTITY_KG,
    ENERGY_CONSUMPTION_KWH,
    TRANSPORT_DISTANCE_KM,
    WASTE_GENERATED_KG,
];

/// End-of-life allocation fractions. Must sum to one.
pub const RATE_COLUMNS: [&str; 3] = [RECYCLING_RATE, LANDFILL_RATE, INCINERATION_RATE];

/// Text columns that identify a record and cannot be blank.
pub const IDENTIFIER_COLUMNS: [&str; 3] = [PRODUCT_ID, LIFE_CYCLE_STAGE, MATERIAL_TYPE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_columns_are_required() {
        for column in NUMERIC_COLUMNS {
            assert!(REQUIRED_COLUMNS.contains(&column), "{column} not required");
        }
    }

    #[test]
    fn rate_and_non_negative_groups_are_numeric() {
        for column in RATE_COLUMNS.iter().chain(NON_NEGATIVE_COLUMNS.iter()) {
            assert!(NUMERIC_COLUMNS.contains(column));
        }
    }
}
