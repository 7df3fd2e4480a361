//! Impact Factor Lookup Table
//!
//! ## Motivation
//!
//! Impact factors arrive as a nested mapping, material → stage → metric:
//!
//! ```json
//! {
//!   "steel": {
//!     "manufacturing": {"carbon_impact": 1.8, "energy_impact": 20, "water_impact": 150},
//!     "transportation": {"carbon_impact": 0.5, "energy_impact": 5, "water_impact": 30}
//!   }
//! }
//! ```
//!
//! Source files spell keys inconsistently ("Steel", "End of Life",
//! "end_of_life"). The table flattens the mapping into a composite key
//! (material, stage) and normalizes every key exactly once, on insert and on
//! lookup, so call sites never deal with case or separators.
//!
//! ## Key Normalization
//!
//! ```text
//! "  End of_Life " → "end-of-life"
//! ```
//!
//! Trim, lower-case, and collapse runs of spaces, underscores and hyphens
//! into a single hyphen.
//!
//! ## Missing Keys
//!
//! The table never invents factors. A miss is a [`LookupError`] that says
//! whether the material is unknown or only the stage; the calculator decides
//! what to do with it (see [`crate::calculator::FallbackPolicy`]).
//!
//! ## Disposal Routes
//!
//! End-of-life entries may carry per-route carbon factors
//! ([`RouteFactors`]). When present, end-of-life carbon is weighted by the
//! record's recycling / landfill / incineration shares instead of applying
//! one per-kg factor to all waste.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};

use crate::errors::{FactorTableError, LookupError, LookupResult};
use crate::traits::Validatable;

/// Canonical form of a material or stage key
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.trim().chars() {
        if ch == ' ' || ch == '_' || ch == '-' || ch.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('-');
        }
        pending_separator = false;
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

/// Carbon factors per disposal route, per kg of waste
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteFactors {
    /// Carbon per kg recycled
    pub recycling: f64,
    /// Carbon per kg landfilled
    pub landfill: f64,
    /// Carbon per kg incinerated
    pub incineration: f64,
}

impl RouteFactors {
    /// Carbon per kg of waste split by the given shares
    pub fn weighted(&self, recycling_rate: f64, landfill_rate: f64, incineration_rate: f64) -> f64 {
        self.recycling * recycling_rate
            + self.landfill * landfill_rate
            + self.incineration * incineration_rate
    }
}

/// Per-unit impact multipliers for one (material, stage) pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactFactors {
    /// Carbon per unit of driver
    pub carbon_impact: f64,
    /// Energy per unit of driver
    pub energy_impact: f64,
    /// Water per unit of driver
    pub water_impact: f64,
    /// Optional per-route carbon factors for end-of-life stages
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub routes: Option<RouteFactors>,
}

impl ImpactFactors {
    /// All-zero factors
    pub const ZERO: ImpactFactors = ImpactFactors {
        carbon_impact: 0.0,
        energy_impact: 0.0,
        water_impact: 0.0,
        routes: None,
    };

    /// Create factors without route differentiation
    pub const fn new(carbon_impact: f64, energy_impact: f64, water_impact: f64) -> Self {
        Self {
            carbon_impact,
            energy_impact,
            water_impact,
            routes: None,
        }
    }

    /// Attach per-route carbon factors
    pub fn with_routes(mut self, routes: RouteFactors) -> Self {
        self.routes = Some(routes);
        self
    }

    /// First factor that is negative or not finite, as (metric, value)
    fn invalid_factor(&self) -> Option<(&'static str, f64)> {
        let mut values = alloc::vec![
            ("carbon_impact", self.carbon_impact),
            ("energy_impact", self.energy_impact),
            ("water_impact", self.water_impact),
        ];
        if let Some(routes) = &self.routes {
            values.push(("recycling", routes.recycling));
            values.push(("landfill", routes.landfill));
            values.push(("incineration", routes.incineration));
        }
        values
            .into_iter()
            .find(|(_, value)| !value.is_valid() || *value < 0.0)
    }
}

/// Nested source shape: material → stage → factors
pub type NestedFactors = BTreeMap<String, BTreeMap<String, ImpactFactors>>;

/// Immutable (material, stage) → factors table
///
/// Built once per run and shared read-only by every calculation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactFactorTable {
    entries: BTreeMap<(String, String), ImpactFactors>,
    materials: BTreeSet<String>,
}

impl ImpactFactorTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the nested material → stage → factors mapping
    pub fn load(source: &NestedFactors) -> Result<Self, FactorTableError> {
        let mut table = Self::new();
        for (material, stages) in source {
            for (stage, factors) in stages {
                table.insert(material, stage, *factors)?;
            }
        }
        log_debug!(
            "Loaded {} impact factor entries for {} material(s)",
            table.len(),
            table.materials.len()
        );
        Ok(table)
    }

    /// Parse the nested mapping from JSON text
    #[cfg(all(feature = "serde", feature = "serde_json"))]
    pub fn from_json_str(json: &str) -> Result<Self, FactorTableError> {
        let nested: NestedFactors =
            serde_json::from_str(json).map_err(|e| FactorTableError::Parse(e.to_string()))?;
        Self::load(&nested)
    }

    /// Add one entry
    ///
    /// Rejects blank keys, negative or non-finite factors, and keys that
    /// collide with an existing entry after normalization.
    pub fn insert(
        &mut self,
        material: &str,
        stage: &str,
        factors: ImpactFactors,
    ) -> Result<(), FactorTableError> {
        let material_key = normalize_key(material);
        let stage_key = normalize_key(stage);
        if material_key.is_empty() || stage_key.is_empty() {
            return Err(FactorTableError::EmptyKey);
        }
        if let Some((metric, value)) = factors.invalid_factor() {
            return Err(FactorTableError::InvalidFactor {
                material: material.to_string(),
                stage: stage.to_string(),
                metric,
                value,
            });
        }
        let key = (material_key, stage_key);
        if self.entries.contains_key(&key) {
            return Err(FactorTableError::DuplicateEntry {
                material: key.0,
                stage: key.1,
            });
        }
        self.materials.insert(key.0.clone());
        self.entries.insert(key, factors);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_entry(
        mut self,
        material: &str,
        stage: &str,
        factors: ImpactFactors,
    ) -> Result<Self, FactorTableError> {
        self.insert(material, stage, factors)?;
        Ok(self)
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, material: &str, stage: &str) -> LookupResult<&ImpactFactors> {
        self.lookup_normalized(normalize_key(material), normalize_key(stage))
    }

    /// Lookup with keys already in canonical form
    pub(crate) fn lookup_normalized(
        &self,
        material: String,
        stage: String,
    ) -> LookupResult<&ImpactFactors> {
        if !self.materials.contains(&material) {
            return Err(LookupError::MissingMaterial { material });
        }
        let key = (material, stage);
        match self.entries.get(&key) {
            Some(factors) => Ok(factors),
            None => Err(LookupError::MissingStage {
                material: key.0,
                stage: key.1,
            }),
        }
    }

    /// True when the material has at least one entry
    pub fn contains_material(&self, material: &str) -> bool {
        self.materials.contains(&normalize_key(material))
    }

    /// Known materials, normalized and sorted
    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(String::as_str)
    }

    /// Stages known for a material, normalized and sorted
    pub fn stages<'a>(&'a self, material: &str) -> impl Iterator<Item = &'a str> + 'a {
        let material = normalize_key(material);
        self.entries
            .keys()
            .filter(move |(m, _)| *m == material)
            .map(|(_, stage)| stage.as_str())
    }

    /// Number of (material, stage) entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
