//! Emission factors and offset pricing

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `emissions.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmissionTables {
    /// Keyed by transport mode
    #[serde(default)]
    pub emission_factors: BTreeMap<String, EmissionFactor>,
    /// Keyed by offset quality
    #[serde(default)]
    pub carbon_offset_pricing: BTreeMap<String, OffsetPricing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionFactor {
    #[serde(rename = "gCO2_per_ton_km")]
    pub grams_per_ton_km: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetPricing {
    pub usd_per_ton_co2: f64,
    #[serde(default)]
    pub certification: String,
    #[serde(default)]
    pub description: String,
}
