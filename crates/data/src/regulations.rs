//! Regional emission regulations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `regulations.json`, keyed by region code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegulationTable {
    #[serde(default)]
    pub regions: BTreeMap<String, Region>,
}

impl RegulationTable {
    pub fn find_policy(&self, id: &str) -> Option<&Policy> {
        self.regions
            .values()
            .flat_map(|r| r.policies.iter())
            .find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

/// A single regulation; which optional fields are set depends on its type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_tons_co2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_ton_eur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_per_ton_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes_eligible: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsidy_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_subsidy_eur: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Policy {
    pub fn is_subsidy(&self) -> bool {
        self.policy_type == "subsidy"
    }
}
