//! City metadata

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `locations.json`, keyed by city name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationTable {
    #[serde(default)]
    pub locations: BTreeMap<String, Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub region: String,
    #[serde(default)]
    pub infrastructure: Infrastructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Infrastructure {
    #[serde(default)]
    pub port: bool,
    #[serde(default)]
    pub airport: bool,
    #[serde(default)]
    pub rail_terminal: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}
