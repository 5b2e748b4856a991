//! Route options between city pairs

use serde::{Deserialize, Serialize};

/// `routes.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn find(&self, origin: &str, destination: &str) -> Option<&RouteRecord> {
        self.routes
            .iter()
            .find(|r| r.origin == origin && r.destination == destination)
    }
}

/// All options for one origin/destination pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub options: Vec<RouteOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    pub base_cost_usd: f64,
    pub transit_days: f64,
    #[serde(default)]
    pub reliability_score: f64,
}

/// One leg of a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub from: String,
    pub to: String,
    pub mode: String,
    pub distance_km: f64,
    #[serde(default)]
    pub transit_days: f64,
}
