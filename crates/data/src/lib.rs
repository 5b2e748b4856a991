//! Reference data store
//!
//! Static lookup tables for routes, locations, emission factors,
//! regional regulations and the carbon credit marketplace. Loaded once
//! at startup and shared read-only behind an `Arc`.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

pub mod emissions;
pub mod locations;
pub mod marketplace;
pub mod regulations;
pub mod routes;

pub use emissions::{EmissionFactor, EmissionTables, OffsetPricing};
pub use locations::{Coordinates, Infrastructure, Location, LocationTable};
pub use marketplace::{BulkDiscount, CarbonCredit, Marketplace, MarketplaceStatus};
pub use regulations::{Policy, Region, RegulationTable};
pub use routes::{RouteOption, RouteRecord, RouteTable, Segment};

pub const ROUTES_FILE: &str = "routes.json";
pub const LOCATIONS_FILE: &str = "locations.json";
pub const EMISSIONS_FILE: &str = "emissions.json";
pub const REGULATIONS_FILE: &str = "regulations.json";
pub const MARKETPLACE_FILE: &str = "carbon_marketplace.json";

/// Errors loading reference data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed reference data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DataError {
    /// File the error refers to
    pub fn path(&self) -> &Path {
        match self {
            DataError::Io { path, .. } | DataError::Json { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

/// All reference tables
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub routes: RouteTable,
    pub locations: LocationTable,
    pub emissions: EmissionTables,
    pub regulations: RegulationTable,
    pub marketplace: Marketplace,
}

impl ReferenceData {
    /// Read the five reference files from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        debug!("loading reference data from {:?}", dir);

        let data = Self {
            routes: read_table(dir, ROUTES_FILE)?,
            locations: read_table(dir, LOCATIONS_FILE)?,
            emissions: read_table(dir, EMISSIONS_FILE)?,
            regulations: read_table(dir, REGULATIONS_FILE)?,
            marketplace: read_table(dir, MARKETPLACE_FILE)?,
        };

        info!(
            "reference data loaded: {} route pairs, {} locations, {} regions, {} credits",
            data.routes.routes.len(),
            data.locations.locations.len(),
            data.regulations.regions.len(),
            data.marketplace.available_credits.len()
        );
        Ok(data)
    }

    /// Route record for an exact origin/destination pair
    pub fn find_route(&self, origin: &str, destination: &str) -> Option<&RouteRecord> {
        self.routes.find(origin, destination)
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.locations.get(name)
    }

    /// Known city names, sorted
    pub fn location_names(&self) -> Vec<String> {
        self.locations.locations.keys().cloned().collect()
    }

    pub fn emission_factor(&self, mode: &str) -> Option<&EmissionFactor> {
        self.emissions.emission_factors.get(mode)
    }

    pub fn offset_pricing(&self, quality: &str) -> Option<&OffsetPricing> {
        self.emissions.carbon_offset_pricing.get(quality)
    }

    pub fn region(&self, code: &str) -> Option<&Region> {
        self.regulations.regions.get(code)
    }

    /// Policy by id, searched across every region
    pub fn find_policy(&self, id: &str) -> Option<&Policy> {
        self.regulations.find_policy(id)
    }

    pub fn credit(&self, id: &str) -> Option<&CarbonCredit> {
        self.marketplace.available_credits.iter().find(|c| c.id == id)
    }

    pub fn credits(&self) -> &[CarbonCredit] {
        &self.marketplace.available_credits
    }

    /// First bulk tier whose band contains `quantity_tons`
    pub fn bulk_discount_for(&self, quantity_tons: f64) -> Option<&BulkDiscount> {
        self.marketplace.discount_for(quantity_tons)
    }
}

fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let content = std::fs::read_to_string(&path).map_err(|source| DataError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DataError::Json { path, source })
}
