//! Carbon credit marketplace listing

use serde::{Deserialize, Serialize};

/// `carbon_marketplace.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Marketplace {
    #[serde(default)]
    pub marketplace_status: MarketplaceStatus,
    #[serde(default)]
    pub available_credits: Vec<CarbonCredit>,
    #[serde(default)]
    pub bulk_discounts: Vec<BulkDiscount>,
}

impl Marketplace {
    pub fn discount_for(&self, quantity_tons: f64) -> Option<&BulkDiscount> {
        self.bulk_discounts.iter().find(|d| d.contains(quantity_tons))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceStatus {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub average_price_usd: f64,
    #[serde(default)]
    pub total_inventory_tons: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonCredit {
    pub id: String,
    pub name: String,
    pub quality_tier: String,
    pub price_per_ton_usd: f64,
    pub rating: f64,
    pub min_quantity_tons: f64,
    pub inventory_available_tons: f64,
    #[serde(default)]
    pub certification: String,
    #[serde(default)]
    pub co_benefits: Vec<String>,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub location: String,
}

impl CarbonCredit {
    /// Whether an order of `quantity_tons` can be filled from this listing
    pub fn can_fill(&self, quantity_tons: f64) -> bool {
        self.min_quantity_tons <= quantity_tons && self.inventory_available_tons >= quantity_tons
    }
}

/// Discount band, inclusive on both ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BulkDiscount {
    pub min_quantity_tons: f64,
    pub max_quantity_tons: f64,
    pub discount_pct: f64,
}

impl BulkDiscount {
    pub fn contains(&self, quantity_tons: f64) -> bool {
        self.min_quantity_tons <= quantity_tons && quantity_tons <= self.max_quantity_tons
    }
}
