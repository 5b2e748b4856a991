//! Policy agent tools

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use carbonroute_data::{CarbonCredit, Policy, ReferenceData};
use carbonroute_provider::{object_schema, Param, Tool};

use super::{lenient_f64, non_negative, round2, ToolError, Toolkit};

const TOP_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum PolicyTool {
    GetLocationRegion(LocationArgs),
    FindRegulationsByRegion(RegionArgs),
    CheckRegulationCompliance(ComplianceArgs),
    QueryCarbonMarketplace(MarketplaceArgs),
    CalculateCreditCost(CreditCostArgs),
}

#[derive(Debug, Deserialize)]
pub struct LocationArgs {
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct RegionArgs {
    pub region: String,
}

#[derive(Debug, Deserialize)]
pub struct ComplianceArgs {
    pub regulation_id: String,
    #[serde(default)]
    pub route_data: RouteFacts,
}

/// What a compliance check needs to know about a route
#[derive(Debug, Default, Deserialize)]
pub struct RouteFacts {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_emissions_kg: f64,
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub base_cost_usd: f64,
}

#[derive(Debug, Deserialize)]
pub struct MarketplaceArgs {
    #[serde(deserialize_with = "lenient_f64")]
    pub quantity_tons: f64,
    #[serde(default = "default_tier")]
    pub quality_preference: String,
}

fn default_tier() -> String {
    "premium".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreditCostArgs {
    pub credit_id: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub quantity_tons: f64,
}

/// Regulation checks and carbon credit purchasing
pub struct PolicyToolkit {
    data: Arc<ReferenceData>,
}

impl PolicyToolkit {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    fn location_region(&self, args: LocationArgs) -> Result<Value, ToolError> {
        let location = self
            .data
            .location(&args.location)
            .ok_or_else(|| ToolError::not_found("Location not found"))?;

        Ok(json!({
            "location": args.location,
            "region": location.region,
            "country": location.country
        }))
    }

    fn regulations(&self, args: RegionArgs) -> Result<Value, ToolError> {
        let region = self
            .data
            .region(&args.region)
            .ok_or_else(|| ToolError::not_found("Region not found"))?;
        debug!("{} regulations in {}", region.policies.len(), args.region);
        Ok(json!(region))
    }

    fn check_compliance(&self, args: ComplianceArgs) -> Result<Value, ToolError> {
        let policy = self
            .data
            .find_policy(&args.regulation_id)
            .ok_or_else(|| ToolError::not_found("Regulation not found"))?;

        Ok(compliance_report(policy, &args.route_data))
    }

    fn query_marketplace(&self, args: MarketplaceArgs) -> Result<Value, ToolError> {
        let quantity = non_negative("query_carbon_marketplace", "quantity_tons", args.quantity_tons)?;
        let matches = matching_credits(self.data.credits(), quantity, &args.quality_preference);
        debug!("{} credits match {} t", matches.len(), quantity);

        let top: Vec<&CarbonCredit> = matches.iter().take(TOP_RECOMMENDATIONS).copied().collect();
        Ok(json!({
            "quantity_requested_tons": quantity,
            "credits_found": matches.len(),
            "top_recommendations": top,
            "market_status": self.data.marketplace.marketplace_status
        }))
    }

    fn credit_cost(&self, args: CreditCostArgs) -> Result<Value, ToolError> {
        let quantity = non_negative("calculate_credit_cost", "quantity_tons", args.quantity_tons)?;
        let credit = self
            .data
            .credit(&args.credit_id)
            .ok_or_else(|| ToolError::not_found("Credit not found"))?;

        let base = credit.price_per_ton_usd * quantity;
        let discount_pct = self
            .data
            .bulk_discount_for(quantity)
            .map(|d| d.discount_pct)
            .unwrap_or(0.0);
        let discount = base * discount_pct / 100.0;

        Ok(json!({
            "credit_id": credit.id,
            "credit_name": credit.name,
            "quantity_tons": quantity,
            "price_per_ton_usd": credit.price_per_ton_usd,
            "base_cost_usd": round2(base),
            "bulk_discount_pct": discount_pct,
            "discount_amount_usd": round2(discount),
            "final_cost_usd": round2(base - discount),
            "certification": credit.certification,
            "co_benefits": credit.co_benefits
        }))
    }
}

/// Evaluate one policy against a route
pub fn compliance_report(policy: &Policy, route: &RouteFacts) -> Value {
    let mut compliant = true;
    let mut costs = Map::new();
    let mut penalties = Map::new();
    let mut subsidies = Map::new();

    if let Some(threshold_tons) = policy.threshold_tons_co2 {
        let threshold_kg = threshold_tons * 1000.0;
        if route.total_emissions_kg > threshold_kg {
            compliant = false;
            let overage_tons = (route.total_emissions_kg - threshold_kg) / 1000.0;

            if let Some(rate) = policy.cost_per_ton_eur {
                costs.insert("ets_cost_eur".into(), json!(round2(overage_tons * rate)));
            } else if let Some(rate) = policy.penalty_per_ton_usd {
                penalties.insert("penalty_usd".into(), json!(round2(overage_tons * rate)));
            }
        }
    }

    if policy.is_subsidy()
        && route
            .modes
            .iter()
            .any(|m| policy.modes_eligible.iter().any(|e| e == m))
    {
        let pct = policy.subsidy_percentage.unwrap_or(0.0);
        let subsidy = route.base_cost_usd * pct / 100.0;
        let capped = policy.max_subsidy_eur.map_or(subsidy, |cap| subsidy.min(cap));
        subsidies.insert("green_corridor_eur".into(), json!(round2(capped)));
    }

    json!({
        "regulation_id": policy.id,
        "regulation_name": policy.name,
        "compliant": compliant,
        "costs": costs,
        "penalties": penalties,
        "subsidies": subsidies
    })
}

/// Credits that can fill the order, best first
///
/// Prefers `tier`; when nothing in that tier fits, every tier is considered.
/// Ordered by rating (high first), then price (low first).
pub fn matching_credits<'a>(
    credits: &'a [CarbonCredit],
    quantity_tons: f64,
    tier: &str,
) -> Vec<&'a CarbonCredit> {
    let fillable = || credits.iter().filter(move |c| c.can_fill(quantity_tons));

    let mut found: Vec<&CarbonCredit> = fillable().filter(|c| c.quality_tier == tier).collect();
    if found.is_empty() {
        found = fillable().collect();
    }

    found.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then(
                a.price_per_ton_usd
                    .partial_cmp(&b.price_per_ton_usd)
                    .unwrap_or(Ordering::Equal),
            )
    });
    found
}

impl Toolkit for PolicyToolkit {
    type Call = PolicyTool;

    fn definitions(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "get_location_region",
                "Get the regulatory region for a location",
                object_schema(vec![Param::string("location", "City name")]),
            ),
            Tool::new(
                "find_regulations_by_region",
                "Find all emission regulations for a region",
                object_schema(vec![Param::string("region", "Region code, e.g. EU, US, ASIA")]),
            ),
            Tool::new(
                "check_regulation_compliance",
                "Check whether a route complies with a regulation and compute costs, penalties and subsidies",
                object_schema(vec![
                    Param::string("regulation_id", "Regulation id"),
                    Param::object(
                        "route_data",
                        "Route facts: total_emissions_kg, modes, base_cost_usd",
                    ),
                ]),
            ),
            Tool::new(
                "query_carbon_marketplace",
                "Search the carbon credit marketplace for offsets",
                object_schema(vec![
                    Param::number("quantity_tons", "Tons of CO2 to offset"),
                    Param::string(
                        "quality_preference",
                        "Credit tier: basic, premium, or verified_removal",
                    )
                    .optional(),
                ]),
            ),
            Tool::new(
                "calculate_credit_cost",
                "Calculate the cost of buying credits, including bulk discounts",
                object_schema(vec![
                    Param::string("credit_id", "Marketplace credit id"),
                    Param::number("quantity_tons", "Tons of CO2 to purchase"),
                ]),
            ),
        ]
    }

    fn run(&self, call: PolicyTool) -> Result<Value, ToolError> {
        match call {
            PolicyTool::GetLocationRegion(args) => self.location_region(args),
            PolicyTool::FindRegulationsByRegion(args) => self.regulations(args),
            PolicyTool::CheckRegulationCompliance(args) => self.check_compliance(args),
            PolicyTool::QueryCarbonMarketplace(args) => self.query_marketplace(args),
            PolicyTool::CalculateCreditCost(args) => self.credit_cost(args),
        }
    }
}
