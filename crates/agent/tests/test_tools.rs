//! Tests for the Route, Carbon and Policy toolkits over the bundled data

use std::sync::Arc;

use carbonroute_agent::tools::{CarbonToolkit, PolicyToolkit, RouteToolkit, ToolError, Toolkit};
use carbonroute_data::ReferenceData;
use carbonroute_provider::ToolCall;
use serde_json::{json, Value};

fn data() -> Arc<ReferenceData> {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");
    Arc::new(ReferenceData::load(dir).expect("bundled data should load"))
}

fn call(name: &str, args: Value) -> ToolCall {
    ToolCall::new("t1", name, args)
}

// ---- route ----

#[test]
fn test_search_routes_found() {
    let tools = RouteToolkit::new(data());
    let result = tools.dispatch(&call(
        "search_routes",
        json!({"origin": "Shanghai", "destination": "Berlin"}),
    ));

    assert_eq!(result["origin"], "Shanghai");
    assert_eq!(result["destination"], "Berlin");
    assert_eq!(result["options"].as_array().unwrap().len(), 4);
}

#[test]
fn test_search_routes_not_found_echoes_search() {
    let tools = RouteToolkit::new(data());
    let result = tools.dispatch(&call(
        "search_routes",
        json!({"origin": "Mars", "destination": "Berlin"}),
    ));

    assert_eq!(result["error"], "No routes found");
    assert_eq!(
        result["searched"],
        json!({"origin": "Mars", "destination": "Berlin"})
    );
}

#[test]
fn test_get_location_info() {
    let tools = RouteToolkit::new(data());

    let berlin = tools.dispatch(&call("get_location_info", json!({"location": "Berlin"})));
    assert_eq!(berlin["region"], "EU");
    assert_eq!(berlin["infrastructure"]["rail_terminal"], true);

    let missing = tools.dispatch(&call("get_location_info", json!({"location": "Atlantis"})));
    assert_eq!(
        missing,
        json!({"error": "Location not found", "searched": "Atlantis"})
    );
}

#[test]
fn test_route_menu_rejects_other_agents_tools() {
    let tools = RouteToolkit::new(data());
    let err = tools
        .decode(&call("get_emission_factor", json!({"mode": "sea"})))
        .unwrap_err();
    assert_eq!(err, ToolError::UnknownTool("get_emission_factor".into()));
}

#[test]
fn test_route_definitions() {
    let names: Vec<String> = RouteToolkit::new(data())
        .definitions()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, vec!["search_routes", "get_location_info"]);
}

// ---- carbon ----

#[test]
fn test_get_emission_factor() {
    let tools = CarbonToolkit::new(data());

    let sea = tools.dispatch(&call("get_emission_factor", json!({"mode": "sea"})));
    assert_eq!(sea["gCO2_per_ton_km"], 10.0);

    let missing = tools.dispatch(&call("get_emission_factor", json!({"mode": "hyperloop"})));
    assert_eq!(missing, json!({"error": "Mode not found"}));
}

#[test]
fn test_segment_emissions_formula() {
    let tools = CarbonToolkit::new(data());
    let result = tools.dispatch(&call(
        "calculate_segment_emissions",
        json!({"mode": "sea", "distance_km": 20000, "weight_tons": 10}),
    ));

    assert_eq!(result["mode"], "sea");
    assert_eq!(result["emissions_kg"], 2000.0);
    assert_eq!(result["emission_factor"], 10.0);
    assert_eq!(result["distance_km"], 20000.0);
    assert_eq!(result["weight_tons"], 10.0);
}

#[test]
fn test_segment_emissions_rounds_to_two_decimals() {
    let tools = CarbonToolkit::new(data());
    // 62 * 290 * 0.333 / 1000 = 5.98734
    assert_eq!(tools.segment_emissions("truck", 290.0, 0.333), Some(5.99));
    assert_eq!(tools.segment_emissions("air", 8400.0, 10.0), Some(50568.0));
}

#[test]
fn test_segment_emissions_linear_in_distance_and_weight() {
    let tools = CarbonToolkit::new(data());
    for mode in ["sea", "rail", "truck", "air"] {
        let base = tools.segment_emissions(mode, 1000.0, 4.0).unwrap();
        assert_eq!(tools.segment_emissions(mode, 2000.0, 4.0).unwrap(), base * 2.0);
        assert_eq!(tools.segment_emissions(mode, 1000.0, 12.0).unwrap(), base * 3.0);
        assert_eq!(tools.segment_emissions(mode, 0.0, 4.0).unwrap(), 0.0);
    }
}

#[test]
fn test_segment_emissions_accepts_numeric_strings() {
    let tools = CarbonToolkit::new(data());
    let result = tools.dispatch(&call(
        "calculate_segment_emissions",
        json!({"mode": "rail", "distance_km": "700", "weight_tons": " 10 "}),
    ));
    assert_eq!(result["emissions_kg"], 126.0);
}

#[test]
fn test_segment_emissions_bad_arguments() {
    let tools = CarbonToolkit::new(data());

    let missing = tools.dispatch(&call(
        "calculate_segment_emissions",
        json!({"mode": "rail", "distance_km": 700}),
    ));
    assert_eq!(missing["error"], "Invalid arguments");
    assert!(missing["details"].as_str().unwrap().contains("weight_tons"));

    let negative = tools.dispatch(&call(
        "calculate_segment_emissions",
        json!({"mode": "rail", "distance_km": -5, "weight_tons": 1}),
    ));
    assert_eq!(negative["error"], "Invalid arguments");

    let unknown_mode = tools.dispatch(&call(
        "calculate_segment_emissions",
        json!({"mode": "barge", "distance_km": 5, "weight_tons": 1}),
    ));
    assert_eq!(unknown_mode, json!({"error": "Mode not found"}));
}

#[test]
fn test_offset_cost_formula() {
    let tools = CarbonToolkit::new(data());

    let standard = tools.dispatch(&call(
        "get_offset_costs",
        json!({"emissions_kg": 2000, "quality": "standard"}),
    ));
    assert_eq!(standard["cost_usd"], 30.0);
    assert_eq!(standard["certification"], "Verified Carbon Standard (VCS)");

    assert_eq!(tools.offset_cost(2000.0, "premium"), Some(50.0));
    assert_eq!(tools.offset_cost(2179.8, "verified_gold"), Some(98.09));
}

#[test]
fn test_offset_quality_defaults_to_standard() {
    let tools = CarbonToolkit::new(data());
    let result = tools.dispatch(&call("get_offset_costs", json!({"emissions_kg": 1000})));
    assert_eq!(result["quality"], "standard");
    assert_eq!(result["cost_usd"], 15.0);
}

#[test]
fn test_offset_unknown_quality() {
    let tools = CarbonToolkit::new(data());
    let result = tools.dispatch(&call(
        "get_offset_costs",
        json!({"emissions_kg": 1000, "quality": "platinum"}),
    ));
    assert_eq!(result, json!({"error": "Quality level not found"}));
    assert_eq!(tools.offset_cost(1000.0, "platinum"), None);
}

#[test]
fn test_null_arguments_treated_as_empty() {
    let tools = CarbonToolkit::new(data());
    let result = tools.dispatch(&call("get_emission_factor", Value::Null));
    assert_eq!(result["error"], "Invalid arguments");
}

// ---- policy ----

#[test]
fn test_get_location_region() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call("get_location_region", json!({"location": "Berlin"})));
    assert_eq!(
        result,
        json!({"location": "Berlin", "region": "EU", "country": "Germany"})
    );

    let missing = tools.dispatch(&call("get_location_region", json!({"location": "Gotham"})));
    assert_eq!(missing, json!({"error": "Location not found"}));
}

#[test]
fn test_find_regulations_by_region() {
    let tools = PolicyToolkit::new(data());
    let eu = tools.dispatch(&call("find_regulations_by_region", json!({"region": "EU"})));
    assert_eq!(eu["name"], "European Union");
    assert_eq!(eu["policies"].as_array().unwrap().len(), 3);
    assert_eq!(eu["policies"][0]["type"], "emissions_trading");

    let missing = tools.dispatch(&call("find_regulations_by_region", json!({"region": "MARS"})));
    assert_eq!(missing, json!({"error": "Region not found"}));
}

#[test]
fn test_compliance_threshold_cost() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "check_regulation_compliance",
        json!({
            "regulation_id": "EU_ETS_MARITIME",
            "route_data": {"total_emissions_kg": 2179.8, "modes": ["sea", "truck"], "base_cost_usd": 2100}
        }),
    ));

    assert_eq!(result["regulation_name"], "EU Emissions Trading System (maritime)");
    assert_eq!(result["compliant"], false);
    // (2179.8 - 1000) / 1000 * 85
    assert_eq!(result["costs"]["ets_cost_eur"], 100.28);
    assert_eq!(result["penalties"], json!({}));
    assert_eq!(result["subsidies"], json!({}));
}

#[test]
fn test_compliance_under_threshold() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "check_regulation_compliance",
        json!({"regulation_id": "EU_CBAM", "route_data": {"total_emissions_kg": 2179.8}}),
    ));
    assert_eq!(result["compliant"], true);
    assert_eq!(result["costs"], json!({}));
}

#[test]
fn test_compliance_penalty() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "check_regulation_compliance",
        json!({"regulation_id": "US_CA_LCFS", "route_data": {"total_emissions_kg": "50586.6"}}),
    ));
    assert_eq!(result["compliant"], false);
    assert_eq!(result["penalties"]["penalty_usd"], 8117.32);
    assert_eq!(result["costs"], json!({}));
}

#[test]
fn test_compliance_subsidy_capped() {
    let tools = PolicyToolkit::new(data());

    let small = tools.dispatch(&call(
        "check_regulation_compliance",
        json!({"regulation_id": "EU_GREEN_CORRIDOR",
               "route_data": {"modes": ["sea", "rail"], "base_cost_usd": 2400}}),
    ));
    assert_eq!(small["subsidies"]["green_corridor_eur"], 240.0);
    assert_eq!(small["compliant"], true);

    let large = tools.dispatch(&call(
        "check_regulation_compliance",
        json!({"regulation_id": "EU_GREEN_CORRIDOR",
               "route_data": {"modes": ["rail"], "base_cost_usd": 8000}}),
    ));
    assert_eq!(large["subsidies"]["green_corridor_eur"], 500.0);

    let ineligible = tools.dispatch(&call(
        "check_regulation_compliance",
        json!({"regulation_id": "EU_GREEN_CORRIDOR",
               "route_data": {"modes": ["air"], "base_cost_usd": 38000}}),
    ));
    assert_eq!(ineligible["subsidies"], json!({}));
}

#[test]
fn test_compliance_unknown_regulation() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "check_regulation_compliance",
        json!({"regulation_id": "XX_NONE", "route_data": {}}),
    ));
    assert_eq!(result, json!({"error": "Regulation not found"}));
}

fn ids(result: &Value) -> Vec<String> {
    result["top_recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_marketplace_filters_by_tier() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "query_carbon_marketplace",
        json!({"quantity_tons": 2.18, "quality_preference": "verified_removal"}),
    ));

    assert_eq!(result["credits_found"], 2);
    assert_eq!(ids(&result), vec!["CC-005", "CC-006"]);
    assert_eq!(result["quantity_requested_tons"], 2.18);
    assert_eq!(result["market_status"]["currency"], "USD");
}

#[test]
fn test_marketplace_respects_minimum_quantity() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "query_carbon_marketplace",
        json!({"quantity_tons": 0.5, "quality_preference": "basic"}),
    ));
    assert_eq!(ids(&result), vec!["CC-001"]);
}

#[test]
fn test_marketplace_broadens_when_tier_empty() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "query_carbon_marketplace",
        json!({"quantity_tons": 2, "quality_preference": "gold"}),
    ));

    assert_eq!(result["credits_found"], 6);
    assert_eq!(ids(&result), vec!["CC-005", "CC-006", "CC-004"]);
}

#[test]
fn test_marketplace_default_tier_and_inventory_limit() {
    let tools = PolicyToolkit::new(data());
    // no premium listing holds 5000 t, so every tier is searched
    let result = tools.dispatch(&call("query_carbon_marketplace", json!({"quantity_tons": 5000})));
    assert_eq!(ids(&result), vec!["CC-001", "CC-002"]);
}

#[test]
fn test_credit_cost_with_bulk_discount() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "calculate_credit_cost",
        json!({"credit_id": "CC-003", "quantity_tons": 60}),
    ));

    assert_eq!(result["base_cost_usd"], 1080.0);
    assert_eq!(result["bulk_discount_pct"], 10.0);
    assert_eq!(result["discount_amount_usd"], 108.0);
    assert_eq!(result["final_cost_usd"], 972.0);
    assert_eq!(result["certification"], "Gold Standard");
}

#[test]
fn test_credit_cost_without_discount() {
    let tools = PolicyToolkit::new(data());
    let result = tools.dispatch(&call(
        "calculate_credit_cost",
        json!({"credit_id": "CC-001", "quantity_tons": 5}),
    ));
    assert_eq!(result["bulk_discount_pct"], 0.0);
    assert_eq!(result["final_cost_usd"], 40.0);

    let missing = tools.dispatch(&call(
        "calculate_credit_cost",
        json!({"credit_id": "CC-404", "quantity_tons": 5}),
    ));
    assert_eq!(missing, json!({"error": "Credit not found"}));
}
