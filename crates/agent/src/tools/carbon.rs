//! Carbon agent tools

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use carbonroute_data::ReferenceData;
use carbonroute_provider::{object_schema, Param, Tool};

use super::{lenient_f64, non_negative, round2, ToolError, Toolkit};

#[derive(Debug, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum CarbonTool {
    GetEmissionFactor(ModeArgs),
    CalculateSegmentEmissions(SegmentArgs),
    GetOffsetCosts(OffsetArgs),
}

#[derive(Debug, Deserialize)]
pub struct ModeArgs {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct SegmentArgs {
    pub mode: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub distance_km: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub weight_tons: f64,
}

#[derive(Debug, Deserialize)]
pub struct OffsetArgs {
    #[serde(deserialize_with = "lenient_f64")]
    pub emissions_kg: f64,
    #[serde(default = "default_quality")]
    pub quality: String,
}

fn default_quality() -> String {
    "standard".to_string()
}

/// Emission factors, segment arithmetic and offset pricing
pub struct CarbonToolkit {
    data: Arc<ReferenceData>,
}

impl CarbonToolkit {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    /// kg CO2 for `distance_km` carrying `weight_tons` by `mode`
    pub fn segment_emissions(&self, mode: &str, distance_km: f64, weight_tons: f64) -> Option<f64> {
        self.data
            .emission_factor(mode)
            .map(|f| round2(f.grams_per_ton_km * distance_km * weight_tons / 1000.0))
    }

    /// USD to offset `emissions_kg` at the given quality
    pub fn offset_cost(&self, emissions_kg: f64, quality: &str) -> Option<f64> {
        self.data
            .offset_pricing(quality)
            .map(|p| round2(emissions_kg / 1000.0 * p.usd_per_ton_co2))
    }

    fn calculate_segment(&self, args: SegmentArgs) -> Result<Value, ToolError> {
        const TOOL: &str = "calculate_segment_emissions";
        let distance = non_negative(TOOL, "distance_km", args.distance_km)?;
        let weight = non_negative(TOOL, "weight_tons", args.weight_tons)?;

        let factor = self
            .data
            .emission_factor(&args.mode)
            .ok_or_else(|| ToolError::not_found("Mode not found"))?;

        Ok(json!({
            "mode": args.mode,
            "distance_km": distance,
            "weight_tons": weight,
            "emissions_kg": round2(factor.grams_per_ton_km * distance * weight / 1000.0),
            "emission_factor": factor.grams_per_ton_km
        }))
    }

    fn offset_costs(&self, args: OffsetArgs) -> Result<Value, ToolError> {
        let emissions = non_negative("get_offset_costs", "emissions_kg", args.emissions_kg)?;
        let pricing = self
            .data
            .offset_pricing(&args.quality)
            .ok_or_else(|| ToolError::not_found("Quality level not found"))?;

        Ok(json!({
            "emissions_kg": emissions,
            "quality": args.quality,
            "cost_usd": round2(emissions / 1000.0 * pricing.usd_per_ton_co2),
            "certification": pricing.certification
        }))
    }
}

impl Toolkit for CarbonToolkit {
    type Call = CarbonTool;

    fn definitions(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "get_emission_factor",
                "Get CO2 emission factor for a transport mode",
                object_schema(vec![Param::string(
                    "mode",
                    "Transport mode: sea, rail, truck, or air",
                )]),
            ),
            Tool::new(
                "calculate_segment_emissions",
                "Calculate emissions in kg CO2 for a route segment",
                object_schema(vec![
                    Param::string("mode", "Transport mode"),
                    Param::number("distance_km", "Distance in kilometers"),
                    Param::number("weight_tons", "Cargo weight in tons"),
                ]),
            ),
            Tool::new(
                "get_offset_costs",
                "Get carbon offset cost for emissions",
                object_schema(vec![
                    Param::number("emissions_kg", "Total emissions in kg CO2"),
                    Param::string(
                        "quality",
                        "Offset quality: standard, premium, or verified_gold",
                    )
                    .optional(),
                ]),
            ),
        ]
    }

    fn run(&self, call: CarbonTool) -> Result<Value, ToolError> {
        match call {
            CarbonTool::GetEmissionFactor(args) => self
                .data
                .emission_factor(&args.mode)
                .map(|f| json!(f))
                .ok_or_else(|| ToolError::not_found("Mode not found")),
            CarbonTool::CalculateSegmentEmissions(args) => self.calculate_segment(args),
            CarbonTool::GetOffsetCosts(args) => self.offset_costs(args),
        }
    }
}
