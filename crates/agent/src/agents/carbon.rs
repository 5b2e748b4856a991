use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use carbonroute_data::ReferenceData;
use carbonroute_provider::Provider;

use super::{converse, into_report, Agent};
use crate::context::pretty;
use crate::conversation::LoopSettings;
use crate::extract::empty_with_analysis;
use crate::tools::CarbonToolkit;
use crate::types::{AgentKind, AgentReport, StageInput};
use crate::{AgentError, Result};

const SYSTEM_PROMPT: &str = r#"You are the Carbon Agent, an environmental analyst for freight emissions.

Your job:
- Calculate total CO2 emissions for every route
- Compare emissions across transport modes
- Categorize each route as low, medium or high emission
- Price carbon offsets for each route

Use get_emission_factor, calculate_segment_emissions and get_offset_costs.
Do the arithmetic with the tools, not in your head.

Answer with JSON only, in this shape:
{
  "routes_analyzed": [
    {
      "route_id": "route_id",
      "total_emissions_kg": 450.5,
      "category": "low",
      "breakdown_by_segment": [...],
      "offset_cost_usd": 11.25
    }
  ],
  "analysis": "Your environmental analysis"
}"#;

/// Computes per-route emissions and offset costs
pub struct CarbonAgent {
    provider: Arc<dyn Provider>,
    toolkit: CarbonToolkit,
    settings: LoopSettings,
}

impl CarbonAgent {
    pub fn new(provider: Arc<dyn Provider>, data: Arc<ReferenceData>, settings: LoopSettings) -> Self {
        Self {
            provider,
            toolkit: CarbonToolkit::new(data),
            settings,
        }
    }

    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn task_prompt(input: &StageInput) -> String {
        let payload = json!({
            "routes": input.routes_found(),
            "weight_tons": input.request.weight()
        });
        format!(
            "Analyze the carbon footprint of these routes:\n{}\n\n\
             Use the tools to:\n\
             1. Get the emission factor for each transport mode\n\
             2. Calculate emissions for each segment\n\
             3. Sum total emissions per route\n\
             4. Calculate offset costs\n\
             5. Categorize routes by emission level\n\n\
             Return your analysis as JSON.",
            pretty(&payload)
        )
    }
}

#[async_trait]
impl Agent for CarbonAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Carbon
    }

    async fn execute(&self, input: &StageInput) -> Result<AgentReport> {
        if input.routes.is_none() {
            return Err(AgentError::MissingInput("routes"));
        }

        let task = Self::task_prompt(input);
        let completion = converse(
            self.kind(),
            self.provider.as_ref(),
            &self.toolkit,
            &self.settings,
            SYSTEM_PROMPT,
            &task,
        )
        .await?;

        Ok(into_report(self.kind(), completion, |text| {
            empty_with_analysis("routes_analyzed", text)
        }))
    }
}
