use std::sync::Arc;

use async_trait::async_trait;

use carbonroute_data::ReferenceData;
use carbonroute_provider::Provider;

use super::{converse, into_report, Agent};
use crate::conversation::LoopSettings;
use crate::extract::empty_with_analysis;
use crate::tools::RouteToolkit;
use crate::types::{AgentKind, AgentReport, StageInput, TaskRequest};
use crate::Result;

const SYSTEM_PROMPT: &str = r#"You are the Route Agent, a freight logistics planner.

Your job:
- Find the viable route options between the origin and destination
- Compare distance, transit time, base cost and reliability
- Check infrastructure (ports, airports, rail terminals) where it matters
- Prefer multi-modal combinations when they make sense

Use search_routes to look up options and get_location_info to check a city.

Answer with JSON only, in this shape:
{
  "routes_found": [
    {
      "id": "route_id",
      "name": "Route Name",
      "modes": ["sea", "rail"],
      "segments": [...],
      "total_cost_usd": 2000,
      "transit_days": 17,
      "reliability_score": 0.92
    }
  ],
  "analysis": "Your reasoning"
}"#;

/// Finds candidate routes for the request
pub struct RouteAgent {
    provider: Arc<dyn Provider>,
    toolkit: RouteToolkit,
    settings: LoopSettings,
}

impl RouteAgent {
    pub fn new(provider: Arc<dyn Provider>, data: Arc<ReferenceData>, settings: LoopSettings) -> Self {
        Self {
            provider,
            toolkit: RouteToolkit::new(data),
            settings,
        }
    }

    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn task_prompt(request: &TaskRequest) -> String {
        format!(
            "Find shipping routes for:\n\
             Origin: {}\n\
             Destination: {}\n\
             Weight: {} tons\n\
             Priority: {}\n\n\
             Use search_routes to find the available routes, then analyze them.\n\
             Return your findings as JSON.",
            request.origin(),
            request.destination(),
            request.weight(),
            request.priority()
        )
    }
}

#[async_trait]
impl Agent for RouteAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Route
    }

    async fn execute(&self, input: &StageInput) -> Result<AgentReport> {
        let task = Self::task_prompt(&input.request);
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
            empty_with_analysis("routes_found", text)
        }))
    }
}
