use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use carbonroute_provider::Provider;

use super::{converse, into_report, Agent};
use crate::context::pretty;
use crate::conversation::LoopSettings;
use crate::scoring::{build_candidates, score, trade_offs};
use crate::tools::OptimizerToolkit;
use crate::types::{AgentKind, AgentReport, Priority, StageInput};
use crate::{AgentError, Result};

const SYSTEM_PROMPT: &str = r#"You are the Optimizer Agent, responsible for the final route decision.

Your job:
- Combine the route, emissions and compliance findings
- Weight the decision by the user's priority (cost, speed, carbon or balanced)
- Analyze the trade-offs across all routes
- Pick one route and justify it with numbers
- Rank two or three alternatives

Priority meaning:
- cost: lowest total cost including regulatory costs and subsidies
- speed: shortest transit time
- carbon: lowest CO2 emissions
- balanced: all three weighted about equally

score_routes ranks the candidates with the standard weighting;
summarize_trade_offs compares the top route with the rest.

Answer with JSON only, in this shape:
{
  "recommended_route": {
    "route_id": "route_id",
    "name": "Route Name",
    "total_cost_usd": 1900,
    "transit_days": 20,
    "total_emissions_kg": 450,
    "compliance_status": "compliant",
    "score": 0.87,
    "reasoning": "Why this route wins"
  },
  "alternatives": [ ... same shape ... ],
  "trade_off_analysis": {
    "cost_range": {"min": 1900, "max": 8150, "savings_vs_worst": 6250},
    "time_range": {"min": 2, "max": 20, "delay_vs_fastest": 18},
    "emissions_range": {"min": 450, "max": 4200, "reduction_vs_worst_pct": 89.3},
    "key_insights": ["..."]
  },
  "decision_rationale": "Summary of the decision"
}"#;

/// Picks the final route
pub struct OptimizerAgent {
    provider: Arc<dyn Provider>,
    settings: LoopSettings,
}

impl OptimizerAgent {
    pub fn new(provider: Arc<dyn Provider>, settings: LoopSettings) -> Self {
        Self { provider, settings }
    }

    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    /// Toolkit over the joined candidates for this input
    pub fn toolkit_for(input: &StageInput) -> OptimizerToolkit {
        let candidates = build_candidates(
            &input.routes_found(),
            &input.emissions_analyzed(),
            &input.compliance_analyzed(),
        );
        OptimizerToolkit::new(candidates, input.request.priority())
    }

    pub fn task_prompt(toolkit: &OptimizerToolkit, priority: Priority) -> String {
        let mut scored = toolkit.candidates().to_vec();
        score(&mut scored, priority);
        format!(
            "Optimize these routes for priority: {}\n\n\
             ROUTES:\n{}\n\n\
             Tasks:\n\
             1. Recommend the best route for this priority\n\
             2. Rank two or three alternatives\n\
             3. Quantify the cost, time and emission trade-offs\n\
             4. Explain the decision with specific numbers\n\n\
             Return your recommendation as JSON.",
            priority,
            pretty(&json!(scored))
        )
    }

    /// Deterministic recommendation from the weighted ranking
    pub fn fallback(toolkit: &OptimizerToolkit, priority: Priority, rationale: String) -> Value {
        let ranked = toolkit.ranked(priority);
        json!({
            "recommended_route": ranked.first().map_or_else(|| json!({}), |best| json!(best)),
            "alternatives": ranked.iter().skip(1).take(2).collect::<Vec<_>>(),
            "trade_off_analysis": trade_offs(&ranked).map_or_else(|| json!({}), |t| json!(t)),
            "decision_rationale": rationale
        })
    }
}

#[async_trait]
impl Agent for OptimizerAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Optimizer
    }

    async fn execute(&self, input: &StageInput) -> Result<AgentReport> {
        if input.routes.is_none() {
            return Err(AgentError::MissingInput("routes"));
        }

        let priority = input.request.priority();
        let toolkit = Self::toolkit_for(input);
        let task = Self::task_prompt(&toolkit, priority);

        let completion = converse(
            self.kind(),
            self.provider.as_ref(),
            &toolkit,
            &self.settings,
            SYSTEM_PROMPT,
            &task,
        )
        .await?;

        Ok(into_report(self.kind(), completion, |text| {
            Self::fallback(&toolkit, priority, text)
        }))
    }
}
