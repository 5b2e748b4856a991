use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use carbonroute_data::ReferenceData;
use carbonroute_provider::Provider;

use super::{converse, into_report, Agent};
use crate::context::pretty;
use crate::conversation::LoopSettings;
use crate::extract::empty_with_analysis;
use crate::tools::PolicyToolkit;
use crate::types::{AgentKind, AgentReport, StageInput};
use crate::{AgentError, Result};

const SYSTEM_PROMPT: &str = r#"You are the Policy Agent, a trade and environmental compliance specialist.

Your job:
- Identify the regulations that apply at origin and destination
- Check each route against emission thresholds
- Calculate regulatory costs (carbon taxes, ETS allowances, penalties)
- Identify subsidies and incentives the route qualifies for
- Recommend carbon credit purchases for routes over their limits

Carbon credits:
1. Work out the CO2 overage
2. Query the marketplace in the preferred credit tier
3. Calculate the purchase cost, including bulk discounts
4. Include the credit cost in the total compliance cost

Answer with JSON only, in this shape:
{
  "routes_analyzed": [
    {
      "route_id": "route_id",
      "compliance_status": "compliant | non_compliant | compliant_with_offsets",
      "regulations_applicable": [...],
      "regulatory_costs": {...},
      "subsidies_available": {...},
      "carbon_credit_solution": {
        "needed": true,
        "overage_kg": 200,
        "recommended_credit": {...},
        "cost_usd": 5.00,
        "reasoning": "..."
      },
      "total_compliance_cost": 1234.56
    }
  ],
  "analysis": "Your compliance analysis"
}"#;

/// Checks regulations and sources carbon credits
pub struct PolicyAgent {
    provider: Arc<dyn Provider>,
    toolkit: PolicyToolkit,
    settings: LoopSettings,
}

impl PolicyAgent {
    pub fn new(provider: Arc<dyn Provider>, data: Arc<ReferenceData>, settings: LoopSettings) -> Self {
        Self {
            provider,
            toolkit: PolicyToolkit::new(data),
            settings,
        }
    }

    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn task_prompt(input: &StageInput) -> String {
        let priority = input.request.priority();
        let payload = json!({
            "origin": input.request.origin(),
            "destination": input.request.destination(),
            "routes": input.routes_found(),
            "emissions_data": input.emissions.clone().unwrap_or(Value::Null),
            "user_priority": priority,
            "preferred_credit_tier": priority.preferred_credit_tier()
        });
        format!(
            "Analyze regulatory compliance for these routes:\n{}\n\n\
             For each route:\n\
             1. Identify applicable regulations from origin and destination regions\n\
             2. Check compliance with emission limits\n\
             3. Calculate regulatory costs\n\
             4. Identify available subsidies\n\
             5. If the route exceeds limits, query the carbon marketplace and recommend a purchase\n\
             6. Calculate the total compliance cost including credits\n\n\
             Return your analysis as JSON.",
            pretty(&payload)
        )
    }
}

#[async_trait]
impl Agent for PolicyAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Policy
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
