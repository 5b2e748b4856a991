//! Pipeline output

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};

use carbonroute_agent::{AgentKind, AgentReport, ExtractionKind, StageInput, TaskRequest};

/// One completed stage in the conversation log
#[derive(Debug, Clone, Serialize)]
pub struct ConversationEntry {
    pub agent: AgentKind,
    pub message: String,
    pub data: Value,
    pub iterations: u32,
    pub extraction: ExtractionKind,
    pub completed_at: DateTime<Local>,
}

impl ConversationEntry {
    pub fn from_report(report: &AgentReport) -> Self {
        Self {
            agent: report.agent,
            message: summarize(report.agent, &report.data),
            data: report.data.clone(),
            iterations: report.iterations,
            extraction: report.extraction,
            completed_at: Local::now(),
        }
    }
}

/// Human-readable line for a stage's output
fn summarize(kind: AgentKind, data: &Value) -> String {
    match kind {
        AgentKind::Route => {
            let count = data["routes_found"].as_array().map_or(0, Vec::len);
            format!("Found {} viable routes", count)
        }
        AgentKind::Carbon => "Analyzed emissions for all routes".to_string(),
        AgentKind::Policy => {
            "Compliance check completed with carbon marketplace recommendations".to_string()
        }
        AgentKind::Optimizer => {
            let best = &data["recommended_route"];
            match best["name"].as_str().or_else(|| best["route_id"].as_str()) {
                Some(name) => format!("Recommended {}", name),
                None => "Recommendation prepared".to_string(),
            }
        }
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub success: bool,
    pub run_id: String,
    /// Final recommendation, or the partial outputs gathered before a failure
    pub recommendation: Value,
    pub agent_conversation: Vec<ConversationEntry>,
    pub request: TaskRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineResult {
    pub(crate) fn succeeded(
        run_id: String,
        request: TaskRequest,
        log: Vec<ConversationEntry>,
        recommendation: Value,
    ) -> Self {
        Self {
            success: true,
            run_id,
            recommendation,
            agent_conversation: log,
            request,
            error: None,
        }
    }

    pub(crate) fn failed(
        run_id: String,
        request: TaskRequest,
        log: Vec<ConversationEntry>,
        partial: &StageInput,
        error: String,
    ) -> Self {
        Self {
            success: false,
            run_id,
            recommendation: combined(partial),
            agent_conversation: log,
            request,
            error: Some(error),
        }
    }

    /// Stages that completed, in order
    pub fn completed_stages(&self) -> Vec<AgentKind> {
        self.agent_conversation.iter().map(|e| e.agent).collect()
    }
}

/// Recommendation when the Optimizer stage is disabled or a stage failed
pub(crate) fn combined(input: &StageInput) -> Value {
    let or_empty = |v: &Option<Value>| v.clone().unwrap_or_else(|| json!({}));
    json!({
        "routes": or_empty(&input.routes),
        "emissions": or_empty(&input.emissions),
        "compliance": or_empty(&input.compliance)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_message_counts_routes() {
        let data = json!({"routes_found": [{}, {}, {}]});
        assert_eq!(summarize(AgentKind::Route, &data), "Found 3 viable routes");
        assert_eq!(summarize(AgentKind::Route, &json!({})), "Found 0 viable routes");
    }

    #[test]
    fn test_optimizer_message_names_route() {
        let named = json!({"recommended_route": {"route_id": "r1", "name": "Rail"}});
        assert_eq!(summarize(AgentKind::Optimizer, &named), "Recommended Rail");

        let bare = json!({"recommended_route": {"route_id": "r1"}});
        assert_eq!(summarize(AgentKind::Optimizer, &bare), "Recommended r1");

        assert_eq!(
            summarize(AgentKind::Optimizer, &json!({"recommended_route": {}})),
            "Recommendation prepared"
        );
    }
}
