//! Request and stage types shared by the agents and the orchestrator

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::extract::ExtractionKind;

/// Rejected task requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("weight must be a positive number of tons, got {0}")]
    InvalidWeight(f64),

    #[error("unknown priority '{0}' (expected cost, speed, carbon or balanced)")]
    UnknownPriority(String),
}

/// What the caller wants optimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Cost,
    Speed,
    Carbon,
    Balanced,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Cost,
        Priority::Speed,
        Priority::Carbon,
        Priority::Balanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Cost => "cost",
            Priority::Speed => "speed",
            Priority::Carbon => "carbon",
            Priority::Balanced => "balanced",
        }
    }

    /// Marketplace tier the Policy agent should favour
    pub fn preferred_credit_tier(self) -> &'static str {
        match self {
            Priority::Cost => "basic",
            Priority::Carbon => "verified_removal",
            Priority::Speed | Priority::Balanced => "premium",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost" => Ok(Priority::Cost),
            "speed" => Ok(Priority::Speed),
            "carbon" => Ok(Priority::Carbon),
            "balanced" => Ok(Priority::Balanced),
            _ => Err(RequestError::UnknownPriority(s.to_string())),
        }
    }
}

/// Wire shape before validation
#[derive(Debug, Deserialize)]
struct RawTaskRequest {
    origin: String,
    destination: String,
    weight: f64,
    priority: String,
}

/// Validated pipeline input; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTaskRequest")]
pub struct TaskRequest {
    origin: String,
    destination: String,
    weight: f64,
    priority: Priority,
}

impl TaskRequest {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        weight: f64,
        priority: Priority,
    ) -> Result<Self, RequestError> {
        let origin = origin.into().trim().to_string();
        let destination = destination.into().trim().to_string();

        if origin.is_empty() {
            return Err(RequestError::EmptyField("origin"));
        }
        if destination.is_empty() {
            return Err(RequestError::EmptyField("destination"));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(RequestError::InvalidWeight(weight));
        }

        Ok(Self {
            origin,
            destination,
            weight,
            priority,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Cargo weight in tons
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

impl TryFrom<RawTaskRequest> for TaskRequest {
    type Error = RequestError;

    fn try_from(raw: RawTaskRequest) -> Result<Self, Self::Error> {
        let priority = raw.priority.parse()?;
        TaskRequest::new(raw.origin, raw.destination, raw.weight, priority)
    }
}

/// Pipeline stage identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Route,
    Carbon,
    Policy,
    Optimizer,
}

impl AgentKind {
    /// Canonical execution order
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Route,
        AgentKind::Carbon,
        AgentKind::Policy,
        AgentKind::Optimizer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Route => "route",
            AgentKind::Carbon => "carbon",
            AgentKind::Policy => "policy",
            AgentKind::Optimizer => "optimizer",
        }
    }

    /// Capitalised name used in user-facing messages
    pub fn title(self) -> &'static str {
        match self {
            AgentKind::Route => "Route",
            AgentKind::Carbon => "Carbon",
            AgentKind::Policy => "Policy",
            AgentKind::Optimizer => "Optimizer",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}

/// Everything an agent may read: the request plus upstream outputs
#[derive(Debug, Clone, Serialize)]
pub struct StageInput {
    pub request: TaskRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<Value>,
}

impl StageInput {
    pub fn new(request: TaskRequest) -> Self {
        Self {
            request,
            routes: None,
            emissions: None,
            compliance: None,
        }
    }

    /// Record a stage's structured output for the stages after it
    pub fn record(&mut self, kind: AgentKind, data: Value) {
        match kind {
            AgentKind::Route => self.routes = Some(data),
            AgentKind::Carbon => self.emissions = Some(data),
            AgentKind::Policy => self.compliance = Some(data),
            AgentKind::Optimizer => {}
        }
    }

    /// `routes_found` from the Route stage
    pub fn routes_found(&self) -> Vec<Value> {
        list_field(self.routes.as_ref(), "routes_found")
    }

    /// `routes_analyzed` from the Carbon stage
    pub fn emissions_analyzed(&self) -> Vec<Value> {
        list_field(self.emissions.as_ref(), "routes_analyzed")
    }

    /// `routes_analyzed` from the Policy stage
    pub fn compliance_analyzed(&self) -> Vec<Value> {
        list_field(self.compliance.as_ref(), "routes_analyzed")
    }
}

fn list_field(data: Option<&Value>, key: &str) -> Vec<Value> {
    data.and_then(|d| d.get(key))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Successful agent run
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub agent: AgentKind,
    pub data: Value,
    pub raw_response: String,
    /// Model calls made
    pub iterations: u32,
    pub extraction: ExtractionKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_request_trims_and_validates() {
        let req = TaskRequest::new("  Shanghai ", "Berlin", 10.0, Priority::Carbon).unwrap();
        assert_eq!(req.origin(), "Shanghai");
        assert_eq!(req.weight(), 10.0);

        assert_eq!(
            TaskRequest::new(" ", "Berlin", 1.0, Priority::Cost),
            Err(RequestError::EmptyField("origin"))
        );
        assert_eq!(
            TaskRequest::new("A", "", 1.0, Priority::Cost),
            Err(RequestError::EmptyField("destination"))
        );
        assert!(TaskRequest::new("A", "B", 0.0, Priority::Cost).is_err());
        assert!(TaskRequest::new("A", "B", -3.0, Priority::Cost).is_err());
        assert!(TaskRequest::new("A", "B", f64::NAN, Priority::Cost).is_err());
    }

    #[test]
    fn test_task_request_deserialize_validates() {
        let ok: TaskRequest = serde_json::from_value(json!({
            "origin": "Shanghai", "destination": "Berlin", "weight": 10, "priority": "carbon"
        }))
        .unwrap();
        assert_eq!(ok.priority(), Priority::Carbon);

        let bad = serde_json::from_value::<TaskRequest>(json!({
            "origin": "Shanghai", "destination": "Berlin", "weight": 10, "priority": "fastest"
        }));
        assert!(bad.unwrap_err().to_string().contains("unknown priority"));

        let bad = serde_json::from_value::<TaskRequest>(json!({
            "origin": "Shanghai", "destination": "Berlin", "weight": -1, "priority": "cost"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_task_request_serializes_flat() {
        let req = TaskRequest::new("Shanghai", "Berlin", 10.0, Priority::Balanced).unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"origin": "Shanghai", "destination": "Berlin", "weight": 10.0, "priority": "balanced"})
        );
    }

    #[test]
    fn test_priority_parse_and_tier() {
        assert_eq!(" Carbon ".parse::<Priority>().unwrap(), Priority::Carbon);
        assert!("cheap".parse::<Priority>().is_err());
        assert_eq!(Priority::Cost.preferred_credit_tier(), "basic");
        assert_eq!(Priority::Carbon.preferred_credit_tier(), "verified_removal");
        assert_eq!(Priority::Balanced.preferred_credit_tier(), "premium");
    }

    #[test]
    fn test_agent_kind_order_and_names() {
        assert!(AgentKind::Route < AgentKind::Optimizer);
        assert_eq!("Policy".parse::<AgentKind>().unwrap(), AgentKind::Policy);
        assert!("weather".parse::<AgentKind>().is_err());
        assert_eq!(AgentKind::Carbon.title(), "Carbon");
        assert_eq!(serde_json::to_value(AgentKind::Route).unwrap(), json!("route"));
    }

    #[test]
    fn test_stage_input_record_and_lists() {
        let req = TaskRequest::new("A", "B", 1.0, Priority::Cost).unwrap();
        let mut input = StageInput::new(req);
        assert!(input.routes_found().is_empty());

        input.record(AgentKind::Route, json!({"routes_found": [{"id": "r1"}]}));
        input.record(AgentKind::Carbon, json!({"routes_analyzed": [{"route_id": "r1"}]}));
        assert_eq!(input.routes_found().len(), 1);
        assert_eq!(input.emissions_analyzed()[0]["route_id"], "r1");
        assert!(input.compliance_analyzed().is_empty());
    }
}
