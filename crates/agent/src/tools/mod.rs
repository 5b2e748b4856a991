//! Agent toolkits
//!
//! Each agent offers the model a closed menu of deterministic tools. A raw
//! invocation from the model is decoded once into the agent's tool enum;
//! failures at that boundary become error mappings fed back to the model.

pub mod carbon;
pub mod optimizer;
pub mod policy;
pub mod route;

pub use carbon::{CarbonTool, CarbonToolkit};
pub use optimizer::{OptimizerTool, OptimizerToolkit};
pub use policy::{PolicyTool, PolicyToolkit};
pub use route::{RouteTool, RouteToolkit};

use std::fmt::Debug;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use carbonroute_provider::{Tool, ToolCall};

/// Tool failures; always recovered into the conversation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("{message}")]
    NotFound {
        message: &'static str,
        searched: Option<Value>,
    },
}

impl ToolError {
    pub fn not_found(message: &'static str) -> Self {
        ToolError::NotFound {
            message,
            searched: None,
        }
    }

    pub fn not_found_searching(message: &'static str, searched: Value) -> Self {
        ToolError::NotFound {
            message,
            searched: Some(searched),
        }
    }

    fn invalid(tool: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    /// Error mapping handed back to the model
    pub fn to_mapping(&self) -> Value {
        match self {
            ToolError::UnknownTool(name) => json!({ "error": "Unknown tool", "tool": name }),
            ToolError::InvalidArguments { tool, reason } => json!({
                "error": "Invalid arguments",
                "tool": tool,
                "details": reason
            }),
            ToolError::NotFound {
                message,
                searched: Some(searched),
            } => json!({ "error": message, "searched": searched }),
            ToolError::NotFound { message, .. } => json!({ "error": message }),
        }
    }
}

/// A closed tool menu over shared data
pub trait Toolkit: Send + Sync {
    /// Decoded invocation, one variant per tool
    type Call: DeserializeOwned + Debug;

    /// Schemas offered to the model
    fn definitions(&self) -> Vec<Tool>;

    fn run(&self, call: Self::Call) -> Result<Value, ToolError>;

    /// Decode a raw invocation against this menu
    fn decode(&self, call: &ToolCall) -> Result<Self::Call, ToolError> {
        decode(call, &self.definitions())
    }

    /// Decode and run, folding any error into an error mapping
    fn dispatch(&self, call: &ToolCall) -> Value {
        let outcome = self.decode(call).and_then(|decoded| {
            debug!("running tool {:?}", decoded);
            self.run(decoded)
        });

        match outcome {
            Ok(value) => value,
            Err(e) => {
                warn!("tool {} failed: {}", call.name, e);
                e.to_mapping()
            }
        }
    }
}

/// Decode `{name, arguments}` into a tool enum tagged `tool`/`args`
pub fn decode<C: DeserializeOwned>(call: &ToolCall, menu: &[Tool]) -> Result<C, ToolError> {
    if !menu.iter().any(|t| t.name() == call.name) {
        return Err(ToolError::UnknownTool(call.name.clone()));
    }

    let args = match &call.arguments {
        Value::Null => json!({}),
        other => other.clone(),
    };

    serde_json::from_value(json!({ "tool": call.name, "args": args }))
        .map_err(|e| ToolError::invalid(&call.name, e.to_string()))
}

/// Accept a JSON number or a numeric string
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{}'", s))),
    }
}

/// Reject negative or non-finite quantities
pub(crate) fn non_negative(tool: &str, field: &str, value: f64) -> Result<f64, ToolError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ToolError::invalid(
            tool,
            format!("{} must be a non-negative number, got {}", field, value),
        ))
    }
}

/// Round to two decimals for currency and mass outputs
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Finite number from a JSON value that may be a numeric string
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n: &f64| n.is_finite())
}
