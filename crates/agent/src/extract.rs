//! Result extraction
//!
//! Turns the model's final reply into structured data with an ordered
//! fallback chain: whole text, then the outermost brace-delimited block,
//! then the raw text.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Which step of the chain produced the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionKind {
    Parsed,
    Recovered,
    Unstructured,
}

/// Outcome of extraction; never an error
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The whole reply was a JSON object
    Parsed(Map<String, Value>),
    /// A JSON object was found embedded in prose
    Recovered(Map<String, Value>),
    /// No usable object; the raw text
    Unstructured(String),
}

impl Extraction {
    pub fn kind(&self) -> ExtractionKind {
        match self {
            Extraction::Parsed(_) => ExtractionKind::Parsed,
            Extraction::Recovered(_) => ExtractionKind::Recovered,
            Extraction::Unstructured(_) => ExtractionKind::Unstructured,
        }
    }

    /// Structured data, using `fallback` to shape unstructured text
    pub fn into_data<F>(self, fallback: F) -> Value
    where
        F: FnOnce(String) -> Value,
    {
        match self {
            Extraction::Parsed(map) | Extraction::Recovered(map) => Value::Object(map),
            Extraction::Unstructured(text) => fallback(text),
        }
    }
}

fn embedded_object() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(r"(?s)\{.*\}") {
            Ok(re) => Some(re),
            Err(e) => {
                debug!("embedded object pattern unavailable: {}", e);
                None
            }
        })
        .as_ref()
}

fn as_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Run the fallback chain over a reply
pub fn extract(text: &str) -> Extraction {
    if let Some(map) = as_object(text.trim()) {
        return Extraction::Parsed(map);
    }

    let recovered = embedded_object()
        .and_then(|re| re.find(text))
        .and_then(|m| as_object(m.as_str()));

    match recovered {
        Some(map) => Extraction::Recovered(map),
        None => Extraction::Unstructured(text.to_string()),
    }
}

/// `{<list_key>: [], analysis: text}`, the shape most agents fall back to
pub fn empty_with_analysis(list_key: &str, text: String) -> Value {
    let mut map = Map::new();
    map.insert(list_key.to_string(), Value::Array(Vec::new()));
    map.insert("analysis".to_string(), Value::String(text));
    Value::Object(map)
}
