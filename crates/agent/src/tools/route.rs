//! Route agent tools

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use carbonroute_data::ReferenceData;
use carbonroute_provider::{object_schema, Param, Tool};

use super::{ToolError, Toolkit};

#[derive(Debug, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum RouteTool {
    SearchRoutes(SearchRoutesArgs),
    GetLocationInfo(LocationArgs),
}

#[derive(Debug, Deserialize)]
pub struct SearchRoutesArgs {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationArgs {
    pub location: String,
}

/// Route search and location lookups
pub struct RouteToolkit {
    data: Arc<ReferenceData>,
}

impl RouteToolkit {
    pub fn new(data: Arc<ReferenceData>) -> Self {
        Self { data }
    }

    fn search_routes(&self, args: SearchRoutesArgs) -> Result<Value, ToolError> {
        match self.data.find_route(&args.origin, &args.destination) {
            Some(record) => {
                debug!(
                    "found {} options {} -> {}",
                    record.options.len(),
                    args.origin,
                    args.destination
                );
                Ok(json!(record))
            }
            None => Err(ToolError::not_found_searching(
                "No routes found",
                json!({ "origin": args.origin, "destination": args.destination }),
            )),
        }
    }

    fn location_info(&self, args: LocationArgs) -> Result<Value, ToolError> {
        self.data
            .location(&args.location)
            .map(|loc| json!(loc))
            .ok_or_else(|| ToolError::not_found_searching("Location not found", json!(args.location)))
    }
}

impl Toolkit for RouteToolkit {
    type Call = RouteTool;

    fn definitions(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "search_routes",
                "Search for available routes between origin and destination",
                object_schema(vec![
                    Param::string("origin", "Origin city name"),
                    Param::string("destination", "Destination city name"),
                ]),
            ),
            Tool::new(
                "get_location_info",
                "Get infrastructure and region details for a location",
                object_schema(vec![Param::string("location", "City name")]),
            ),
        ]
    }

    fn run(&self, call: RouteTool) -> Result<Value, ToolError> {
        match call {
            RouteTool::SearchRoutes(args) => self.search_routes(args),
            RouteTool::GetLocationInfo(args) => self.location_info(args),
        }
    }
}
