//! Enabled stage selection

use std::collections::BTreeSet;

use carbonroute_agent::AgentKind;

use crate::{PipelineError, Result};

/// Resolve configured stage names into canonical execution order.
///
/// Names are case-insensitive and may repeat; the Route stage is mandatory
/// because every other stage reads its output.
pub fn resolve_stages<S: AsRef<str>>(names: &[S]) -> Result<Vec<AgentKind>> {
    let kinds = names
        .iter()
        .map(|name| name.as_ref().parse::<AgentKind>())
        .collect::<std::result::Result<BTreeSet<_>, _>>()
        .map_err(PipelineError::Stage)?;

    if !kinds.contains(&AgentKind::Route) {
        return Err(PipelineError::RouteRequired);
    }

    Ok(kinds.into_iter().collect())
}
