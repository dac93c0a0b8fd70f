//! Turns a generated route into route variants, one agent at a time.

use serde::Deserialize;
use serde_json::Value;

use crate::api::types::{AgentResult, GeneratedRoute};
use crate::model::{AgentTheme, RouteVariant, Waypoint};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{agent}: {reason}")]
pub struct VariantError {
    pub agent: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct Recommendations {
    waypoints: Vec<Waypoint>,
}

fn variant_error(agent: &str, reason: impl Into<String>) -> VariantError {
    VariantError {
        agent: agent.to_string(),
        reason: reason.into(),
    }
}

/// Parses one agent's output. Recommendations may arrive JSON-encoded inside a string.
pub fn parse_agent_result(result: &AgentResult) -> Result<RouteVariant, VariantError> {
    let agent: AgentTheme = result
        .agent
        .parse()
        .map_err(|e: String| variant_error(&result.agent, e))?;

    let decoded;
    let value = match &result.recommendations {
        Value::String(raw) => {
            decoded = serde_json::from_str::<Value>(raw).map_err(|e| {
                variant_error(&result.agent, format!("recommendations are not valid JSON: {e}"))
            })?;
            &decoded
        }
        other => other,
    };

    let recs = Recommendations::deserialize(value).map_err(|e| {
        variant_error(&result.agent, format!("unexpected recommendations shape: {e}"))
    })?;

    if recs.waypoints.is_empty() {
        return Err(variant_error(&result.agent, "no waypoints"));
    }

    Ok(RouteVariant::new(agent, recs.waypoints))
}

/// Usable variants in backend order, plus the agents whose output could not be read.
pub fn parse_generated(route: &GeneratedRoute) -> (Vec<RouteVariant>, Vec<VariantError>) {
    let mut variants = Vec::new();
    let mut errors = Vec::new();

    for result in &route.agent_results {
        match parse_agent_result(result) {
            Ok(v) => variants.push(v),
            Err(e) => {
                tracing::warn!(agent = %e.agent, reason = %e.reason, "skipping unreadable variant");
                errors.push(e);
            }
        }
    }

    (variants, errors)
}
