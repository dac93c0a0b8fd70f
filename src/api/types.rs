//! Request and response shapes of the trip-planning backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::model::{AgentTheme, RouteVariant, Waypoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Budget,
    Moderate,
    Luxury,
}

impl BudgetLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetLevel::Budget => "budget",
            BudgetLevel::Moderate => "moderate",
            BudgetLevel::Luxury => "luxury",
        }
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "budget" => Ok(BudgetLevel::Budget),
            "moderate" | "mid" | "mid-range" => Ok(BudgetLevel::Moderate),
            "luxury" => Ok(BudgetLevel::Luxury),
            other => Err(format!("unknown budget level: '{other}'")),
        }
    }
}

// ---- Route generation -------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRouteRequest {
    pub origin: String,
    pub destination: String,
    pub stops: u32,
    pub budget: BudgetLevel,
    pub agents: Vec<AgentTheme>,

    /// Nights per stop name; omitted lets the backend decide.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub night_allocation: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRouteResponse {
    pub job_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobProgress {
    pub total: u32,
    pub completed: u32,
    pub current_agent: Option<String>,
    pub percent_complete: f64,
    /// Seconds.
    pub estimated_time_remaining: Option<f64>,
    pub phase: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStatusResponse {
    pub status: JobStatus,

    #[serde(default)]
    pub progress: Option<JobProgress>,

    #[serde(default)]
    pub route: Option<GeneratedRoute>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Raw per-agent output. `recommendations` is either an object or a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent: String,
    pub recommendations: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRoute {
    pub origin: String,
    pub destination: String,

    #[serde(default)]
    pub agent_results: Vec<AgentResult>,
}

// ---- Budget -----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRoute {
    pub waypoints: Vec<Waypoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    pub duration: u32,
    pub travelers: u32,
    pub budget_level: BudgetLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub route: ParsedRoute,
    pub trip_details: TripDetails,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetCategory {
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    #[serde(default)]
    pub currency: Option<String>,
    pub transportation: BudgetCategory,
    pub accommodation: BudgetCategory,
    pub dining: BudgetCategory,
    pub activities: BudgetCategory,
    #[serde(default)]
    pub misc: BudgetCategory,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub savings_tips: Vec<String>,
}

impl BudgetBreakdown {
    /// Reported total, or the sum of the categories when the backend omits it.
    pub fn grand_total(&self) -> f64 {
        self.total.unwrap_or(
            self.transportation.total
                + self.accommodation.total
                + self.dining.total
                + self.activities.total
                + self.misc.total,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BudgetResponse {
    Breakdown(BudgetBreakdown),
    Fallback {
        error: String,
        #[serde(default)]
        fallback: Option<serde_json::Value>,
    },
}

// ---- Auth, saved routes, sharing --------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRouteRequest {
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub variants: Vec<RouteVariant>,
    /// True when the snapshot contains local edits.
    pub modified: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoute {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub share_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub share_url: String,
}

// ---- Marketplace ------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketplaceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<AgentTheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceRoute {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub clone_count: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub variants: Vec<RouteVariant>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketplaceList {
    pub routes: Vec<MarketplaceRoute>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub route_id: String,
    pub title: String,
    pub description: Option<String>,
}

// ---- Places -----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityImageResponse {
    #[serde(default, alias = "url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityDetailsRequest {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityEvent {
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CityDetails {
    pub city: String,
    pub country: Option<String>,
    pub description: Option<String>,
    pub highlights: Vec<String>,
    pub restaurants: Vec<PlaceSummary>,
    pub accommodations: Vec<PlaceSummary>,
    pub events: Vec<CityEvent>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_response_parses_progress() {
        let raw = r#"{
            "status": "processing",
            "progress": {
                "total": 3, "completed": 1, "currentAgent": "food",
                "percentComplete": 33.3, "estimatedTimeRemaining": 40,
                "phase": "agents"
            }
        }"#;
        let s: RouteStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(s.status, JobStatus::Processing);
        let p = s.progress.unwrap();
        assert_eq!(p.current_agent.as_deref(), Some("food"));
        assert_eq!(p.message, None);
        assert!(s.route.is_none());
    }

    #[test]
    fn budget_response_distinguishes_fallback() {
        let ok = r#"{
            "transportation": {"total": 120.5},
            "accommodation": {"total": 300},
            "dining": {"total": 150},
            "activities": {"total": 80},
            "confidence": "medium",
            "savingsTips": ["Book trains early"]
        }"#;
        match serde_json::from_str::<BudgetResponse>(ok).unwrap() {
            BudgetResponse::Breakdown(b) => {
                assert_eq!(b.grand_total(), 650.5);
                assert_eq!(b.confidence, Some(Confidence::Medium));
            }
            other => panic!("expected breakdown, got {other:?}"),
        }

        let fb = r#"{ "error": "pricing service down", "fallback": true }"#;
        assert!(matches!(
            serde_json::from_str::<BudgetResponse>(fb).unwrap(),
            BudgetResponse::Fallback { .. }
        ));
    }

    #[test]
    fn generate_request_uses_camel_case() {
        let req = GenerateRouteRequest {
            origin: "Paris".into(),
            destination: "Barcelona".into(),
            stops: 3,
            budget: BudgetLevel::Moderate,
            agents: vec![AgentTheme::HiddenGems],
            night_allocation: BTreeMap::new(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["agents"][0], "hidden-gems");
        assert_eq!(v["budget"], "moderate");
        assert!(v.get("nightAllocation").is_none());
    }
}
