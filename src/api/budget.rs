//! Per-variant budgets, requested concurrently; one failure never affects the others.

use rayon::prelude::*;

use crate::api::client::{ApiClient, ApiError};
use crate::api::types::{BudgetBreakdown, BudgetRequest, BudgetResponse, ParsedRoute, TripDetails};
use crate::model::{AgentTheme, RouteVariant};

pub trait BudgetSource {
    fn budget(&self, req: &BudgetRequest) -> Result<BudgetResponse, ApiError>;
}

impl BudgetSource for ApiClient {
    fn budget(&self, req: &BudgetRequest) -> Result<BudgetResponse, ApiError> {
        self.calculate_budget(req)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantBudget {
    Ready {
        agent: AgentTheme,
        breakdown: BudgetBreakdown,
    },
    Unavailable {
        agent: AgentTheme,
        reason: String,
    },
}

impl VariantBudget {
    pub fn agent(&self) -> AgentTheme {
        match self {
            VariantBudget::Ready { agent, .. } | VariantBudget::Unavailable { agent, .. } => *agent,
        }
    }

    pub fn breakdown(&self) -> Option<&BudgetBreakdown> {
        match self {
            VariantBudget::Ready { breakdown, .. } => Some(breakdown),
            VariantBudget::Unavailable { .. } => None,
        }
    }
}

pub fn budget_for_variant<S: BudgetSource + ?Sized>(
    source: &S,
    variant: &RouteVariant,
    details: TripDetails,
) -> VariantBudget {
    let agent = variant.agent;
    let req = BudgetRequest {
        route: ParsedRoute {
            waypoints: variant.waypoints.clone(),
        },
        trip_details: details,
    };

    match source.budget(&req) {
        Ok(BudgetResponse::Breakdown(breakdown)) => VariantBudget::Ready { agent, breakdown },
        Ok(BudgetResponse::Fallback { error, .. }) => VariantBudget::Unavailable {
            agent,
            reason: error,
        },
        Err(e) => {
            tracing::warn!(%agent, error = %e, "budget request failed");
            VariantBudget::Unavailable {
                agent,
                reason: e.to_string(),
            }
        }
    }
}

/// One request per variant, issued in parallel; results keep the input order.
pub fn budgets_for_variants<S: BudgetSource + Sync + ?Sized>(
    source: &S,
    variants: &[RouteVariant],
    details: TripDetails,
) -> Vec<VariantBudget> {
    variants
        .par_iter()
        .map(|v| budget_for_variant(source, v, details))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BudgetCategory, BudgetLevel};
    use crate::model::Waypoint;

    struct ByAgentSize;

    impl BudgetSource for ByAgentSize {
        fn budget(&self, req: &BudgetRequest) -> Result<BudgetResponse, ApiError> {
            match req.route.waypoints.len() {
                0 => Err(ApiError::Status {
                    status: 500,
                    message: "empty route".into(),
                }),
                1 => Ok(BudgetResponse::Fallback {
                    error: "pricing unavailable".into(),
                    fallback: None,
                }),
                n => Ok(BudgetResponse::Breakdown(BudgetBreakdown {
                    currency: Some("EUR".into()),
                    transportation: BudgetCategory { total: 10.0 * n as f64 },
                    accommodation: BudgetCategory::default(),
                    dining: BudgetCategory::default(),
                    activities: BudgetCategory::default(),
                    misc: BudgetCategory::default(),
                    total: None,
                    confidence: None,
                    savings_tips: vec![],
                })),
            }
        }
    }

    fn variant(agent: AgentTheme, n: usize) -> RouteVariant {
        RouteVariant::new(
            agent,
            (0..n).map(|i| Waypoint::new(format!("W{i}"))).collect(),
        )
    }

    #[test]
    fn failures_are_isolated_per_variant() {
        let variants = vec![
            variant(AgentTheme::Adventure, 3),
            variant(AgentTheme::Culture, 0),
            variant(AgentTheme::Food, 1),
            variant(AgentTheme::BestOverall, 2),
        ];
        let details = TripDetails {
            duration: 5,
            travelers: 2,
            budget_level: BudgetLevel::Moderate,
        };

        let out = budgets_for_variants(&ByAgentSize, &variants, details);

        let agents: Vec<_> = out.iter().map(VariantBudget::agent).collect();
        assert_eq!(
            agents,
            [
                AgentTheme::Adventure,
                AgentTheme::Culture,
                AgentTheme::Food,
                AgentTheme::BestOverall
            ]
        );
        assert_eq!(out[0].breakdown().unwrap().grand_total(), 30.0);
        assert!(matches!(&out[1], VariantBudget::Unavailable { reason, .. } if reason.contains("empty route")));
        assert!(matches!(&out[2], VariantBudget::Unavailable { reason, .. } if reason == "pricing unavailable"));
        assert_eq!(out[3].breakdown().unwrap().grand_total(), 20.0);
    }
}
