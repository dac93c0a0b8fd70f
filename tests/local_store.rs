mod common;

use std::collections::BTreeMap;

use crate::common::paris_barcelona;
use trip_spotlight::api::types::{
    AgentResult, BudgetLevel, GenerateRouteRequest, GeneratedRoute, User,
};
use trip_spotlight::api::results::parse_generated;
use trip_spotlight::model::AgentTheme;
use trip_spotlight::session::{self, SpotlightData};
use trip_spotlight::store::{self, kv, status};

#[test]
fn session_and_spotlight_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trip_spotlight.sqlite");

    let variants = paris_barcelona();
    let data = SpotlightData {
        request: GenerateRouteRequest {
            origin: "Paris".into(),
            destination: "Barcelona".into(),
            stops: 3,
            budget: BudgetLevel::Moderate,
            agents: vec![AgentTheme::Food, AgentTheme::Culture],
            night_allocation: BTreeMap::new(),
        },
        route: GeneratedRoute {
            origin: "Paris".into(),
            destination: "Barcelona".into(),
            agent_results: variants
                .iter()
                .map(|v| AgentResult {
                    agent: v.agent.as_str().to_string(),
                    recommendations: serde_json::json!({ "waypoints": v.waypoints }),
                })
                .collect(),
        },
        generated_at: chrono::Utc::now(),
    };

    {
        let con = store::open_store(&path).unwrap();
        session::save_spotlight(&con, &data).unwrap();
        session::save_auth(
            &con,
            "tok-123",
            &User {
                id: "u1".into(),
                email: "ana@example.com".into(),
                name: Some("Ana".into()),
            },
        )
        .unwrap();
    }

    let con = store::open_store(&path).unwrap();
    let loaded = session::load_spotlight(&con).unwrap().expect("spotlight lost");
    let (parsed, errors) = parse_generated(&loaded.route);
    assert!(errors.is_empty());
    assert_eq!(parsed, variants);

    let auth = session::load_auth(&con).unwrap().expect("signed out");
    assert_eq!(auth.token, "tok-123");
    assert_eq!(auth.user.and_then(|u| u.name).as_deref(), Some("Ana"));

    let s = status::inspect(&con).unwrap();
    assert_eq!(s.schema_version.as_deref(), Some("2"));
    assert!(s.has_session && s.has_spotlight);
}

#[test]
fn clearing_images_keeps_other_entries() {
    let con = store::open_in_memory().unwrap();
    kv::set(&con, "cityImage:lyon|france", "{}").unwrap();
    kv::set(&con, "cityImage:nimes|", "{}").unwrap();
    kv::set(&con, session::AUTH_TOKEN_KEY, "tok").unwrap();

    assert_eq!(kv::count_prefix(&con, status::CITY_IMAGE_PREFIX).unwrap(), 2);
    assert_eq!(kv::remove_prefix(&con, status::CITY_IMAGE_PREFIX).unwrap(), 2);
    assert_eq!(kv::count_prefix(&con, status::CITY_IMAGE_PREFIX).unwrap(), 0);
    assert_eq!(kv::get(&con, session::AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
}
