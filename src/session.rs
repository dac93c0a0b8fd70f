//! Client state that survives between commands: sign-in and the last generated route.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::api::types::{GenerateRouteRequest, GeneratedRoute, User};
use crate::store::kv;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const AUTH_USER_KEY: &str = "authUser";
pub const SPOTLIGHT_KEY: &str = "spotlightData";

#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: Option<User>,
}

pub fn save_auth(con: &Connection, token: &str, user: &User) -> Result<()> {
    kv::set(con, AUTH_TOKEN_KEY, token)?;
    kv::set_json(con, AUTH_USER_KEY, user)
}

pub fn load_auth(con: &Connection) -> Result<Option<AuthSession>> {
    let Some(token) = kv::get(con, AUTH_TOKEN_KEY)? else {
        return Ok(None);
    };
    // A damaged user blob should not sign the user out.
    let user = kv::get_json::<User>(con, AUTH_USER_KEY).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable stored user");
        None
    });
    Ok(Some(AuthSession { token, user }))
}

pub fn clear_auth(con: &Connection) -> Result<bool> {
    let had_token = kv::remove(con, AUTH_TOKEN_KEY)?;
    kv::remove(con, AUTH_USER_KEY)?;
    Ok(had_token)
}

/// Hand-off blob between `plan` and `spotlight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightData {
    pub request: GenerateRouteRequest,
    pub route: GeneratedRoute,
    pub generated_at: DateTime<Utc>,
}

pub fn save_spotlight(con: &Connection, data: &SpotlightData) -> Result<()> {
    kv::set_json(con, SPOTLIGHT_KEY, data)
}

pub fn load_spotlight(con: &Connection) -> Result<Option<SpotlightData>> {
    kv::get_json(con, SPOTLIGHT_KEY)
}
