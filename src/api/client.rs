//! Blocking HTTP client for the trip-planning backend.

use reqwest::{StatusCode, Url};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::types::*;
use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: sign in again")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Config error: {0}")]
    Config(String),
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("trip_spotlight/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_root().to_string(),
            auth_header: HeaderMap::new(),
        })
    }

    /// Attaches `Authorization: Bearer <token>` to every request.
    pub fn with_token(mut self, token: &str) -> Result<Self, ApiError> {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ApiError::Config(e.to_string()))?;
        self.auth_header.insert(AUTHORIZATION, value);
        Ok(self)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_header.contains_key(AUTHORIZATION)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- route generation ----------------------------------------------------

    pub fn generate_route(
        &self,
        req: &GenerateRouteRequest,
    ) -> Result<GenerateRouteResponse, ApiError> {
        self.post_json(&["api", "generate-route"], req)
    }

    pub fn route_status(&self, job_id: &str) -> Result<RouteStatusResponse, ApiError> {
        self.get_json::<_, ()>(&["api", "route-status", job_id], None)
    }

    pub fn calculate_budget(&self, req: &BudgetRequest) -> Result<BudgetResponse, ApiError> {
        self.post_json(&["api", "calculate-budget"], req)
    }

    // ---- auth, saved routes, sharing ------------------------------------------

    pub fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json(&["api", "auth", "login"], req)
    }

    pub fn save_route(&self, req: &SaveRouteRequest) -> Result<SavedRoute, ApiError> {
        self.post_json(&["api", "routes"], req)
    }

    pub fn share_route(&self, route_id: &str) -> Result<ShareResponse, ApiError> {
        self.post_json(&["api", "routes", route_id, "share"], &serde_json::json!({}))
    }

    pub fn unshare_route(&self, route_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "routes", route_id, "share"])?;
        tracing::debug!(%url, "DELETE");
        let response = self.authed(self.http.delete(url)).send()?;
        check_status(response).map(|_| ())
    }

    // ---- marketplace -----------------------------------------------------------

    pub fn marketplace_routes(&self, query: &MarketplaceQuery) -> Result<MarketplaceList, ApiError> {
        self.get_json(&["api", "marketplace", "routes"], Some(query))
    }

    pub fn publish_route(&self, req: &PublishRequest) -> Result<MarketplaceRoute, ApiError> {
        self.post_json(&["api", "marketplace", "routes"], req)
    }

    pub fn marketplace_route(&self, slug: &str) -> Result<MarketplaceRoute, ApiError> {
        self.get_json::<_, ()>(&["api", "marketplace", "routes", slug], None)
    }

    pub fn clone_route(&self, slug: &str) -> Result<SavedRoute, ApiError> {
        self.post_json(
            &["api", "marketplace", "routes", slug, "clone"],
            &serde_json::json!({}),
        )
    }

    // ---- places ------------------------------------------------------------------

    pub fn city_image(
        &self,
        city: &str,
        country: Option<&str>,
    ) -> Result<CityImageResponse, ApiError> {
        let query = [("city", city), ("country", country.unwrap_or(""))];
        self.get_json(&["api", "places", "city-image"], Some(&query))
    }

    pub fn city_details(&self, req: &CityDetailsRequest) -> Result<CityDetails, ApiError> {
        self.post_json(&["api", "cities", "details"], req)
    }

    // ---- plumbing ----------------------------------------------------------------

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid API URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("API URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments.iter().copied());
        Ok(url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.headers(self.auth_header.clone())
    }

    fn get_json<T, Q>(&self, path: &[&str], query: Option<&Q>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let mut request = self.authed(self.http.get(url));
        if let Some(query) = query {
            request = request.query(query);
        }
        parse_response(request.send()?)
    }

    fn post_json<T, B>(&self, path: &[&str], body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let request = self.authed(self.http.post(url)).json(body);
        parse_response(request.send()?)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let text = response.text().unwrap_or_default();
    Err(status_error(status.as_u16(), &text))
}

fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = check_status(response)?.text()?;
    decode_body(&text)
}

/// Maps a non-2xx body to `ApiError::Status`, preferring the backend's `error` field.
pub(crate) fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    ApiError::Status { status, message }
}

pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Malformed(e.to_string()))
}
