use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::normalize::normalize_text;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A place (city) in a route. Identity is by name within a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
}

impl Waypoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: None,
            description: None,
            activities: Vec::new(),
            themes: Vec::new(),
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates::new(lat, lng));
        self
    }

    pub fn name_norm(&self) -> String {
        normalize_text(&self.name)
    }

    pub fn fmt_short(&self) -> String {
        match self.coordinates {
            Some(c) => format!("{} ({:.4}, {:.4})", self.name, c.lat, c.lng),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentTheme {
    Adventure,
    Culture,
    Food,
    HiddenGems,
    BestOverall,
}

impl AgentTheme {
    pub const ALL: [AgentTheme; 5] = [
        AgentTheme::Adventure,
        AgentTheme::Culture,
        AgentTheme::Food,
        AgentTheme::HiddenGems,
        AgentTheme::BestOverall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentTheme::Adventure => "adventure",
            AgentTheme::Culture => "culture",
            AgentTheme::Food => "food",
            AgentTheme::HiddenGems => "hidden-gems",
            AgentTheme::BestOverall => "best-overall",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentTheme::Adventure => "Adventure",
            AgentTheme::Culture => "Culture",
            AgentTheme::Food => "Food",
            AgentTheme::HiddenGems => "Hidden Gems",
            AgentTheme::BestOverall => "Best Overall",
        }
    }
}

impl fmt::Display for AgentTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        match key.as_str() {
            "adventure" => Ok(AgentTheme::Adventure),
            "culture" => Ok(AgentTheme::Culture),
            "food" => Ok(AgentTheme::Food),
            "hidden-gems" | "hiddengems" => Ok(AgentTheme::HiddenGems),
            "best-overall" | "bestoverall" => Ok(AgentTheme::BestOverall),
            other => Err(format!("unknown agent theme: '{other}'")),
        }
    }
}

/// One themed recommendation as produced by the backend. Never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteVariant {
    pub agent: AgentTheme,
    pub waypoints: Vec<Waypoint>,
}

impl RouteVariant {
    pub fn new(agent: AgentTheme, waypoints: Vec<Waypoint>) -> Self {
        Self { agent, waypoints }
    }
}

/// One recorded edit: the full list before the edit, so undo is exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub agent_index: usize,
    pub previous_waypoints: Vec<Waypoint>,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageSource {
    Wikipedia,
    GooglePlaces,
}

impl ImageSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSource::Wikipedia => "wikipedia",
            ImageSource::GooglePlaces => "google-places",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedImage {
    pub url: String,
    /// Epoch milliseconds of the write.
    pub timestamp: i64,
    pub source: ImageSource,
}
