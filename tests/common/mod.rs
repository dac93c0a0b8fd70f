#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::time::Duration;

use trip_spotlight::api::types::{GeneratedRoute, JobStatus, RouteStatusResponse};
use trip_spotlight::api::{ApiError, StatusSource};
use trip_spotlight::clock::Sleeper;
use trip_spotlight::model::{AgentTheme, RouteVariant, Waypoint};

pub fn city(name: &str, lat: f64, lng: f64) -> Waypoint {
    Waypoint::new(name).with_coordinates(lat, lng)
}

/// Paris → Barcelona, three stops per variant, coordinates included.
pub fn paris_barcelona() -> Vec<RouteVariant> {
    vec![
        RouteVariant::new(
            AgentTheme::Food,
            vec![
                city("Lyon", 45.764, 4.8357),
                city("Montpellier", 43.6108, 3.8767),
                city("Girona", 41.9794, 2.8214),
            ],
        ),
        RouteVariant::new(
            AgentTheme::Culture,
            vec![
                city("Dijon", 47.322, 5.0415),
                city("Avignon", 43.9493, 4.8055),
                city("Perpignan", 42.6887, 2.8948),
            ],
        ),
    ]
}

pub fn names(list: &[Waypoint]) -> Vec<&str> {
    list.iter().map(|w| w.name.as_str()).collect()
}

/// Replays scripted responses, then reports "processing" forever.
pub struct ScriptedStatus {
    responses: RefCell<Vec<Result<RouteStatusResponse, ApiError>>>,
    pub calls: Cell<u32>,
}

impl ScriptedStatus {
    pub fn new(mut responses: Vec<Result<RouteStatusResponse, ApiError>>) -> Self {
        responses.reverse();
        Self {
            responses: RefCell::new(responses),
            calls: Cell::new(0),
        }
    }

    pub fn always_processing() -> Self {
        Self::new(Vec::new())
    }
}

impl StatusSource for ScriptedStatus {
    fn status(&self, _job_id: &str) -> Result<RouteStatusResponse, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| Ok(processing()))
    }
}

pub fn processing() -> RouteStatusResponse {
    RouteStatusResponse {
        status: JobStatus::Processing,
        progress: None,
        route: None,
        error: None,
    }
}

pub fn completed(route: GeneratedRoute) -> RouteStatusResponse {
    RouteStatusResponse {
        status: JobStatus::Completed,
        progress: None,
        route: Some(route),
        error: None,
    }
}

/// Records requested sleeps instead of blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl Sleeper for &RecordingSleeper {
    fn sleep(&self, d: Duration) {
        self.sleeps.borrow_mut().push(d);
    }
}
