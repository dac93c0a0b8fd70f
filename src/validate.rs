//! User-input checks run before anything is sent to the backend.

use crate::api::types::GenerateRouteRequest;

pub const MAX_STOPS: u32 = 10;
pub const MAX_TRAVELERS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

fn fail(field: &'static str, message: impl Into<String>) -> Result<(), ValidationError> {
    Err(ValidationError {
        field,
        message: message.into(),
    })
}

pub fn validate_route_request(req: &GenerateRouteRequest) -> Result<(), ValidationError> {
    let origin = req.origin.trim();
    let destination = req.destination.trim();

    if origin.is_empty() {
        return fail("origin", "Please enter a starting city");
    }
    if destination.is_empty() {
        return fail("destination", "Please enter a destination");
    }
    if origin.eq_ignore_ascii_case(destination) {
        return fail("destination", "Destination must differ from the origin");
    }
    if req.stops == 0 || req.stops > MAX_STOPS {
        return fail("stops", format!("Choose between 1 and {MAX_STOPS} stops"));
    }
    if req.agents.is_empty() {
        return fail("agents", "Select at least one travel theme");
    }
    if let Some((stop, _)) = req.night_allocation.iter().find(|(_, n)| **n == 0) {
        return fail("nights", format!("'{stop}' needs at least one night"));
    }
    Ok(())
}

pub fn validate_trip_details(days: u32, travelers: u32) -> Result<(), ValidationError> {
    if days == 0 {
        return fail("days", "Trip must last at least one day");
    }
    if travelers == 0 || travelers > MAX_TRAVELERS {
        return fail(
            "travelers",
            format!("Travelers must be between 1 and {MAX_TRAVELERS}"),
        );
    }
    Ok(())
}
