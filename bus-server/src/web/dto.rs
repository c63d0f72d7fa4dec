//! Data transfer objects for web responses.
//!
//! Field names follow the JSON the map frontend already consumes
//! (`markerId`, `paradaId`, `stopsWithEta`, ...), so they do not always
//! match the domain names.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::Stop;
use crate::estimator::{DetectedVehicle, StopProjection};
use crate::lines::BusLine;
use crate::tracker::LineSnapshot;

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339
    pub timestamp: String,
}

/// Response for `GET /api/lines`.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: &'static [BusLine],
}

/// Response for `GET /api/lines/{line}/stops`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopsResponse {
    pub line_num: String,
    pub stops: Vec<StopDto>,
}

/// A stop on a line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    /// Marker id (routing and display identity)
    pub marker_id: String,
    /// Stop code used to query arrivals
    pub parada_id: String,
    pub title_es: String,
    pub title_eu: String,
    pub desc_es: String,
    pub lat: f64,
    pub lng: f64,
    pub sequence: usize,
}

/// One stop ahead of a bus.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEtaDto {
    pub marker_id: String,
    pub parada_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub eta_minutes: Option<i32>,
}

/// An estimated bus position.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusPositionDto {
    pub id: String,
    pub line_num: String,
    pub lat: f64,
    pub lng: f64,
    pub direction: String,
    /// The anchor stop: the next stop the bus will reach
    pub next_stop_id: String,
    pub next_stop_name: String,
    pub eta_to_next_stop: i32,
    pub stops_with_eta: Vec<StopEtaDto>,
}

/// Response for `GET /api/lines/{line}/buses`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusesResponse {
    pub line_num: String,
    pub buses: Vec<BusPositionDto>,
    pub stops: Vec<StopDto>,
    /// `[lng, lat]` pairs following the roads (or straight lines)
    pub route_geometry: Vec<[f64; 2]>,
    /// RFC 3339
    pub last_updated: String,
    /// False when the bus list is empty because live arrivals were unavailable
    pub live_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl HealthResponse {
    pub fn ok(now: DateTime<Utc>) -> Self {
        Self {
            status: "ok",
            timestamp: format_timestamp(now),
        }
    }
}

impl StopDto {
    /// Create from a domain Stop.
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            marker_id: stop.id.to_string(),
            parada_id: stop.code.to_string(),
            title_es: stop.display_name.clone(),
            title_eu: stop.secondary_name.clone(),
            desc_es: stop.description.clone(),
            lat: stop.latitude,
            lng: stop.longitude,
            sequence: stop.sequence_index,
        }
    }
}

impl StopEtaDto {
    pub fn from_projection(projection: &StopProjection) -> Self {
        Self {
            marker_id: projection.stop_id.to_string(),
            parada_id: projection.stop_code.to_string(),
            name: projection.display_name.clone(),
            lat: projection.latitude,
            lng: projection.longitude,
            eta_minutes: projection.eta_minutes,
        }
    }
}

impl BusPositionDto {
    /// Create from a detected vehicle.
    pub fn from_vehicle(vehicle: &DetectedVehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            line_num: vehicle.line.clone(),
            lat: vehicle.latitude,
            lng: vehicle.longitude,
            direction: vehicle.direction.clone(),
            next_stop_id: vehicle.anchor_stop_id.to_string(),
            next_stop_name: vehicle.anchor_stop_name.clone(),
            eta_to_next_stop: vehicle.eta_to_anchor_minutes,
            stops_with_eta: vehicle
                .stops_ahead
                .iter()
                .map(StopEtaDto::from_projection)
                .collect(),
        }
    }
}

impl StopsResponse {
    pub fn new(line: &BusLine, stops: &[Stop]) -> Self {
        Self {
            line_num: line.line_num.to_string(),
            stops: stops.iter().map(StopDto::from_stop).collect(),
        }
    }
}

impl BusesResponse {
    /// Create from a line snapshot.
    pub fn from_snapshot(snapshot: &LineSnapshot) -> Self {
        Self {
            line_num: snapshot.line.line_num.to_string(),
            buses: snapshot
                .vehicles
                .iter()
                .map(BusPositionDto::from_vehicle)
                .collect(),
            stops: snapshot.stops.iter().map(StopDto::from_stop).collect(),
            route_geometry: snapshot.route_geometry.to_vec(),
            last_updated: format_timestamp(snapshot.fetched_at),
            live_data: snapshot.live_data,
            warning: snapshot.warning.clone(),
        }
    }
}

fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
