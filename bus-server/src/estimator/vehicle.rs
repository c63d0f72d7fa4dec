//! Output entities of an estimation call.

use crate::domain::{Coordinate, StopCode, StopId};

/// One stop ahead of a detected vehicle, with the ETA relevant to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StopProjection {
    pub stop_id: StopId,
    pub stop_code: StopCode,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `None` when the stop has no usable sample.
    pub eta_minutes: Option<i32>,
}

/// A vehicle inferred from a local minimum in the ETA sequence.
///
/// The id is only unique within a single estimation call; nothing links a
/// vehicle to the one detected on the previous poll.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedVehicle {
    pub id: String,
    pub line: String,
    pub direction: String,
    pub latitude: f64,
    pub longitude: f64,
    pub anchor_stop_id: StopId,
    pub anchor_stop_name: String,
    /// Route-order index of the anchor stop.
    pub anchor_index: usize,
    /// Always `>= 0`.
    pub eta_to_anchor_minutes: i32,
    pub stops_ahead: Vec<StopProjection>,
}

impl DetectedVehicle {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Build a vehicle id of the form `{line}-{direction}-{ordinal}`.
pub(crate) fn vehicle_id(line: &str, direction: &str, ordinal: usize) -> String {
    format!("{line}-{direction}-{ordinal}")
}

/// Normalise an upstream direction label into an id-safe slug.
///
/// `"Berio-Igara"` becomes `"berio-igara"`; a missing or blank label
/// becomes `"unknown"`.
pub(crate) fn direction_tag(hint: Option<&str>) -> String {
    let mut tag = String::new();
    let mut pending_dash = false;

    for c in hint.unwrap_or_default().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !tag.is_empty() {
                tag.push('-');
            }
            pending_dash = false;
            tag.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if tag.is_empty() {
        "unknown".to_string()
    } else {
        tag
    }
}
