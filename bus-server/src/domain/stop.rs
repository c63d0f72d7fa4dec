//! Stop identity types.

use std::fmt;

use super::geo::Coordinate;

/// Routing-system identity of a stop (the map marker id).
///
/// Used to key display and tooling. Never use it to request arrivals;
/// that is what [`StopCode`] is for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopId(String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Code used to ask the arrival source for a stop's ETA (e.g. `"2711"`).
///
/// Distinct from [`StopId`]: the arrival endpoint rejects marker ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopCode(String);

impl StopCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code is blank (such stops cannot be queried).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stop on a line, in route order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub code: StopCode,
    pub display_name: String,
    /// Alternative-language title, display only.
    pub secondary_name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// 0-based position within the line's stop ordering.
    pub sequence_index: usize,
}

impl Stop {
    /// Create a stop with the required fields; display extras start empty.
    pub fn new(
        id: StopId,
        code: StopCode,
        display_name: impl Into<String>,
        coordinate: Coordinate,
        sequence_index: usize,
    ) -> Self {
        Self {
            id,
            code,
            display_name: display_name.into(),
            secondary_name: String::new(),
            description: String::new(),
            latitude: coordinate.lat,
            longitude: coordinate.lng,
            sequence_index,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
