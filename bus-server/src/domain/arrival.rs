//! Arrival samples as reported by the arrival source.

use super::stop::StopCode;

/// A single point-in-time ETA reading for one stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalSample {
    pub stop_code: StopCode,
    /// Minutes until the next vehicle; `None` when no estimate is available.
    pub eta_minutes: Option<i32>,
    /// Destination label reported with the ETA, if any.
    pub direction_hint: Option<String>,
    /// Raw upstream response, kept for diagnostics only.
    pub raw_text: String,
}

impl ArrivalSample {
    pub fn new(stop_code: StopCode, eta_minutes: Option<i32>) -> Self {
        Self {
            stop_code,
            eta_minutes,
            direction_hint: None,
            raw_text: String::new(),
        }
    }

    /// A sample for a stop whose estimate could not be obtained.
    pub fn unavailable(stop_code: StopCode) -> Self {
        Self::new(stop_code, None)
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction_hint = Some(direction.into());
        self
    }

    pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
        self.raw_text = raw.into();
        self
    }

    pub fn has_eta(&self) -> bool {
        self.eta_minutes.is_some()
    }
}
