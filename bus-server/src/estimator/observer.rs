//! Optional instrumentation for estimation calls.

use tracing::debug;

use super::vehicle::DetectedVehicle;

/// Hook notified at each stage of an estimation call.
///
/// All methods default to doing nothing.
pub trait EstimationObserver: Send + Sync {
    /// The arrival index was built: `usable` of `total` samples had an ETA.
    fn index_built(&self, _line: &str, _usable: usize, _total: usize) {}

    /// A vehicle was detected and fully built.
    fn vehicle_detected(&self, _line: &str, _vehicle: &DetectedVehicle) {}

    /// The call finished with `vehicles` detected.
    fn estimation_finished(&self, _line: &str, _vehicles: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EstimationObserver for NoopObserver {}

/// Observer that forwards events to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EstimationObserver for TracingObserver {
    fn index_built(&self, line: &str, usable: usize, total: usize) {
        debug!(line, usable, total, "arrival index built");
    }

    fn vehicle_detected(&self, line: &str, vehicle: &DetectedVehicle) {
        debug!(
            line,
            id = %vehicle.id,
            anchor = %vehicle.anchor_stop_id,
            eta = vehicle.eta_to_anchor_minutes,
            ahead = vehicle.stops_ahead.len(),
            "vehicle detected"
        );
    }

    fn estimation_finished(&self, line: &str, vehicles: usize) {
        debug!(line, vehicles, "estimation finished");
    }
}
