//! The estimation entry point.

use std::sync::Arc;

use crate::domain::{ArrivalSample, Stop};

use super::arrival_index::ArrivalIndex;
use super::config::EstimatorConfig;
use super::detect::{Anchor, detect_anchors};
use super::interpolate::interpolate_position;
use super::observer::{EstimationObserver, NoopObserver};
use super::project::project_downstream;
use super::vehicle::{DetectedVehicle, direction_tag, vehicle_id};

/// Estimate vehicle positions with the default configuration.
///
/// `stops` must already be in route order. Samples for codes not in
/// `stops` are ignored. Returns an empty list when no sample is usable.
pub fn estimate_vehicle_positions(
    line: &str,
    stops: &[Stop],
    samples: &[ArrivalSample],
) -> Vec<DetectedVehicle> {
    Estimator::default().estimate(line, stops, samples)
}

/// Position estimator.
///
/// Holds only configuration and an observer, so a single instance can be
/// shared between concurrent requests.
#[derive(Clone)]
pub struct Estimator {
    config: EstimatorConfig,
    observer: Arc<dyn EstimationObserver>,
}

impl Estimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Attach an observer to be notified during estimation.
    pub fn with_observer(mut self, observer: impl EstimationObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the vehicles currently running on `line`.
    pub fn estimate(
        &self,
        line: &str,
        stops: &[Stop],
        samples: &[ArrivalSample],
    ) -> Vec<DetectedVehicle> {
        let index = ArrivalIndex::from_samples(samples);
        self.observer.index_built(line, index.len(), samples.len());

        if index.is_empty() {
            self.observer.estimation_finished(line, 0);
            return Vec::new();
        }

        let anchors = detect_anchors(stops, &index, self.config.eta_ceiling_mins);

        let vehicles: Vec<DetectedVehicle> = anchors
            .iter()
            .enumerate()
            .map(|(ordinal, anchor)| {
                let vehicle = self.build_vehicle(line, ordinal, anchor, stops, &index);
                self.observer.vehicle_detected(line, &vehicle);
                vehicle
            })
            .collect();

        self.observer.estimation_finished(line, vehicles.len());
        vehicles
    }

    fn build_vehicle(
        &self,
        line: &str,
        ordinal: usize,
        anchor: &Anchor,
        stops: &[Stop],
        index: &ArrivalIndex,
    ) -> DetectedVehicle {
        let stop = &stops[anchor.route_index];
        let previous = match anchor.route_index.checked_sub(1) {
            Some(i) => &stops[i],
            None => stop,
        };

        let position = interpolate_position(
            stop.coordinate(),
            previous.coordinate(),
            anchor.eta_minutes,
            &self.config,
        );

        let direction = direction_tag(
            index
                .get(&stop.code)
                .and_then(|s| s.direction_hint.as_deref()),
        );

        DetectedVehicle {
            id: vehicle_id(line, &direction, ordinal),
            line: line.to_string(),
            direction,
            latitude: position.lat,
            longitude: position.lng,
            anchor_stop_id: stop.id.clone(),
            anchor_stop_name: stop.display_name.clone(),
            anchor_index: anchor.route_index,
            eta_to_anchor_minutes: anchor.eta_minutes,
            stops_ahead: project_downstream(stops, anchor.route_index, index),
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{Coordinate, StopCode, StopId};

    /// Stops along a straight east-west line, one per 0.001 degrees.
    fn stops(n: usize) -> Vec<Stop> {
        (0..n)
            .map(|i| {
                Stop::new(
                    StopId::new(format!("m{i}")),
                    StopCode::new(format!("p{i}")),
                    format!("Stop {i}"),
                    Coordinate::new(43.30, -1.98 + i as f64 * 0.001),
                    i,
                )
            })
            .collect()
    }

    /// One sample per stop; `None` entries produce samples without an ETA.
    fn samples(etas: &[Option<i32>]) -> Vec<ArrivalSample> {
        etas.iter()
            .enumerate()
            .map(|(i, eta)| ArrivalSample::new(StopCode::new(format!("p{i}")), *eta))
            .collect()
    }

    #[test]
    fn no_usable_samples_yields_nothing() {
        let stops = stops(4);
        assert!(estimate_vehicle_positions("05", &stops, &[]).is_empty());
        assert!(estimate_vehicle_positions("05", &stops, &samples(&[None, None])).is_empty());
    }

    #[test]
    fn no_stops_yields_nothing() {
        let samples = samples(&[Some(3)]);
        assert!(estimate_vehicle_positions("05", &[], &samples).is_empty());
    }

    #[test]
    fn two_vehicles_on_a_line() {
        let stops = stops(5);
        let samples = samples(&[Some(10), Some(4), Some(9), Some(2), Some(11)]);

        let vehicles = estimate_vehicle_positions("33", &stops, &samples);

        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].anchor_stop_id, StopId::new("m1"));
        assert_eq!(vehicles[0].eta_to_anchor_minutes, 4);
        assert_eq!(vehicles[1].anchor_stop_id, StopId::new("m3"));
        assert_eq!(vehicles[1].eta_to_anchor_minutes, 2);
        assert_eq!(vehicles[0].id, "33-unknown-0");
        assert_eq!(vehicles[1].id, "33-unknown-1");
    }

    #[test]
    fn vehicle_is_placed_between_previous_stop_and_anchor() {
        let stops = stops(3);
        let samples = samples(&[Some(9), Some(2), Some(7)]);

        let vehicles = estimate_vehicle_positions("05", &stops, &samples);

        assert_eq!(vehicles.len(), 1);
        let expected = stops[1].coordinate().lerp(stops[0].coordinate(), 0.4);
        assert_eq!(vehicles[0].coordinate(), expected);
        assert_eq!(vehicles[0].anchor_stop_name, "Stop 1");
    }

    #[test]
    fn first_stop_anchor_sits_on_the_stop() {
        let stops = stops(3);
        let samples = samples(&[Some(3), Some(6), Some(8)]);

        let vehicles = estimate_vehicle_positions("05", &stops, &samples);

        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].coordinate(), stops[0].coordinate());
    }

    #[test]
    fn stops_ahead_start_at_anchor() {
        let stops = stops(6);
        let samples = samples(&[Some(12), Some(8), Some(3), None, Some(6), Some(9)]);

        let vehicles = estimate_vehicle_positions("05", &stops, &samples);

        assert_eq!(vehicles.len(), 1);
        let ahead = &vehicles[0].stops_ahead;
        assert_eq!(ahead.len(), stops.len() - 2);
        assert_eq!(ahead[0].stop_id, StopId::new("m2"));
        let etas: Vec<_> = ahead.iter().map(|p| p.eta_minutes).collect();
        assert_eq!(etas, vec![Some(3), None, Some(6), Some(9)]);
    }

    #[test]
    fn direction_comes_from_anchor_sample() {
        let stops = stops(3);
        let samples = vec![
            ArrivalSample::new(StopCode::new("p0"), Some(8)).with_direction("Amara"),
            ArrivalSample::new(StopCode::new("p1"), Some(1)).with_direction("Berio-Igara"),
            ArrivalSample::new(StopCode::new("p2"), Some(5)),
        ];

        let vehicles = estimate_vehicle_positions("33", &stops, &samples);

        assert_eq!(vehicles[0].direction, "berio-igara");
        assert_eq!(vehicles[0].id, "33-berio-igara-0");
        assert_eq!(vehicles[0].line, "33");
    }

    #[test]
    fn all_above_ceiling_yields_nothing() {
        let stops = stops(3);
        let samples = samples(&[Some(20), Some(18), Some(22)]);

        assert!(estimate_vehicle_positions("05", &stops, &samples).is_empty());
    }

    #[test]
    fn custom_ceiling_is_respected() {
        let stops = stops(3);
        let samples = samples(&[Some(12), Some(10), Some(14)]);
        let estimator = Estimator::new(EstimatorConfig::new(8, 5.0, 1.0).unwrap());

        assert!(estimator.estimate("05", &stops, &samples).is_empty());
    }

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl EstimationObserver for Arc<Recording> {
        fn index_built(&self, line: &str, usable: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("index {line} {usable}/{total}"));
        }

        fn vehicle_detected(&self, _line: &str, vehicle: &DetectedVehicle) {
            self.events
                .lock()
                .unwrap()
                .push(format!("vehicle {}", vehicle.id));
        }

        fn estimation_finished(&self, line: &str, vehicles: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {line} {vehicles}"));
        }
    }

    #[test]
    fn observer_sees_each_stage() {
        let recording = Arc::new(Recording::default());
        let estimator = Estimator::default().with_observer(recording.clone());
        let stops = stops(3);
        let samples = samples(&[Some(6), Some(2), None]);

        estimator.estimate("05", &stops, &samples);

        let events = recording.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["index 05 2/3", "vehicle 05-unknown-0", "done 05 1"]
        );
    }

    #[test]
    fn observer_sees_empty_estimation() {
        let recording = Arc::new(Recording::default());
        let estimator = Estimator::default().with_observer(recording.clone());

        estimator.estimate("05", &stops(2), &[]);

        let events = recording.events.lock().unwrap().clone();
        assert_eq!(events, vec!["index 05 0/0", "done 05 0"]);
    }
}
