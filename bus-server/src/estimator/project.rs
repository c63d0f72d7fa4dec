//! Stops-ahead projection for a detected vehicle.

use crate::domain::Stop;

use super::arrival_index::ArrivalIndex;
use super::vehicle::StopProjection;

/// Every stop from `anchor_index` to the end of the route, with its ETA.
///
/// Stops before the anchor are never included: their samples describe a
/// different vehicle.
pub fn project_downstream(
    stops: &[Stop],
    anchor_index: usize,
    index: &ArrivalIndex,
) -> Vec<StopProjection> {
    stops
        .get(anchor_index..)
        .unwrap_or_default()
        .iter()
        .map(|stop| StopProjection {
            stop_id: stop.id.clone(),
            stop_code: stop.code.clone(),
            display_name: stop.display_name.clone(),
            latitude: stop.latitude,
            longitude: stop.longitude,
            eta_minutes: index.eta_for(&stop.code),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArrivalSample, Coordinate, StopCode, StopId};

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

    #[test]
    fn starts_at_anchor_and_runs_to_end() {
        let stops = stops(5);
        let samples = vec![
            ArrivalSample::new(StopCode::new("p0"), Some(12)),
            ArrivalSample::new(StopCode::new("p2"), Some(3)),
            ArrivalSample::new(StopCode::new("p4"), Some(9)),
        ];
        let index = ArrivalIndex::from_samples(&samples);

        let ahead = project_downstream(&stops, 2, &index);

        let ids: Vec<_> = ahead.iter().map(|p| p.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m3", "m4"]);
        let etas: Vec<_> = ahead.iter().map(|p| p.eta_minutes).collect();
        assert_eq!(etas, vec![Some(3), None, Some(9)]);
    }

    #[test]
    fn carries_both_identities() {
        let stops = stops(2);
        let ahead = project_downstream(&stops, 1, &ArrivalIndex::default());

        assert_eq!(ahead.len(), 1);
        assert_eq!(ahead[0].stop_id, StopId::new("m1"));
        assert_eq!(ahead[0].stop_code, StopCode::new("p1"));
        assert_eq!(ahead[0].display_name, "Stop 1");
    }

    #[test]
    fn anchor_past_end_is_empty() {
        let stops = stops(3);
        assert!(project_downstream(&stops, 3, &ArrivalIndex::default()).is_empty());
        assert!(project_downstream(&stops, 10, &ArrivalIndex::default()).is_empty());
    }
}
