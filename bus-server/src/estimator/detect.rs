//! Vehicle detection from a single ETA snapshot.
//!
//! Without vehicle identity the only signal that a bus is near stop X is
//! that X's ETA is locally smallest: stops further downstream are measured
//! from increasingly distant points, and stops upstream are waiting for the
//! *next* bus. Each local minimum in the ETA-bearing stops is therefore
//! taken as one vehicle.
//!
//! Only the ETA-bearing stops take part in the comparison; stops without a
//! sample are skipped over rather than breaking the sequence.

use crate::domain::Stop;

use super::arrival_index::ArrivalIndex;

/// A stop chosen as the next stop of a detected vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Index of the anchor stop in the full route-order stop list.
    pub route_index: usize,
    /// ETA at the anchor stop, clamped to be non-negative.
    pub eta_minutes: i32,
}

/// Find the anchor stops for an ordered stop list.
///
/// Anchors come back in route order. ETAs above `ceiling_mins` still act as
/// neighbours but never become anchors. Negative ETAs are clamped to 0.
pub fn detect_anchors(stops: &[Stop], index: &ArrivalIndex, ceiling_mins: i32) -> Vec<Anchor> {
    let with_eta: Vec<(usize, i32)> = stops
        .iter()
        .enumerate()
        .filter_map(|(i, stop)| index.eta_for(&stop.code).map(|eta| (i, eta.max(0))))
        .collect();

    if with_eta.is_empty() {
        return Vec::new();
    }

    let etas: Vec<i32> = with_eta.iter().map(|(_, eta)| *eta).collect();

    local_minima(&etas, ceiling_mins)
        .into_iter()
        .map(|pos| {
            let (route_index, eta_minutes) = with_eta[pos];
            Anchor {
                route_index,
                eta_minutes,
            }
        })
        .collect()
}

/// Positions of the local minima in an ETA sequence.
///
/// A position is a candidate when its value is no greater than either
/// neighbour (a missing neighbour always qualifies) and does not exceed the
/// ceiling. Adjacent candidates necessarily share a value; each run of them
/// is reported once, at its first position.
pub(crate) fn local_minima(etas: &[i32], ceiling_mins: i32) -> Vec<usize> {
    let is_candidate = |i: usize| {
        let value = etas[i];
        value <= ceiling_mins
            && (i == 0 || etas[i - 1] >= value)
            && etas.get(i + 1).is_none_or(|&next| next >= value)
    };

    let mut minima = Vec::new();
    let mut in_run = false;
    for i in 0..etas.len() {
        let candidate = is_candidate(i);
        if candidate && !in_run {
            minima.push(i);
        }
        in_run = candidate;
    }

    minima
}
