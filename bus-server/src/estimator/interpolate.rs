//! Placing a detected vehicle between two stops.

use crate::domain::Coordinate;

use super::config::EstimatorConfig;

/// Fraction of the segment back from the anchor stop towards the previous
/// stop, given the ETA at the anchor.
///
/// Always within `[0, config.ratio_cap]`; negative ETAs place the vehicle
/// at the anchor stop.
pub fn interpolation_ratio(eta_minutes: i32, config: &EstimatorConfig) -> f64 {
    let ratio = f64::from(eta_minutes.max(0)) / config.traversal_mins;
    ratio.clamp(0.0, config.ratio_cap)
}

/// Estimated vehicle position for an anchor stop and the stop before it.
///
/// For the first stop on the route pass the anchor as `previous` too; the
/// vehicle then sits on the stop itself.
pub fn interpolate_position(
    anchor: Coordinate,
    previous: Coordinate,
    eta_minutes: i32,
    config: &EstimatorConfig,
) -> Coordinate {
    anchor.lerp(previous, interpolation_ratio(eta_minutes, config))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ratio_never_exceeds_cap(eta in -100i32..1000, cap in 0.05f64..=1.0) {
            let config = EstimatorConfig::new(15, 5.0, cap).unwrap();
            let ratio = interpolation_ratio(eta, &config);
            prop_assert!((0.0..=cap).contains(&ratio));
        }

        #[test]
        fn large_eta_lands_exactly_at_cap(extra in 0i32..500, cap in 0.05f64..=1.0) {
            let config = EstimatorConfig::new(15, 5.0, cap).unwrap();
            let eta = (5.0 * cap).ceil() as i32 + 1 + extra;
            let a = Coordinate::new(43.32, -1.98);
            let p = Coordinate::new(43.31, -1.99);
            prop_assert_eq!(interpolate_position(a, p, eta, &config), a.lerp(p, cap));
        }
    }
}
