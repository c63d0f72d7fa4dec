//! Domain types for the bus position estimator.
//!
//! These types are built fresh for every request from upstream data and
//! are read-only to the estimation engine. Stop identities are newtypes so
//! that the routing id and the arrival-lookup code cannot be swapped.

mod arrival;
mod geo;
mod stop;

pub use arrival::ArrivalSample;
pub use geo::{Coordinate, EARTH_RADIUS_KM, haversine_km};
pub use stop::{Stop, StopCode, StopId};
