//! Vehicle position estimation from ETA snapshots.
//!
//! There is no GPS feed. Given the stops of a line in route order and one
//! ETA sample per stop, the estimator decides how many buses are running,
//! places each one between two stops, and lists the stops still ahead of
//! it together with their ETAs.
//!
//! The pipeline is: build an [`ArrivalIndex`], detect anchors (local ETA
//! minima under a ceiling), interpolate a position for each anchor, and
//! project the downstream stops. Everything here is synchronous and pure.

mod arrival_index;
mod config;
mod detect;
mod engine;
mod interpolate;
mod observer;
mod project;
mod vehicle;

pub use arrival_index::ArrivalIndex;
pub use config::{EstimatorConfig, EstimatorConfigError};
pub use detect::{Anchor, detect_anchors};
pub use engine::{Estimator, estimate_vehicle_positions};
pub use interpolate::{interpolate_position, interpolation_ratio};
pub use observer::{EstimationObserver, NoopObserver, TracingObserver};
pub use project::project_downstream;
pub use vehicle::{DetectedVehicle, StopProjection};
