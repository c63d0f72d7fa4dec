//! Tuning constants for position estimation.
//!
//! The traversal time and ratio cap are heuristics. Their accuracy against
//! real vehicle positions has not been measured.

/// Errors from building an [`EstimatorConfig`] with out-of-range values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimatorConfigError {
    #[error("ETA ceiling must be non-negative, got {0}")]
    NegativeCeiling(i32),

    #[error("traversal time must be a positive number of minutes, got {0}")]
    InvalidTraversal(f64),

    #[error("ratio cap must be in (0, 1], got {0}")]
    InvalidRatioCap(f64),
}

/// Configuration parameters for the estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// ETAs above this many minutes are never chosen as anchors.
    pub eta_ceiling_mins: i32,

    /// Assumed average time between neighbouring stops (minutes).
    pub traversal_mins: f64,

    /// Maximum fraction of the inter-stop segment a vehicle may be placed
    /// back from its anchor stop.
    pub ratio_cap: f64,
}

impl EstimatorConfig {
    /// Create a new configuration, validating each parameter.
    pub fn new(
        eta_ceiling_mins: i32,
        traversal_mins: f64,
        ratio_cap: f64,
    ) -> Result<Self, EstimatorConfigError> {
        if eta_ceiling_mins < 0 {
            return Err(EstimatorConfigError::NegativeCeiling(eta_ceiling_mins));
        }
        if !(traversal_mins.is_finite() && traversal_mins > 0.0) {
            return Err(EstimatorConfigError::InvalidTraversal(traversal_mins));
        }
        if !(ratio_cap > 0.0 && ratio_cap <= 1.0) {
            return Err(EstimatorConfigError::InvalidRatioCap(ratio_cap));
        }

        Ok(Self {
            eta_ceiling_mins,
            traversal_mins,
            ratio_cap,
        })
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            eta_ceiling_mins: 15,
            traversal_mins: 5.0,
            ratio_cap: 1.0,
        }
    }
}
