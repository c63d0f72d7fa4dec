//! The geometry seam used by the line tracker.

use std::future::Future;

use crate::domain::Stop;

use super::client::OsrmClient;
use super::error::RoutingError;

/// Trait for providing a road polyline through a line's stops.
pub trait GeometrySource: Send + Sync + 'static {
    /// Ordered `[lng, lat]` pairs approximating the road path.
    fn fetch_route(
        &self,
        stops: &[Stop],
    ) -> impl Future<Output = Result<Vec<[f64; 2]>, RoutingError>> + Send;
}

impl GeometrySource for OsrmClient {
    async fn fetch_route(&self, stops: &[Stop]) -> Result<Vec<[f64; 2]>, RoutingError> {
        OsrmClient::fetch_route(self, stops).await
    }
}

/// Geometry source that never leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineGeometry;

impl GeometrySource for StraightLineGeometry {
    async fn fetch_route(&self, stops: &[Stop]) -> Result<Vec<[f64; 2]>, RoutingError> {
        Ok(straight_line(stops))
    }
}

/// Polyline joining the stops directly, in route order.
pub fn straight_line(stops: &[Stop]) -> Vec<[f64; 2]> {
    stops.iter().map(|s| s.coordinate().to_lng_lat()).collect()
}
