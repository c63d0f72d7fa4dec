//! Per-line snapshots: stops, live arrivals, estimated vehicles and route.
//!
//! The tracker owns every cache and all the degradation rules, so the web
//! layer only has to map a [`LineSnapshot`] or a [`TrackerError`] to a
//! response. The estimator stays pure; it only ever sees the stops and
//! samples handed to it here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, TtlCache};
use crate::dbus::{DbusError, LineData, TransitSource};
use crate::domain::{ArrivalSample, Stop};
use crate::estimator::{DetectedVehicle, Estimator};
use crate::lines::BusLine;
use crate::routing::{GeometrySource, straight_line};

/// Shown to clients when stops are known but live arrivals are not.
pub const LIVE_DATA_WARNING: &str = "Real-time arrivals are temporarily unavailable";

/// Shown to clients when the line has no stops at all.
pub const NO_STOPS_WARNING: &str = "No stops are published for this line";

/// Errors surfaced by the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Not even a stale stop list is available
    #[error("stops for line {line} are unavailable: {source}")]
    Unavailable { line: String, source: DbusError },
}

/// Everything known about a line right now.
#[derive(Debug, Clone)]
pub struct LineSnapshot {
    pub line: &'static BusLine,
    pub stops: Arc<Vec<Stop>>,
    pub vehicles: Vec<DetectedVehicle>,
    /// `[lng, lat]` pairs.
    pub route_geometry: Arc<Vec<[f64; 2]>>,
    /// False when the vehicle list is empty because arrivals could not be fetched.
    pub live_data: bool,
    pub warning: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Builds line snapshots from a transit source and a geometry source.
pub struct LineTracker<S, G> {
    source: S,
    geometry: G,
    estimator: Estimator,
    /// Keyed by slug.
    line_data: TtlCache<String, LineData>,
    /// Keyed by line number.
    last_stops: TtlCache<String, Arc<Vec<Stop>>>,
    /// Keyed by line number.
    routes: TtlCache<String, Arc<Vec<[f64; 2]>>>,
}

impl<S: TransitSource, G: GeometrySource> LineTracker<S, G> {
    pub fn new(source: S, geometry: G, estimator: Estimator, cache: &CacheConfig) -> Self {
        Self {
            source,
            geometry,
            estimator,
            line_data: TtlCache::new(cache.ttl, cache.max_capacity),
            last_stops: TtlCache::new(cache.fallback_ttl, cache.max_capacity),
            routes: TtlCache::new(cache.ttl, cache.max_capacity),
        }
    }

    /// The line's stops in route order.
    pub async fn stops(&self, line: &'static BusLine) -> Result<Arc<Vec<Stop>>, TrackerError> {
        let data = self.line_data(line).await;
        self.resolve_stops(line, data.as_ref()).await
    }

    /// Stops, estimated vehicles and route geometry for a line.
    ///
    /// Fails only when no stop list, fresh or stale, can be produced. A
    /// failure to get live arrivals yields an empty vehicle list with
    /// `live_data` cleared and a warning set.
    pub async fn snapshot(&self, line: &'static BusLine) -> Result<LineSnapshot, TrackerError> {
        let data = self.line_data(line).await;
        let stops = self.resolve_stops(line, data.as_ref()).await?;

        if stops.is_empty() {
            return Ok(LineSnapshot {
                line,
                stops,
                vehicles: Vec::new(),
                route_geometry: Arc::new(Vec::new()),
                live_data: false,
                warning: Some(NO_STOPS_WARNING.to_string()),
                fetched_at: Utc::now(),
            });
        }

        let (arrivals, route_geometry) = futures::join!(
            self.live_arrivals(line, &stops, data.as_ref()),
            self.route(line, &stops)
        );

        let (vehicles, live_data, warning) = match arrivals {
            Some(samples) => (
                self.estimator.estimate(line.line_num, &stops, &samples),
                true,
                None,
            ),
            None => (Vec::new(), false, Some(LIVE_DATA_WARNING.to_string())),
        };

        info!(
            line = line.line_num,
            stops = stops.len(),
            vehicles = vehicles.len(),
            live_data,
            "line snapshot built"
        );

        Ok(LineSnapshot {
            line,
            stops,
            vehicles,
            route_geometry,
            live_data,
            warning,
            fetched_at: Utc::now(),
        })
    }

    /// Forget the cached metadata and route of one line.
    pub async fn invalidate_line(&self, line: &BusLine) {
        self.line_data.invalidate(&line.slug.to_string()).await;
        self.routes.invalidate(&line.line_num.to_string()).await;
    }

    /// Forget every cached route.
    pub fn clear_route_cache(&self) {
        self.routes.invalidate_all();
    }

    async fn line_data(&self, line: &BusLine) -> Option<LineData> {
        let result = self
            .line_data
            .get_or_fetch(line.slug.to_string(), || {
                self.source.fetch_line_data(line.slug)
            })
            .await;

        match result {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(line = line.line_num, error = %e, "line data unavailable");
                None
            }
        }
    }

    /// Fetch the stop list, falling back to the last list seen.
    ///
    /// Without fresh line data the catalogue's map id is used.
    async fn resolve_stops(
        &self,
        line: &BusLine,
        data: Option<&LineData>,
    ) -> Result<Arc<Vec<Stop>>, TrackerError> {
        let key = line.line_num.to_string();
        let map_id = data.map_or(line.map_id, |d| d.map_id);

        match self.source.fetch_stops(map_id).await {
            Ok(stops) => {
                let stops = Arc::new(stops);
                if !stops.is_empty() {
                    self.last_stops.insert(key, Arc::clone(&stops)).await;
                }
                Ok(stops)
            }
            Err(e) => match self.last_stops.get(&key).await {
                Some(stale) => {
                    warn!(line = line.line_num, error = %e, "using last known stops");
                    Ok(stale)
                }
                None => Err(TrackerError::Unavailable {
                    line: key,
                    source: e,
                }),
            },
        }
    }

    async fn live_arrivals(
        &self,
        line: &BusLine,
        stops: &[Stop],
        data: Option<&LineData>,
    ) -> Option<Vec<ArrivalSample>> {
        let data = data?;

        match self.source.fetch_arrivals(line.line_num, stops, &data.nonce).await {
            Ok(samples) => Some(samples),
            Err(e) => {
                warn!(line = line.line_num, error = %e, "live arrivals unavailable");
                // An expired nonce makes every stop fail.
                self.line_data.invalidate(&line.slug.to_string()).await;
                None
            }
        }
    }

    /// Cached route geometry; a straight-line fallback is cached too.
    async fn route(&self, line: &BusLine, stops: &[Stop]) -> Arc<Vec<[f64; 2]>> {
        let key = line.line_num.to_string();
        if let Some(cached) = self.routes.get(&key).await {
            return cached;
        }

        let geometry = if stops.len() < 2 {
            straight_line(stops)
        } else {
            match self.geometry.fetch_route(stops).await {
                Ok(coordinates) => coordinates,
                Err(e) => {
                    warn!(line = line.line_num, error = %e, "route unavailable, using straight lines");
                    straight_line(stops)
                }
            }
        };

        debug!(line = line.line_num, points = geometry.len(), "route cached");
        let geometry = Arc::new(geometry);
        self.routes.insert(key, Arc::clone(&geometry)).await;
        geometry
    }
}
