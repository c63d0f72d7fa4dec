//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::dbus::TransitSource;
use crate::lines::{BUS_LINES, BusLine, line_by_num};
use crate::routing::GeometrySource;
use crate::tracker::TrackerError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S, G>(state: AppState<S, G>) -> Router
where
    S: TransitSource,
    G: GeometrySource,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/lines", get(list_lines))
        .route("/api/lines/:line_num/stops", get(line_stops::<S, G>))
        .route("/api/lines/:line_num/buses", get(line_buses::<S, G>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(Utc::now()))
}

/// List every line.
async fn list_lines() -> Json<LinesResponse> {
    Json(LinesResponse { lines: &BUS_LINES })
}

/// Stops of a line in route order.
async fn line_stops<S, G>(
    State(state): State<AppState<S, G>>,
    Path(line_num): Path<String>,
) -> Result<Json<StopsResponse>, AppError>
where
    S: TransitSource,
    G: GeometrySource,
{
    let line = find_line(&line_num)?;
    let stops = state.tracker.stops(line).await?;

    Ok(Json(StopsResponse::new(line, &stops)))
}

/// Estimated bus positions, stops and route geometry of a line.
async fn line_buses<S, G>(
    State(state): State<AppState<S, G>>,
    Path(line_num): Path<String>,
) -> Result<Json<BusesResponse>, AppError>
where
    S: TransitSource,
    G: GeometrySource,
{
    let line = find_line(&line_num)?;
    let snapshot = state.tracker.snapshot(line).await?;

    Ok(Json(BusesResponse::from_snapshot(&snapshot)))
}

/// Line numbers are matched exactly, then upper-cased ("b1" finds "B1").
fn find_line(line_num: &str) -> Result<&'static BusLine, AppError> {
    line_by_num(line_num)
        .or_else(|| line_by_num(&line_num.to_uppercase()))
        .ok_or_else(|| AppError::NotFound {
            message: format!("Line {line_num} not found"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Unavailable { message: String },
}

impl From<TrackerError> for AppError {
    fn from(e: TrackerError) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound { message } => {
                debug!(%message, "not found");
                (StatusCode::NOT_FOUND, message)
            }
            AppError::Unavailable { message } => {
                warn!(%message, "upstream unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::dbus::MockTransitSource;
    use crate::domain::{ArrivalSample, Coordinate, Stop, StopCode, StopId};
    use crate::estimator::Estimator;
    use crate::routing::StraightLineGeometry;
    use crate::tracker::{LIVE_DATA_WARNING, LineTracker};

    type TestState = AppState<MockTransitSource, StraightLineGeometry>;

    fn state(source: MockTransitSource) -> TestState {
        AppState::new(LineTracker::new(
            source,
            StraightLineGeometry,
            Estimator::default(),
            &CacheConfig::default(),
        ))
    }

    fn source() -> MockTransitSource {
        let stops = (0..4)
            .map(|i| {
                Stop::new(
                    StopId::new(format!("{}", 500 + i)),
                    StopCode::new(format!("{}", 3300 + i)),
                    format!("Stop {i}"),
                    Coordinate::new(43.30 + i as f64 * 0.003, -1.95),
                    i,
                )
            })
            .collect();
        let arrivals = [Some(7), Some(1), Some(5), Some(14)]
            .into_iter()
            .enumerate()
            .map(|(i, eta)| {
                ArrivalSample::new(StopCode::new(format!("{}", 3300 + i)), eta)
                    .with_direction("Berio-Igara")
            })
            .collect();

        MockTransitSource::new().with_line("33-larratxo-intxaur-berio-igara", 19, stops, arrivals)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert!(!body.timestamp.is_empty());
    }

    #[tokio::test]
    async fn lists_every_line() {
        let Json(body) = list_lines().await;
        assert_eq!(body.lines.len(), BUS_LINES.len());
    }

    #[tokio::test]
    async fn stops_for_known_line() {
        let Json(body) = line_stops(State(state(source())), Path("33".to_string()))
            .await
            .unwrap();

        assert_eq!(body.line_num, "33");
        assert_eq!(body.stops.len(), 4);
        assert_eq!(body.stops[0].marker_id, "500");
        assert_eq!(body.stops[0].parada_id, "3300");
    }

    #[tokio::test]
    async fn unknown_line_is_404() {
        let err = line_buses(State(state(source())), Path("99".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lower_case_line_number_is_accepted() {
        assert_eq!(find_line("b1").unwrap().line_num, "B1");
        assert!(find_line("x9").is_err());
    }

    #[tokio::test]
    async fn buses_for_known_line() {
        let Json(body) = line_buses(State(state(source())), Path("33".to_string()))
            .await
            .unwrap();

        assert!(body.live_data);
        assert_eq!(body.buses.len(), 1);
        assert_eq!(body.buses[0].id, "33-berio-igara-0");
        assert_eq!(body.buses[0].next_stop_id, "501");
        assert_eq!(body.buses[0].stops_with_eta.len(), 3);
        assert_eq!(body.stops.len(), 4);
        assert_eq!(body.route_geometry.len(), 4);
    }

    #[tokio::test]
    async fn buses_degrade_when_arrivals_fail() {
        let source = source();
        source.set_fail_arrivals(true);

        let Json(body) = line_buses(State(state(source)), Path("33".to_string()))
            .await
            .unwrap();

        assert!(!body.live_data);
        assert!(body.buses.is_empty());
        assert_eq!(body.stops.len(), 4);
        assert_eq!(body.warning.as_deref(), Some(LIVE_DATA_WARNING));
    }

    #[tokio::test]
    async fn missing_stops_is_503() {
        let source = source();
        source.set_fail_stops(true);

        let err = line_stops(State(state(source)), Path("33".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn router_builds() {
        let _router: Router = create_router(state(source()));
    }
}
