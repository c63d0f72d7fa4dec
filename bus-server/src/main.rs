use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bus_server::config::ServerConfig;
use bus_server::dbus::DbusClient;
use bus_server::estimator::{Estimator, TracingObserver};
use bus_server::routing::OsrmClient;
use bus_server::tracker::LineTracker;
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    tracing::info!(
        dbus = %config.dbus.base_url,
        osrm = %config.osrm.base_url,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        "Loaded configuration"
    );
    if config.dbus.accept_invalid_certs {
        tracing::warn!("Certificate validation disabled for the arrivals site");
    }

    let dbus = DbusClient::new(config.dbus.clone()).expect("Failed to create arrivals client");
    let osrm = OsrmClient::new(config.osrm.clone()).expect("Failed to create routing client");
    let estimator = Estimator::new(config.estimator.clone()).with_observer(TracingObserver);

    let tracker = LineTracker::new(dbus, osrm, estimator, &config.cache);
    let app = create_router(AppState::new(tracker));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {e}", config.bind));

    tracing::info!("Bus position server listening on http://{}", config.bind);
    tracing::info!("  GET /api/health");
    tracing::info!("  GET /api/lines");
    tracing::info!("  GET /api/lines/:lineNum/stops");
    tracing::info!("  GET /api/lines/:lineNum/buses");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
