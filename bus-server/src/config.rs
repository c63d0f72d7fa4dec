//! Server configuration from environment variables.
//!
//! | Variable                    | Default                           |
//! |-----------------------------|-----------------------------------|
//! | `PORT`                      | `3001`                            |
//! | `BIND_ADDR`                 | `0.0.0.0`                         |
//! | `DBUS_BASE_URL`             | `https://dbus.eus`                |
//! | `DBUS_ACCEPT_INVALID_CERTS` | `false`                           |
//! | `OSRM_BASE_URL`             | `https://router.project-osrm.org` |
//! | `CACHE_TTL_SECS`            | `300`                             |
//! | `ARRIVAL_BATCH_SIZE`        | `10`                              |
//! | `ARRIVAL_BATCH_PAUSE_MS`    | `50`                              |
//! | `ETA_CEILING_MINS`          | `15`                              |
//! | `TRAVERSAL_MINS`            | `5`                               |
//! | `RATIO_CAP`                 | `1.0`                             |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::dbus::DbusConfig;
use crate::estimator::{EstimatorConfig, EstimatorConfigError};
use crate::routing::OsrmConfig;

/// Errors from reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    /// Estimator constants are out of range
    #[error(transparent)]
    Estimator(#[from] EstimatorConfigError),
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub dbus: DbusConfig,
    pub osrm: OsrmConfig,
    pub cache: CacheConfig,
    pub estimator: EstimatorConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or(&lookup, "PORT", 3001)?;
        let addr: IpAddr = parse_or(&lookup, "BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;

        let mut dbus = DbusConfig::default();
        if let Some(url) = lookup("DBUS_BASE_URL") {
            dbus = dbus.with_base_url(url);
        }
        let batch_size = parse_or(&lookup, "ARRIVAL_BATCH_SIZE", dbus.batch_size)?;
        let pause_ms = parse_or(&lookup, "ARRIVAL_BATCH_PAUSE_MS", 50u64)?;
        let accept_invalid = parse_or(&lookup, "DBUS_ACCEPT_INVALID_CERTS", false)?;
        let dbus = dbus
            .with_batching(batch_size, Duration::from_millis(pause_ms))
            .with_accept_invalid_certs(accept_invalid);

        let mut osrm = OsrmConfig::default();
        if let Some(url) = lookup("OSRM_BASE_URL") {
            osrm = osrm.with_base_url(url);
        }

        let ttl_secs = parse_or(&lookup, "CACHE_TTL_SECS", 300u64)?;
        let cache = CacheConfig::default().with_ttl(Duration::from_secs(ttl_secs));

        let defaults = EstimatorConfig::default();
        let estimator = EstimatorConfig::new(
            parse_or(&lookup, "ETA_CEILING_MINS", defaults.eta_ceiling_mins)?,
            parse_or(&lookup, "TRAVERSAL_MINS", defaults.traversal_mins)?,
            parse_or(&lookup, "RATIO_CAP", defaults.ratio_cap)?,
        )?;

        Ok(Self {
            bind: SocketAddr::new(addr, port),
            dbus,
            osrm,
            cache,
            estimator,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.bind, "0.0.0.0:3001".parse().unwrap());
        assert_eq!(config.dbus.base_url, "https://dbus.eus");
        assert_eq!(config.dbus.batch_size, 10);
        assert_eq!(config.dbus.batch_pause, Duration::from_millis(50));
        assert!(!config.dbus.accept_invalid_certs);
        assert_eq!(config.osrm.base_url, "https://router.project-osrm.org");
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.estimator, EstimatorConfig::default());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("DBUS_BASE_URL", "http://localhost:9000"),
            ("DBUS_ACCEPT_INVALID_CERTS", "true"),
            ("OSRM_BASE_URL", "http://localhost:5000"),
            ("CACHE_TTL_SECS", "60"),
            ("ARRIVAL_BATCH_SIZE", "4"),
            ("ARRIVAL_BATCH_PAUSE_MS", "0"),
            ("ETA_CEILING_MINS", "20"),
            ("TRAVERSAL_MINS", "3.5"),
            ("RATIO_CAP", "0.8"),
        ])
        .unwrap();

        assert_eq!(config.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.dbus.base_url, "http://localhost:9000");
        assert!(config.dbus.accept_invalid_certs);
        assert_eq!(config.osrm.base_url, "http://localhost:5000");
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.dbus.batch_size, 4);
        assert_eq!(config.dbus.batch_pause, Duration::ZERO);
        assert_eq!(config.estimator.eta_ceiling_mins, 20);
        assert_eq!(config.estimator.traversal_mins, 3.5);
        assert_eq!(config.estimator.ratio_cap, 0.8);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("PORT", "  ")]).unwrap();
        assert_eq!(config.bind.port(), 3001);
    }

    #[test]
    fn unparseable_value_is_reported() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
        assert_eq!(err.to_string(), "invalid value for PORT: \"eighty\"");
    }

    #[test]
    fn out_of_range_estimator_settings_are_rejected() {
        let err = config(&[("RATIO_CAP", "1.5")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Estimator(EstimatorConfigError::InvalidRatioCap(_))
        ));
    }
}
