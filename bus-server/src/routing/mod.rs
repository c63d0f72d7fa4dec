//! Road geometry for drawing a line on a map.
//!
//! Purely cosmetic: the estimator never looks at it. Coordinates are
//! `[lng, lat]` pairs as GeoJSON and OSRM use them. When the router is
//! unreachable the tracker falls back to [`straight_line`].

mod client;
mod error;
mod source;

pub use client::{OsrmClient, OsrmConfig, OsrmGeometry, OsrmResponse, OsrmRoute, parse_route, route_url};
pub use error::RoutingError;
pub use source::{GeometrySource, StraightLineGeometry, straight_line};
