//! Bus position server.
//!
//! Estimates where the buses of a line are from per-stop arrival
//! predictions alone, and serves the result as JSON for a map frontend.

pub mod cache;
pub mod config;
pub mod dbus;
pub mod domain;
pub mod estimator;
pub mod lines;
pub mod routing;
pub mod tracker;
pub mod web;
