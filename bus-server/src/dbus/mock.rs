//! In-memory transit source for testing without the live site.
//!
//! Serves fixed stop lists and arrival snapshots keyed by line, and counts
//! calls so caching behaviour can be asserted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::{ArrivalSample, Stop};

use super::error::DbusError;
use super::parse::LineData;
use super::source::TransitSource;

#[derive(Debug, Default)]
struct MockLine {
    map_id: u32,
    stops: Vec<Stop>,
    arrivals: Vec<ArrivalSample>,
}

#[derive(Debug, Default)]
struct Counters {
    line_data: AtomicUsize,
    stops: AtomicUsize,
    arrivals: AtomicUsize,
}

/// Mock transit source keyed by line slug (for line data) and map id.
#[derive(Debug, Clone, Default)]
pub struct MockTransitSource {
    lines: Arc<RwLock<HashMap<String, MockLine>>>,
    counters: Arc<Counters>,
    fail_line_data: Arc<AtomicBool>,
    fail_stops: Arc<AtomicBool>,
    fail_arrivals: Arc<AtomicBool>,
}

impl MockTransitSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a line. Arrivals are matched to `line_num`.
    pub fn with_line(
        self,
        slug: &str,
        map_id: u32,
        stops: Vec<Stop>,
        arrivals: Vec<ArrivalSample>,
    ) -> Self {
        if let Ok(mut lines) = self.lines.write() {
            lines.insert(
                slug.to_string(),
                MockLine {
                    map_id,
                    stops,
                    arrivals,
                },
            );
        }
        self
    }

    /// Replace the arrival snapshot of a registered line.
    pub fn set_arrivals(&self, slug: &str, arrivals: Vec<ArrivalSample>) {
        if let Ok(mut lines) = self.lines.write() {
            if let Some(line) = lines.get_mut(slug) {
                line.arrivals = arrivals;
            }
        }
    }

    pub fn set_fail_line_data(&self, fail: bool) {
        self.fail_line_data.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_stops(&self, fail: bool) {
        self.fail_stops.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_arrivals(&self, fail: bool) {
        self.fail_arrivals.store(fail, Ordering::SeqCst);
    }

    pub fn line_data_calls(&self) -> usize {
        self.counters.line_data.load(Ordering::SeqCst)
    }

    pub fn stops_calls(&self) -> usize {
        self.counters.stops.load(Ordering::SeqCst)
    }

    pub fn arrivals_calls(&self) -> usize {
        self.counters.arrivals.load(Ordering::SeqCst)
    }

    fn unavailable() -> DbusError {
        DbusError::Api {
            status: 503,
            message: "mock failure".to_string(),
        }
    }

    fn find<T>(&self, pick: impl Fn(&str, &MockLine) -> Option<T>) -> Option<T> {
        let lines = self.lines.read().ok()?;
        lines.iter().find_map(|(slug, line)| pick(slug, line))
    }
}

impl TransitSource for MockTransitSource {
    async fn fetch_line_data(&self, slug: &str) -> Result<LineData, DbusError> {
        self.counters.line_data.fetch_add(1, Ordering::SeqCst);
        if self.fail_line_data.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }

        self.find(|s, line| {
            (s == slug).then(|| LineData {
                nonce: format!("nonce-{}", line.map_id),
                map_id: line.map_id,
            })
        })
        .ok_or(DbusError::MissingMapId)
    }

    async fn fetch_stops(&self, map_id: u32) -> Result<Vec<Stop>, DbusError> {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_stops.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }

        Ok(self
            .find(|_, line| (line.map_id == map_id).then(|| line.stops.clone()))
            .unwrap_or_default())
    }

    async fn fetch_arrivals(
        &self,
        _line_num: &str,
        stops: &[Stop],
        nonce: &str,
    ) -> Result<Vec<ArrivalSample>, DbusError> {
        self.counters.arrivals.fetch_add(1, Ordering::SeqCst);
        if self.fail_arrivals.load(Ordering::SeqCst) {
            return Err(DbusError::NoArrivals {
                failed: stops.len(),
            });
        }

        Ok(self
            .find(|_, line| {
                (format!("nonce-{}", line.map_id) == nonce).then(|| line.arrivals.clone())
            })
            .unwrap_or_default())
    }
}
