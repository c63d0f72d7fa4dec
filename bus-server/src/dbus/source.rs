//! The upstream seam used by the line tracker.

use std::future::Future;

use crate::domain::{ArrivalSample, Stop};

use super::client::DbusClient;
use super::error::DbusError;
use super::parse::LineData;

/// Trait for providing stops and arrivals for a line.
///
/// This abstraction allows the tracker to be tested with in-memory data.
pub trait TransitSource: Send + Sync + 'static {
    /// Scrape the metadata needed for the other two calls.
    fn fetch_line_data(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<LineData, DbusError>> + Send;

    /// Get the stops of a map, in route order.
    fn fetch_stops(&self, map_id: u32)
    -> impl Future<Output = Result<Vec<Stop>, DbusError>> + Send;

    /// Get one arrival sample per stop.
    fn fetch_arrivals(
        &self,
        line_num: &str,
        stops: &[Stop],
        nonce: &str,
    ) -> impl Future<Output = Result<Vec<ArrivalSample>, DbusError>> + Send;
}

impl TransitSource for DbusClient {
    async fn fetch_line_data(&self, slug: &str) -> Result<LineData, DbusError> {
        DbusClient::fetch_line_data(self, slug).await
    }

    async fn fetch_stops(&self, map_id: u32) -> Result<Vec<Stop>, DbusError> {
        DbusClient::fetch_stops(self, map_id).await
    }

    async fn fetch_arrivals(
        &self,
        line_num: &str,
        stops: &[Stop],
        nonce: &str,
    ) -> Result<Vec<ArrivalSample>, DbusError> {
        self.fetch_all_arrivals(line_num, stops, nonce).await
    }
}
