//! HTTP client for the operator's website.
//!
//! Three requests are involved: the line page (for the nonce and map id),
//! the markers XML (the ordered stop list) and one arrival request per
//! stop. Arrival requests are sent in small batches with a pause between
//! batches to avoid overwhelming the site.

use std::time::Duration;

use chrono::{Datelike, Local, Timelike};
use futures::future::join_all;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info, warn};

use crate::domain::{ArrivalSample, Stop, StopCode};

use super::error::DbusError;
use super::parse::{LineData, parse_eta, parse_line_page, parse_markers};

/// Default base URL of the operator's website.
const DEFAULT_BASE_URL: &str = "https://dbus.eus";

/// Default number of arrival requests in flight at once.
const DEFAULT_BATCH_SIZE: usize = 10;

/// Default pause between arrival batches.
const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(50);

/// The site serves a reduced page to unknown user agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct DbusConfig {
    /// Base URL of the website
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Arrival requests per batch
    pub batch_size: usize,
    /// Pause between arrival batches
    pub batch_pause: Duration,
    /// Extra attempts for a failed arrival request
    pub max_retries: u32,
    /// Accept certificates that fail validation (the site has had a broken chain)
    pub accept_invalid_certs: bool,
}

impl DbusConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_batching(mut self, batch_size: usize, pause: Duration) -> Self {
        self.batch_size = batch_size;
        self.batch_pause = pause;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

impl Default for DbusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pause: DEFAULT_BATCH_PAUSE,
            max_retries: 1,
            accept_invalid_certs: false,
        }
    }
}

/// Client for line pages, stop lists and arrivals.
#[derive(Debug, Clone)]
pub struct DbusClient {
    http: reqwest::Client,
    config: DbusConfig,
}

impl DbusClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DbusConfig) -> Result<Self, DbusError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DbusConfig {
        &self.config
    }

    /// Scrape the nonce and map id from a line's page.
    pub async fn fetch_line_data(&self, slug: &str) -> Result<LineData, DbusError> {
        let url = format!("{}/es/{}/", self.config.base_url, slug);
        debug!(%url, "fetching line page");

        let html = self.get_text(&url).await?;
        let data = parse_line_page(&html)?;

        debug!(slug, map_id = data.map_id, "line page parsed");
        Ok(data)
    }

    /// Fetch the ordered stop list for a map.
    pub async fn fetch_stops(&self, map_id: u32) -> Result<Vec<Stop>, DbusError> {
        let url = format!(
            "{}/wp-content/uploads/wp-google-maps/{}markers.xml",
            self.config.base_url, map_id
        );

        let xml = self.get_text(&url).await?;
        parse_markers(&xml)
    }

    /// Fetch the ETA of `line_num` at one stop.
    ///
    /// The endpoint expects the stop *code*; marker ids are rejected.
    pub async fn fetch_arrival(
        &self,
        line_num: &str,
        code: &StopCode,
        nonce: &str,
    ) -> Result<ArrivalSample, DbusError> {
        let now = Local::now();
        let params = [
            ("action", "calcula_parada".to_string()),
            ("security", nonce.to_string()),
            ("linea", line_num.to_string()),
            ("parada", code.as_str().to_string()),
            ("dia", now.day().to_string()),
            ("mes", now.month().to_string()),
            ("year", now.year().to_string()),
            ("hora", now.hour().to_string()),
            ("minuto", now.minute().to_string()),
        ];

        let url = format!("{}/wp-admin/admin-ajax.php", self.config.base_url);
        let response = self.http.post(&url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DbusError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let html = response.text().await?;
        let parsed = parse_eta(&html, line_num);

        debug!(
            line = line_num,
            stop = %code,
            eta = ?parsed.eta_minutes,
            direction = ?parsed.direction,
            "arrival parsed"
        );

        let mut sample = ArrivalSample::new(code.clone(), parsed.eta_minutes).with_raw_text(html);
        sample.direction_hint = parsed.direction;
        Ok(sample)
    }

    /// Fetch arrivals for every stop, batched.
    ///
    /// A stop whose request still fails after retrying gets a sample without
    /// an ETA. Only when every stop failed is an error returned. Stops with
    /// a blank code are skipped.
    pub async fn fetch_all_arrivals(
        &self,
        line_num: &str,
        stops: &[Stop],
        nonce: &str,
    ) -> Result<Vec<ArrivalSample>, DbusError> {
        let queryable: Vec<&Stop> = stops.iter().filter(|s| !s.code.is_empty()).collect();
        if queryable.len() != stops.len() {
            warn!(
                line = line_num,
                skipped = stops.len() - queryable.len(),
                "stops without a code skipped"
            );
        }

        let mut samples = Vec::with_capacity(queryable.len());
        let mut failed = 0;

        for (batch_no, batch) in queryable.chunks(self.config.batch_size.max(1)).enumerate() {
            if batch_no > 0 {
                tokio::time::sleep(self.config.batch_pause).await;
            }

            let results = join_all(
                batch
                    .iter()
                    .map(|stop| self.fetch_arrival_with_retry(line_num, &stop.code, nonce)),
            )
            .await;

            for (stop, result) in batch.iter().zip(results) {
                match result {
                    Ok(sample) => samples.push(sample),
                    Err(e) => {
                        warn!(line = line_num, stop = %stop.code, error = %e, "arrival fetch failed");
                        failed += 1;
                        samples.push(ArrivalSample::unavailable(stop.code.clone()));
                    }
                }
            }
        }

        if failed > 0 && failed == queryable.len() {
            return Err(DbusError::NoArrivals { failed });
        }

        let with_eta = samples.iter().filter(|s| s.has_eta()).count();
        info!(line = line_num, with_eta, total = samples.len(), failed, "arrivals fetched");

        Ok(samples)
    }

    async fn fetch_arrival_with_retry(
        &self,
        line_num: &str,
        code: &StopCode,
        nonce: &str,
    ) -> Result<ArrivalSample, DbusError> {
        let mut attempt = 0;
        loop {
            match self.fetch_arrival(line_num, code, nonce).await {
                Ok(sample) => return Ok(sample),
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    debug!(stop = %code, attempt, error = %e, "retrying arrival");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, DbusError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "text/html,application/xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DbusError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(response.text().await?)
    }
}
