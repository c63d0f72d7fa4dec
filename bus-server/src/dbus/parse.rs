//! Parsing of the operator's line pages, stop lists and arrival responses.
//!
//! None of these are a documented API: the line page is HTML with the
//! nonce and markers file embedded in scripts, the stop list is the map
//! plugin's markers XML, and arrivals come back as an HTML fragment such
//! as `Linea 33:  "Berio-Igara": 10 min.`

use std::sync::LazyLock;

use regex::Regex;
use roxmltree::{Document, Node};
use tracing::warn;

use crate::domain::{Coordinate, Stop, StopCode, StopId};

use super::error::DbusError;

static MAP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)markers\.xml").expect("valid map id pattern"));

static NONCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)security["']?\s*[:=]\s*["']([a-f0-9]+)["']"#,
        r#"(?i)nonce["']?\s*[:=]\s*["']([a-f0-9]+)["']"#,
        r#"(?i)data-security=["']([a-f0-9]+)["']"#,
        r#"(?i)wpgmza_security["']?\s*[:=]\s*["']([a-f0-9]+)["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid nonce pattern"))
    .collect()
});

/// Last resort: any quoted 10-character hex string.
static NONCE_FALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["']([a-f0-9]{10})["']"#).expect("valid nonce fallback pattern")
});

/// Metadata scraped from a line page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineData {
    /// Security token required by the arrival endpoint.
    pub nonce: String,
    /// Id of the markers file holding the line's stops.
    pub map_id: u32,
}

/// An ETA extracted from an arrival response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedEta {
    pub eta_minutes: Option<i32>,
    pub direction: Option<String>,
}

/// Extract the map id and nonce from a line page.
pub fn parse_line_page(html: &str) -> Result<LineData, DbusError> {
    let map_id = MAP_ID
        .captures(html)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or(DbusError::MissingMapId)?;

    let nonce = find_nonce(html).ok_or(DbusError::MissingNonce)?;

    Ok(LineData { nonce, map_id })
}

/// Find the security nonce in a line page.
pub fn find_nonce(html: &str) -> Option<String> {
    NONCE_PATTERNS
        .iter()
        .chain(std::iter::once(&*NONCE_FALLBACK))
        .find_map(|re| re.captures(html))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Line numbers are printed without leading zeros ("Linea 5", not "05").
pub fn normalize_line_num(line_num: &str) -> &str {
    let trimmed = line_num.trim_start_matches('0');
    if trimmed.is_empty() { line_num } else { trimmed }
}

/// Extract the first ETA for `line_num` from an arrival response.
pub fn parse_eta(html: &str, line_num: &str) -> ParsedEta {
    let pattern = format!(
        r#"(?i)Linea\s+{}:\s+"([^"]+)":\s*(\d+)\s*min"#,
        regex::escape(normalize_line_num(line_num))
    );
    let Ok(re) = Regex::new(&pattern) else {
        return ParsedEta::default();
    };

    match re.captures(html) {
        Some(caps) => ParsedEta {
            eta_minutes: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            direction: caps.get(1).map(|m| m.as_str().to_string()),
        },
        None => ParsedEta::default(),
    }
}

/// Parse a markers XML document into stops, in document (route) order.
///
/// Markers whose `address` is not a `lat,lng` pair are skipped. A document
/// without a `<markers>` root yields no stops.
pub fn parse_markers(xml: &str) -> Result<Vec<Stop>, DbusError> {
    let doc = Document::parse(xml).map_err(|e| DbusError::Xml {
        message: e.to_string(),
    })?;

    let root = doc.root_element();
    if !root.has_tag_name("markers") {
        return Ok(Vec::new());
    }

    let mut stops = Vec::new();
    for marker in root.children().filter(|n| n.has_tag_name("marker")) {
        let marker_id = child_text(marker, "marker_id");
        let Some(coordinate) = parse_address(child_text(marker, "address")) else {
            warn!(marker_id, "skipping marker with unparseable address");
            continue;
        };

        let mut stop = Stop::new(
            StopId::new(marker_id),
            StopCode::new(child_text(marker, "parada_id")),
            child_text(marker, "title_es"),
            coordinate,
            stops.len(),
        );
        stop.secondary_name = child_text(marker, "title_eu").to_string();
        stop.description = child_text(marker, "desc_es").to_string();
        stops.push(stop);
    }

    Ok(stops)
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> &'a str {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(str::trim)
        .unwrap_or("")
}

fn parse_address(address: &str) -> Option<Coordinate> {
    let (lat, lng) = address.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    (lat.is_finite() && lng.is_finite()).then(|| Coordinate::new(lat, lng))
}
