//! Client for the San Sebastián bus operator's website.
//!
//! The site has no public API. Line pages are scraped for a security
//! nonce and the id of a map-plugin markers file, the markers file lists
//! the line's stops in route order, and an AJAX endpoint answers with the
//! next arrival of each line at a stop.
//!
//! Quirks worth knowing:
//! - The arrival endpoint takes the stop **code** (`parada_id`), not the
//!   marker id
//! - Line numbers are zero-padded in URLs ("05") but not in responses ("5")
//! - The nonce expires, so line metadata is only cached briefly

mod client;
mod error;
mod mock;
mod parse;
mod source;

pub use client::{DbusClient, DbusConfig};
pub use error::DbusError;
pub use mock::MockTransitSource;
pub use parse::{LineData, ParsedEta, find_nonce, parse_eta, parse_line_page, parse_markers};
pub use source::TransitSource;
