//! # Match Lens
//!
//! Live match lookup with per-participant league enrichment.
//!
//! ## Architecture
//!
//! - **models**: Aggregated result shapes (summoners, league entries, matches)
//! - **upstream**: Upstream API client with caching and rate-limit retries
//! - **cache**: In-memory TTL cache shared by all lookups
//! - **service**: Concurrent current-match aggregation
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod service;
pub mod upstream;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.trim().parse().ok()?;
    num.checked_mul(multiplier).map(Duration::from_secs)
}
