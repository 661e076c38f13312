//! Per-platform rate-limit bookkeeping fed from response headers.

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::item::Platform;

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Window applied when a response carries a remaining count but no reset.
const DEFAULT_RESET_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RateLimitSnapshot {
    pub remaining: i64,
    pub reset_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pure bookkeeping: updated only from successful primary-API responses, read
/// by the fallback policy and the health map. Never fails; responses without
/// usable headers are ignored.
#[derive(Default)]
pub struct RateLimitTracker {
    states: Mutex<FxHashMap<Platform, RateLimitSnapshot>>,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, platform: Platform, headers: &HeaderMap) {
        self.update_at(platform, headers, Utc::now());
    }

    pub fn update_at(&self, platform: Platform, headers: &HeaderMap, now: DateTime<Utc>) {
        // Providers send the remaining count as an integer or a decimal
        // string ("996.0"); both are accepted and floored.
        let Some(remaining) = header_f64(headers, REMAINING_HEADER) else {
            return;
        };

        let reset_secs = header_f64(headers, RESET_HEADER)
            .map(|s| s as i64)
            .unwrap_or(DEFAULT_RESET_SECS);
        let snapshot = RateLimitSnapshot {
            remaining: remaining.floor() as i64,
            reset_at: now + TimeDelta::seconds(reset_secs),
            updated_at: now,
        };

        debug!(
            platform = %platform,
            remaining = snapshot.remaining,
            reset_at = %snapshot.reset_at.to_rfc3339(),
            "rate limit snapshot updated"
        );
        self.states.lock().insert(platform, snapshot);
    }

    pub fn get(&self, platform: Platform) -> Option<RateLimitSnapshot> {
        self.states.lock().get(&platform).copied()
    }
}

fn header_f64(headers: &HeaderMap, name: &str) -> Option<f64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
}
