//! Per-platform three-state circuit breaker.
//!
//! The breaker only hands out routing advice; it never raises. State is keyed
//! by platform, created lazily on first access, and lives for the registry's
//! lifetime.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::item::Platform;

/// Tunable thresholds for the circuit breaker.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before a closed breaker opens.
    pub failure_threshold: u32,
    /// How long an open breaker waits before permitting a probe.
    pub reset_timeout: Duration,
    /// Failure budget while half-open; exhausting it reopens the breaker.
    /// Deliberately smaller than `failure_threshold`: a probing breaker gives
    /// up on a still-broken dependency quickly.
    pub half_open_retries: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(60),
            half_open_retries: 2,
        }
    }
}

impl BreakerConfig {
    fn reset_delta(&self) -> TimeDelta {
        // Saturate instead of panicking on absurd configurations.
        TimeDelta::from_std(self.reset_timeout).unwrap_or(TimeDelta::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakerPhase {
    Closed,
    Open,
    HalfOpen,
}

/// Raw per-platform breaker diagnostics, exposed through the health map.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerState {
    pub phase: BreakerPhase,
    pub failure_count: u32,
    pub last_failure: Option<DateTime<Utc>>,
    pub next_retry: Option<DateTime<Utc>>,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self {
            phase: BreakerPhase::Closed,
            failure_count: 0,
            last_failure: None,
            next_retry: None,
        }
    }
}

/// Routing advice for a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakerVerdict {
    Allowed,
    Rejected { reason: String },
}

impl BreakerVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, BreakerVerdict::Allowed)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            BreakerVerdict::Allowed => None,
            BreakerVerdict::Rejected { reason } => Some(reason),
        }
    }
}

pub struct CircuitBreakerRegistry {
    config: BreakerConfig,
    states: Mutex<FxHashMap<Platform, BreakerState>>,
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}

impl CircuitBreakerRegistry {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            states: Mutex::new(FxHashMap::default()),
        }
    }

    /// Ask whether a call to `platform` should be attempted right now.
    ///
    /// An open breaker whose retry time has passed transitions to half-open
    /// (zeroing the failure counter) as a side effect of this call; a
    /// half-open breaker whose failure budget is exhausted transitions back
    /// to open with a fresh retry time.
    pub fn check(&self, platform: Platform) -> BreakerVerdict {
        self.check_at(platform, Utc::now())
    }

    pub fn check_at(&self, platform: Platform, now: DateTime<Utc>) -> BreakerVerdict {
        let mut states = self.states.lock();
        let state = states.entry(platform).or_default();

        match state.phase {
            BreakerPhase::Closed => BreakerVerdict::Allowed,
            BreakerPhase::Open => {
                if state.next_retry.is_some_and(|retry_at| now >= retry_at) {
                    debug!(platform = %platform, "circuit probing: open -> half-open");
                    state.phase = BreakerPhase::HalfOpen;
                    state.failure_count = 0;
                    BreakerVerdict::Allowed
                } else {
                    let retry_at = state
                        .next_retry
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "unknown".to_string());
                    BreakerVerdict::Rejected {
                        reason: format!("circuit open for {platform}; next retry at {retry_at}"),
                    }
                }
            }
            BreakerPhase::HalfOpen => {
                if state.failure_count < self.config.half_open_retries {
                    BreakerVerdict::Allowed
                } else {
                    warn!(platform = %platform, "probe budget exhausted: half-open -> open");
                    state.phase = BreakerPhase::Open;
                    let retry_at = now + self.config.reset_delta();
                    state.next_retry = Some(retry_at);
                    BreakerVerdict::Rejected {
                        reason: format!(
                            "circuit reopened for {platform}; next retry at {}",
                            retry_at.to_rfc3339()
                        ),
                    }
                }
            }
        }
    }

    /// Record a successful call. Closes a half-open breaker and always clears
    /// the failure bookkeeping.
    pub fn record_success(&self, platform: Platform) {
        let mut states = self.states.lock();
        let state = states.entry(platform).or_default();

        if state.phase == BreakerPhase::HalfOpen {
            info!(platform = %platform, "dependency recovered: half-open -> closed");
            state.phase = BreakerPhase::Closed;
            state.next_retry = None;
        }
        state.failure_count = 0;
        state.last_failure = None;
    }

    /// Record a failed call. Opens the breaker once the consecutive-failure
    /// threshold is reached.
    pub fn record_failure(&self, platform: Platform) {
        self.record_failure_at(platform, Utc::now());
    }

    pub fn record_failure_at(&self, platform: Platform, now: DateTime<Utc>) {
        let mut states = self.states.lock();
        let state = states.entry(platform).or_default();

        state.failure_count += 1;
        state.last_failure = Some(now);

        if state.phase != BreakerPhase::Open && state.failure_count >= self.config.failure_threshold
        {
            let retry_at = now + self.config.reset_delta();
            warn!(
                platform = %platform,
                failures = state.failure_count,
                retry_at = %retry_at.to_rfc3339(),
                "failure threshold reached, opening circuit"
            );
            state.phase = BreakerPhase::Open;
            state.next_retry = Some(retry_at);
        }
    }

    /// Read-only copy of the current state; a platform never seen reads as a
    /// fresh closed breaker.
    pub fn snapshot(&self, platform: Platform) -> BreakerState {
        self.states
            .lock()
            .get(&platform)
            .cloned()
            .unwrap_or_default()
    }
}
