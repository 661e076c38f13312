//! Read-only per-platform health classification for the admin dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::fallback::RATE_LIMIT_FLOOR;
use super::{BreakerPhase, Resilience};
use crate::item::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
    Throttled,
}

/// Derived classification plus the raw diagnostics it was derived from.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformHealth {
    pub platform: Platform,
    pub status: HealthStatus,
    pub breaker_phase: BreakerPhase,
    pub failure_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_retry: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_reset_at: Option<DateTime<Utc>>,
}

impl Resilience {
    /// Classify one platform. Purely observational: unlike the routing
    /// checks, this never moves the breaker between states.
    pub fn health(&self, platform: Platform) -> PlatformHealth {
        self.health_at(platform, Utc::now())
    }

    pub fn health_at(&self, platform: Platform, now: DateTime<Utc>) -> PlatformHealth {
        let breaker = self.breakers.snapshot(platform);
        let rate = self.rate_limits.get(platform);

        let throttled = rate
            .as_ref()
            .is_some_and(|r| r.remaining <= RATE_LIMIT_FLOOR && r.reset_at > now);

        let status = match breaker.phase {
            BreakerPhase::Open => HealthStatus::Down,
            BreakerPhase::HalfOpen => HealthStatus::Degraded,
            BreakerPhase::Closed if throttled => HealthStatus::Throttled,
            BreakerPhase::Closed if breaker.failure_count > 0 => HealthStatus::Degraded,
            BreakerPhase::Closed => HealthStatus::Healthy,
        };

        PlatformHealth {
            platform,
            status,
            breaker_phase: breaker.phase,
            failure_count: breaker.failure_count,
            next_retry: breaker.next_retry,
            rate_remaining: rate.as_ref().map(|r| r.remaining),
            rate_reset_at: rate.as_ref().map(|r| r.reset_at),
        }
    }

    /// Health for every known platform, in stable declaration order.
    pub fn health_map(&self) -> Vec<PlatformHealth> {
        let now = Utc::now();
        Platform::ALL
            .into_iter()
            .map(|platform| self.health_at(platform, now))
            .collect()
    }
}
