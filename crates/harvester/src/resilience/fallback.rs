//! Two-tier fallback routing policy.
//!
//! Tier one is the circuit breaker: when it forbids a call, the fallback is
//! mandatory. Tier two is proactive: with the breaker still closed, a nearly
//! exhausted rate-limit window recommends the fallback before the remaining
//! quota burns down to zero.

use chrono::{DateTime, Utc};

use super::Resilience;
use crate::item::Platform;

/// Remaining-quota floor below which the paid path is preferred.
pub const RATE_LIMIT_FLOOR: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackDecision {
    pub use_fallback: bool,
    pub reason: Option<String>,
}

impl FallbackDecision {
    fn direct() -> Self {
        Self {
            use_fallback: false,
            reason: None,
        }
    }

    fn fallback(reason: String) -> Self {
        Self {
            use_fallback: true,
            reason: Some(reason),
        }
    }
}

impl Resilience {
    /// Should the next call for `platform` take the paid fallback path?
    pub fn should_use_fallback(&self, platform: Platform) -> FallbackDecision {
        self.should_use_fallback_at(platform, Utc::now())
    }

    pub fn should_use_fallback_at(&self, platform: Platform, now: DateTime<Utc>) -> FallbackDecision {
        match self.breakers.check_at(platform, now) {
            super::BreakerVerdict::Rejected { reason } => FallbackDecision::fallback(reason),
            super::BreakerVerdict::Allowed => match self.rate_limits.get(platform) {
                Some(snapshot)
                    if snapshot.remaining <= RATE_LIMIT_FLOOR && snapshot.reset_at > now =>
                {
                    FallbackDecision::fallback(format!(
                        "rate limit nearly exhausted for {platform}: {} remaining until {}",
                        snapshot.remaining,
                        snapshot.reset_at.to_rfc3339()
                    ))
                }
                _ => FallbackDecision::direct(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::rate_limit::{REMAINING_HEADER, RESET_HEADER};
    use reqwest::header::{HeaderMap, HeaderValue};

    fn t0() -> DateTime<Utc> {
        "2024-06-01T00:00:00Z".parse().unwrap()
    }

    fn rate_headers(remaining: &str, reset: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REMAINING_HEADER, HeaderValue::from_str(remaining).unwrap());
        headers.insert(RESET_HEADER, HeaderValue::from_str(reset).unwrap());
        headers
    }

    #[test]
    fn no_signals_means_no_fallback() {
        let resilience = Resilience::default();
        let decision = resilience.should_use_fallback_at(Platform::Reddit, t0());
        assert!(!decision.use_fallback);
        assert_eq!(decision.reason, None);
    }

    #[test]
    fn open_breaker_makes_fallback_mandatory_regardless_of_quota() {
        let resilience = Resilience::default();
        // Plenty of quota left.
        resilience
            .rate_limits
            .update_at(Platform::Reddit, &rate_headers("500", "600"), t0());
        for _ in 0..5 {
            resilience.breakers.record_failure_at(Platform::Reddit, t0());
        }

        let decision = resilience.should_use_fallback_at(Platform::Reddit, t0() + chrono::TimeDelta::seconds(1));
        assert!(decision.use_fallback);
        assert!(decision.reason.unwrap().contains("circuit open"));
    }

    #[test]
    fn low_quota_recommends_fallback_with_closed_breaker() {
        let resilience = Resilience::default();
        resilience
            .rate_limits
            .update_at(Platform::Reddit, &rate_headers("3", "600"), t0());

        let decision = resilience.should_use_fallback_at(Platform::Reddit, t0());
        assert!(decision.use_fallback);
        assert!(decision.reason.unwrap().contains("rate limit"));
    }

    #[test]
    fn quota_floor_is_inclusive() {
        let resilience = Resilience::default();
        resilience
            .rate_limits
            .update_at(Platform::Reddit, &rate_headers("5", "600"), t0());
        assert!(resilience.should_use_fallback_at(Platform::Reddit, t0()).use_fallback);

        resilience
            .rate_limits
            .update_at(Platform::Reddit, &rate_headers("6", "600"), t0());
        assert!(!resilience.should_use_fallback_at(Platform::Reddit, t0()).use_fallback);
    }

    #[test]
    fn expired_reset_window_clears_the_recommendation() {
        let resilience = Resilience::default();
        resilience
            .rate_limits
            .update_at(Platform::Reddit, &rate_headers("2", "30"), t0());

        let later = t0() + chrono::TimeDelta::seconds(31);
        assert!(!resilience.should_use_fallback_at(Platform::Reddit, later).use_fallback);
    }
}
