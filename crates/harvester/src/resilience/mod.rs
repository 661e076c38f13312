//! Shared resilience state: circuit breakers, rate-limit snapshots, and the
//! routing policy derived from them.
//!
//! All state lives inside an owned [`Resilience`] value so tests get isolated
//! registries and callers decide the sharing scope (typically one
//! `Arc<Resilience>` per process).

pub mod circuit_breaker;
pub mod fallback;
pub mod health;
pub mod rate_limit;

pub use circuit_breaker::{
    BreakerConfig, BreakerPhase, BreakerState, BreakerVerdict, CircuitBreakerRegistry,
};
pub use fallback::{FallbackDecision, RATE_LIMIT_FLOOR};
pub use health::{HealthStatus, PlatformHealth};
pub use rate_limit::{RateLimitSnapshot, RateLimitTracker};

/// Owned registry bundle keyed by platform.
#[derive(Default)]
pub struct Resilience {
    pub breakers: CircuitBreakerRegistry,
    pub rate_limits: RateLimitTracker,
}

impl Resilience {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            breakers: CircuitBreakerRegistry::new(config),
            rate_limits: RateLimitTracker::new(),
        }
    }
}
