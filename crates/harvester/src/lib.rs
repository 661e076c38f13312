//! Data acquisition layer for consumer-feedback platforms.
//!
//! Ten surfaces (Google Reviews, Trustpilot, App Store, Play Store, Quora,
//! YouTube, G2, Yelp, Amazon, Reddit) are harvested through hosted actor
//! jobs; Reddit additionally has a free primary API with automatic fallback
//! to its actor, and Hacker News is searched directly through Algolia.
//! Every surface emits the same [`NormalizedItem`] record.
//!
//! Resilience is handled by a per-platform circuit breaker and rate-limit
//! tracker ([`Resilience`]) that the Reddit orchestrator consults before
//! choosing a path.

pub mod actor;
pub mod adapter;
pub mod config;
pub mod error;
pub mod item;
pub mod normalize;
pub mod platforms;
pub mod resilience;

pub use actor::{ActorClient, ActorRun, RunStatus};
pub use adapter::{Adapter, PlatformAdapter};
pub use config::ActorConfig;
pub use error::HarvesterError;
pub use item::{ItemAttributes, NormalizedItem, Platform};
pub use platforms::AdapterRegistry;
pub use resilience::{
    BreakerConfig, BreakerPhase, BreakerVerdict, CircuitBreakerRegistry, FallbackDecision,
    HealthStatus, PlatformHealth, RateLimitSnapshot, RateLimitTracker, Resilience,
};
