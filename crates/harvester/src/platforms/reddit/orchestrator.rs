//! Primary/fallback routing for Reddit.
//!
//! Every call first consults the fallback policy; a tripped breaker or a
//! nearly exhausted rate-limit window routes straight to the paid actor path.
//! Otherwise the free API is tried, its headers recorded, and its failures
//! converted into a fallback attempt. The outcome is an explicit
//! three-variant type so callers (and tests) never fish routing decisions out
//! of error chains.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::primary::{RedditPrimaryClient, RedditSort};
use super::RedditAdapter;
use crate::adapter::PlatformAdapter;
use crate::item::{NormalizedItem, Platform};
use crate::resilience::Resilience;

/// Result of one orchestrated fetch, tagged with its origin.
#[derive(Debug, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RedditOutcome {
    Primary {
        items: Vec<NormalizedItem>,
    },
    Fallback {
        items: Vec<NormalizedItem>,
        reason: String,
    },
    BothFailed {
        primary: String,
        fallback: String,
    },
}

impl RedditOutcome {
    pub fn items(&self) -> Option<&[NormalizedItem]> {
        match self {
            RedditOutcome::Primary { items } | RedditOutcome::Fallback { items, .. } => {
                Some(items)
            }
            RedditOutcome::BothFailed { .. } => None,
        }
    }
}

pub struct RedditOrchestrator {
    primary: RedditPrimaryClient,
    fallback: Option<RedditAdapter>,
    resilience: Arc<Resilience>,
}

impl RedditOrchestrator {
    pub fn new(
        primary: RedditPrimaryClient,
        fallback: Option<RedditAdapter>,
        resilience: Arc<Resilience>,
    ) -> Self {
        Self {
            primary,
            fallback,
            resilience,
        }
    }

    pub async fn fetch(&self, subreddit: &str, sort: RedditSort, limit: u32) -> RedditOutcome {
        let decision = self.resilience.should_use_fallback(Platform::Reddit);
        if decision.use_fallback {
            let reason = decision
                .reason
                .unwrap_or_else(|| "fallback requested".to_string());
            info!(subreddit, reason = %reason, "skipping primary api");
            return self.run_fallback(subreddit, limit, reason).await;
        }

        match self.primary.fetch(subreddit, sort, limit).await {
            Ok(response) => {
                // Rate-limit headers count whether the body succeeded or not.
                self.resilience
                    .rate_limits
                    .update(Platform::Reddit, &response.headers);

                match response.result {
                    Ok(items) => {
                        self.resilience.breakers.record_success(Platform::Reddit);
                        RedditOutcome::Primary { items }
                    }
                    Err(e) => {
                        warn!(subreddit, error = %e, "primary api returned an error");
                        self.resilience.breakers.record_failure(Platform::Reddit);
                        self.run_fallback(subreddit, limit, format!("primary api failed: {e}"))
                            .await
                    }
                }
            }
            Err(e) => {
                warn!(subreddit, error = %e, "primary api unreachable");
                self.resilience.breakers.record_failure(Platform::Reddit);
                self.run_fallback(subreddit, limit, format!("primary api unreachable: {e}"))
                    .await
            }
        }
    }

    async fn run_fallback(&self, subreddit: &str, limit: u32, reason: String) -> RedditOutcome {
        let Some(adapter) = &self.fallback else {
            return RedditOutcome::BothFailed {
                primary: reason,
                fallback: "actor provider not configured".to_string(),
            };
        };

        match adapter.fetch(subreddit, limit).await {
            Ok(items) => {
                info!(subreddit, count = items.len(), "fallback path delivered");
                RedditOutcome::Fallback { items, reason }
            }
            Err(e) => RedditOutcome::BothFailed {
                primary: reason,
                fallback: e.to_string(),
            },
        }
    }
}
