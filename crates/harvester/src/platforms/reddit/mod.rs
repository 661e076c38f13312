//! Reddit is the one dual-path surface: a free primary JSON API with an
//! actor-backed paid fallback, routed by the shared resilience registries.

mod orchestrator;
mod primary;

pub use orchestrator::{RedditOrchestrator, RedditOutcome};
pub use primary::{RedditPrimaryClient, RedditSort};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "trudax~reddit-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["id", "postId"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["body", "text", "title"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["username", "author"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["createdAt", "created_utc"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["url", "link"],
        },
        FieldRule {
            field: ItemField::Title,
            sources: &["title"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["upVotes", "score"],
        },
        FieldRule {
            field: ItemField::CommentCount,
            sources: &["numberOfComments", "num_comments"],
        },
    ],
};

/// Accept `rust`, `r/rust`, or a full URL; produce the canonical subreddit URL.
pub(crate) fn canonical_subreddit_url(target: &str) -> String {
    let target = target.trim();
    if target.contains("://") {
        return target.to_string();
    }
    let name = target.trim_start_matches('/').trim_start_matches("r/");
    format!("https://www.reddit.com/r/{name}/")
}

pub(crate) fn subreddit_name(target: &str) -> String {
    target
        .trim()
        .trim_start_matches('/')
        .trim_start_matches("r/")
        .trim_end_matches('/')
        .to_string()
}

/// Paid fallback path, used when the primary API is tripped or throttled.
pub struct RedditAdapter {
    adapter: Adapter,
}

impl RedditAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::Reddit, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for RedditAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        Ok(json!({
            "startUrls": [{ "url": canonical_subreddit_url(target) }],
            "maxItems": max_items,
            "skipComments": false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_and_r_prefix_canonicalize_identically() {
        assert_eq!(
            canonical_subreddit_url("rust"),
            "https://www.reddit.com/r/rust/"
        );
        assert_eq!(
            canonical_subreddit_url("r/rust"),
            "https://www.reddit.com/r/rust/"
        );
    }

    #[test]
    fn full_urls_pass_through() {
        let url = "https://www.reddit.com/r/rust/";
        assert_eq!(canonical_subreddit_url(url), url);
    }

    #[test]
    fn subreddit_name_strips_decorations() {
        assert_eq!(subreddit_name("r/rust/"), "rust");
        assert_eq!(subreddit_name("rust"), "rust");
    }
}
