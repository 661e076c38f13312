use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "nikita-sviridenko~trustpilot-reviews-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["reviewId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["text", "body", "reviewBody"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["consumerName", "author", "consumer.displayName"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["publishedDate", "date"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["reviewUrl", "url"],
        },
        FieldRule {
            field: ItemField::Title,
            sources: &["title", "reviewTitle"],
        },
        FieldRule {
            field: ItemField::Rating,
            sources: &["rating", "stars"],
        },
        FieldRule {
            field: ItemField::VerifiedPurchase,
            sources: &["verified", "isVerified"],
        },
    ],
};

/// Identifiers without an `https://` prefix are taken as company domains and
/// rewritten to the canonical review-page URL.
pub(crate) fn canonical_review_url(target: &str) -> String {
    let target = target.trim();
    if target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://www.trustpilot.com/review/{target}")
    }
}

pub struct TrustpilotAdapter {
    adapter: Adapter,
}

impl TrustpilotAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::Trustpilot, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for TrustpilotAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        Ok(json!({
            "startUrls": [{ "url": canonical_review_url(target) }],
            "maxReviews": max_items,
        }))
    }
}
