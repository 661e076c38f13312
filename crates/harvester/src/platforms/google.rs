use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "compass~google-maps-reviews-scraper";

/// Place IDs carry this literal prefix; everything else is treated as a
/// Maps URL.
const PLACE_ID_PREFIX: &str = "ChI";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["reviewId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["text", "textTranslated", "snippet"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["name", "reviewerName", "author.name"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["publishedAtDate", "publishAt", "date"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["reviewUrl", "url"],
        },
        FieldRule {
            field: ItemField::Rating,
            sources: &["stars", "rating"],
        },
    ],
};

pub struct GoogleReviewsAdapter {
    adapter: Adapter,
}

impl GoogleReviewsAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::GoogleReviews, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for GoogleReviewsAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        let target = target.trim();
        let input = if target.starts_with(PLACE_ID_PREFIX) {
            json!({
                "placeIds": [target],
                "maxReviews": max_items,
                "language": "en",
            })
        } else {
            json!({
                "startUrls": [{ "url": target }],
                "maxReviews": max_items,
                "language": "en",
            })
        };
        Ok(input)
    }
}
