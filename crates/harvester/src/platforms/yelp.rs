use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "tri_angle~yelp-review-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["reviewId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["text", "comment.text"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["userName", "user.name"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["date", "localizedDate"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["reviewUrl", "url"],
        },
        FieldRule {
            field: ItemField::Rating,
            sources: &["rating", "stars"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["usefulCount"],
        },
    ],
};

pub struct YelpAdapter {
    adapter: Adapter,
}

impl YelpAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::Yelp, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for YelpAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        let target = target.trim();
        let url = if target.contains("://") {
            target.to_string()
        } else {
            format!("https://www.yelp.com/biz/{}", target.trim_matches('/'))
        };
        Ok(json!({
            "startUrls": [{ "url": url }],
            "maxReviews": max_items,
        }))
    }
}
