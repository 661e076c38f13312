use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "epctex~appstore-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["reviewId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["text", "review", "body"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["userName", "author"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["date", "updated"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["url"],
        },
        FieldRule {
            field: ItemField::Title,
            sources: &["title"],
        },
        FieldRule {
            field: ItemField::Rating,
            sources: &["rating", "score"],
        },
    ],
};

/// Strip a leading `id` token from store identifiers like `id1459969523`.
pub(crate) fn extract_app_id(target: &str) -> Result<String, HarvesterError> {
    let target = target.trim();
    let app_id = target.strip_prefix("id").unwrap_or(target);
    if !app_id.is_empty() && app_id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(app_id.to_string())
    } else {
        Err(HarvesterError::InvalidIdentifier {
            platform: Platform::AppStore,
            input: target.to_string(),
        })
    }
}

pub struct AppStoreAdapter {
    adapter: Adapter,
}

impl AppStoreAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::AppStore, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for AppStoreAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        // Full store URLs pass through unmodified; bare ids are resolved by
        // the actor itself.
        let input = if target.contains("://") {
            json!({
                "startUrls": [{ "url": target.trim() }],
                "maxItems": max_items,
            })
        } else {
            json!({
                "appId": extract_app_id(target)?,
                "maxItems": max_items,
            })
        };
        Ok(input)
    }
}
