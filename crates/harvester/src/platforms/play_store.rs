use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "epctex~google-play-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["reviewId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["text", "content", "body"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["userName", "author"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["date", "at"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["url"],
        },
        FieldRule {
            field: ItemField::Rating,
            sources: &["score", "rating", "stars"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["thumbsUpCount"],
        },
    ],
};

/// Store URLs carry the package name in the `id` query parameter; anything
/// else is taken as the package name itself.
pub(crate) fn extract_package_name(target: &str) -> Result<String, HarvesterError> {
    let target = target.trim();
    if !target.contains("play.google.com") {
        return Ok(target.to_string());
    }

    let with_scheme = if target.contains("://") {
        target.to_string()
    } else {
        format!("https://{target}")
    };
    Url::parse(&with_scheme)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "id")
                .map(|(_, value)| value.into_owned())
        })
        .ok_or_else(|| HarvesterError::InvalidIdentifier {
            platform: Platform::PlayStore,
            input: target.to_string(),
        })
}

pub struct PlayStoreAdapter {
    adapter: Adapter,
}

impl PlayStoreAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::PlayStore, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for PlayStoreAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        Ok(json!({
            "appId": extract_package_name(target)?,
            "maxReviews": max_items,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_url_yields_the_id_parameter() {
        let package = extract_package_name(
            "https://play.google.com/store/apps/details?id=com.slack&hl=en",
        )
        .unwrap();
        assert_eq!(package, "com.slack");
    }

    #[test]
    fn bare_package_name_passes_through() {
        assert_eq!(extract_package_name("com.slack").unwrap(), "com.slack");
    }

    #[test]
    fn store_url_without_id_is_invalid() {
        assert!(extract_package_name("https://play.google.com/store/apps").is_err());
    }
}
