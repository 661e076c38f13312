use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "epctex~g2-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["reviewId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["text", "reviewText", "body"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["reviewerName", "author.name", "author"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["publishedAt", "date"],
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
            field: ItemField::Pros,
            sources: &["pros", "whatDoYouLikeBest"],
        },
        FieldRule {
            field: ItemField::Cons,
            sources: &["cons", "whatDoYouDislike"],
        },
    ],
};

/// Product slugs become product URLs; either way the reviews page suffix is
/// appended when not already present.
pub(crate) fn canonical_reviews_url(target: &str) -> String {
    let target = target.trim();
    let url = if target.contains("://") {
        target.trim_end_matches('/').to_string()
    } else {
        format!("https://www.g2.com/products/{}", target.trim_matches('/'))
    };

    if url.ends_with("/reviews") {
        url
    } else {
        format!("{url}/reviews")
    }
}

pub struct G2Adapter {
    adapter: Adapter,
}

impl G2Adapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::G2, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for G2Adapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        Ok(json!({
            "startUrls": [{ "url": canonical_reviews_url(target) }],
            "maxItems": max_items,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviews_suffix_is_appended_when_missing() {
        assert_eq!(
            canonical_reviews_url("https://www.g2.com/products/slack"),
            "https://www.g2.com/products/slack/reviews"
        );
    }

    #[test]
    fn existing_reviews_suffix_is_not_doubled() {
        assert_eq!(
            canonical_reviews_url("https://www.g2.com/products/slack/reviews"),
            "https://www.g2.com/products/slack/reviews"
        );
    }

    #[test]
    fn trailing_slash_does_not_confuse_the_suffix_check() {
        assert_eq!(
            canonical_reviews_url("https://www.g2.com/products/slack/"),
            "https://www.g2.com/products/slack/reviews"
        );
    }

    #[test]
    fn bare_slug_becomes_a_product_reviews_url() {
        assert_eq!(
            canonical_reviews_url("slack"),
            "https://www.g2.com/products/slack/reviews"
        );
    }
}
