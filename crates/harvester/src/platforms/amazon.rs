use std::sync::Arc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "junglee~amazon-reviews-scraper";

/// ASINs appear after `/dp/`, `/gp/product/`, or `/product-reviews/` as a
/// ten-character alphanumeric token.
static ASIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/dp/|/gp/product/|/product-reviews/)([A-Za-z0-9]{10})").unwrap()
});

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["reviewId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["reviewDescription", "text", "body"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["reviewerName", "author"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["date", "reviewDate"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["reviewUrl", "url"],
        },
        FieldRule {
            field: ItemField::Title,
            sources: &["reviewTitle", "title"],
        },
        FieldRule {
            field: ItemField::Rating,
            sources: &["ratingScore", "rating", "stars"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["helpfulCount", "reviewReaction"],
        },
        FieldRule {
            field: ItemField::VerifiedPurchase,
            sources: &["verified", "isVerified", "verifiedPurchase"],
        },
    ],
};

/// Extract the ASIN from a product URL, or accept the raw string as one.
/// Either way the actor gets the identical canonical product URL.
pub(crate) fn canonical_product_url(target: &str) -> String {
    let target = target.trim();
    let asin = ASIN_REGEX
        .captures(target)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(target);
    format!("https://www.amazon.com/dp/{asin}")
}

pub struct AmazonAdapter {
    adapter: Adapter,
}

impl AmazonAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::Amazon, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for AmazonAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        Ok(json!({
            "productUrls": [{ "url": canonical_product_url(target) }],
            "maxReviews": max_items,
        }))
    }
}
