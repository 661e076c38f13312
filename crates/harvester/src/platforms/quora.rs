use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "epctex~quora-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["answerId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["content", "text", "answer"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["author.name", "authorName"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["publishedAt", "creationTime"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["url", "answerUrl"],
        },
        FieldRule {
            field: ItemField::Title,
            sources: &["question", "questionText"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["upvotes", "numUpvotes"],
        },
        FieldRule {
            field: ItemField::CommentCount,
            sources: &["numComments"],
        },
    ],
};

pub struct QuoraAdapter {
    adapter: Adapter,
}

impl QuoraAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::Quora, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for QuoraAdapter {
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
            format!("https://www.quora.com/{}", target.trim_matches('/'))
        };
        Ok(json!({
            "startUrls": [{ "url": url }],
            "maxItems": max_items,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActorConfig;

    fn adapter() -> QuoraAdapter {
        QuoraAdapter::new(Arc::new(ActorClient::new(ActorConfig::new("t")).unwrap()))
    }

    #[test]
    fn question_slug_becomes_a_quora_url() {
        let input = adapter()
            .build_input("What-is-the-best-CRM", 10)
            .unwrap();
        assert_eq!(
            input["startUrls"][0]["url"],
            "https://www.quora.com/What-is-the-best-CRM"
        );
    }

    #[test]
    fn full_urls_pass_through() {
        let url = "https://www.quora.com/What-is-the-best-CRM";
        let input = adapter().build_input(url, 10).unwrap();
        assert_eq!(input["startUrls"][0]["url"], url);
    }
}
