use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use crate::actor::ActorClient;
use crate::adapter::{Adapter, PlatformAdapter};
use crate::error::HarvesterError;
use crate::item::Platform;
use crate::normalize::{FieldRule, ItemField, MappingTable};

const ACTOR_ID: &str = "streamers~youtube-comments-scraper";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["cid", "commentId", "id"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["comment", "text"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["author", "authorText", "channelName"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["publishedAt", "date"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["commentUrl", "url"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["voteCount", "likes"],
        },
    ],
};

/// Pull the video id out of a watch URL, a short link, or accept a bare id.
pub(crate) fn extract_video_id(target: &str) -> Result<String, HarvesterError> {
    let target = target.trim();
    if !target.contains("youtube.com") && !target.contains("youtu.be") {
        return Ok(target.to_string());
    }

    let with_scheme = if target.contains("://") {
        target.to_string()
    } else {
        format!("https://{target}")
    };
    let url = Url::parse(&with_scheme).map_err(|_| HarvesterError::InvalidIdentifier {
        platform: Platform::YouTube,
        input: target.to_string(),
    })?;

    let video_id = if url.host_str().is_some_and(|h| h.ends_with("youtu.be")) {
        // Short links carry the id as the path.
        url.path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    } else {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    };

    video_id.ok_or_else(|| HarvesterError::InvalidIdentifier {
        platform: Platform::YouTube,
        input: target.to_string(),
    })
}

pub struct YouTubeAdapter {
    adapter: Adapter,
}

impl YouTubeAdapter {
    pub fn new(client: Arc<ActorClient>) -> Self {
        Self {
            adapter: Adapter::new(Platform::YouTube, ACTOR_ID, client),
        }
    }
}

#[async_trait]
impl PlatformAdapter for YouTubeAdapter {
    fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn mapping(&self) -> &'static MappingTable {
        &MAPPING
    }

    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError> {
        let video_id = extract_video_id(target)?;
        Ok(json!({
            "startUrls": [{ "url": format!("https://www.youtube.com/watch?v={video_id}") }],
            "maxComments": max_items,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_url_yields_the_v_parameter() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn short_link_yields_the_path_segment() {
        let id = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn schemeless_short_link_still_parses() {
        let id = extract_video_id("youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn bare_id_passes_through() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn watch_url_without_v_is_invalid() {
        let err = extract_video_id("https://www.youtube.com/watch?list=PL123").unwrap_err();
        assert!(matches!(
            err,
            HarvesterError::InvalidIdentifier {
                platform: Platform::YouTube,
                ..
            }
        ));
    }
}
