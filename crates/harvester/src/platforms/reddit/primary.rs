//! Free primary path: Reddit's public listing JSON.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, USER_AGENT};
use serde_json::Value;

use super::subreddit_name;
use crate::error::HarvesterError;
use crate::item::{NormalizedItem, Platform};
use crate::normalize::{FieldRule, ItemField, MappingTable, normalize};

pub(crate) const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Reddit rejects default client UAs; a descriptive custom one is required.
const REDDIT_UA: &str = "platform-harvester/0.1 (content monitoring bot)";

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["id", "name"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["selftext", "body", "title"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["author"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["created_utc", "created"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["permalink", "url"],
        },
        FieldRule {
            field: ItemField::Title,
            sources: &["title"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["ups", "score"],
        },
        FieldRule {
            field: ItemField::CommentCount,
            sources: &["num_comments"],
        },
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedditSort {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl RedditSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedditSort::Hot => "hot",
            RedditSort::New => "new",
            RedditSort::Top => "top",
            RedditSort::Rising => "rising",
        }
    }
}

impl Display for RedditSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedditSort {
    type Err = HarvesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(RedditSort::Hot),
            "new" => Ok(RedditSort::New),
            "top" => Ok(RedditSort::Top),
            "rising" => Ok(RedditSort::Rising),
            other => Err(HarvesterError::UnknownPlatform {
                input: format!("reddit sort `{other}`"),
            }),
        }
    }
}

/// Outcome of one primary call that at least produced a response. The headers
/// are surfaced separately so the caller can feed the rate-limit tracker even
/// when the body is an error.
pub struct PrimaryResponse {
    pub headers: HeaderMap,
    pub result: Result<Vec<NormalizedItem>, HarvesterError>,
}

pub struct RedditPrimaryClient {
    http: Client,
    base_url: String,
}

impl RedditPrimaryClient {
    pub fn new() -> Result<Self, HarvesterError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, HarvesterError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one listing page. A transport-level failure is the outer error;
    /// an HTTP-level failure still yields the response headers.
    pub async fn fetch(
        &self,
        subreddit: &str,
        sort: RedditSort,
        limit: u32,
    ) -> Result<PrimaryResponse, HarvesterError> {
        let name = subreddit_name(subreddit);
        let url = format!("{}/r/{}/{}.json", self.base_url, name, sort.as_str());
        let response = self
            .http
            .get(&url)
            .header(USER_AGENT, REDDIT_UA)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            return Ok(PrimaryResponse {
                headers,
                result: Err(HarvesterError::HttpStatus { status, url }),
            });
        }

        let result = match response.json::<Value>().await {
            Ok(body) => Ok(parse_listing(&body)),
            Err(e) => Err(e.into()),
        };
        Ok(PrimaryResponse { headers, result })
    }
}

fn parse_listing(body: &Value) -> Vec<NormalizedItem> {
    let children = body["data"]["children"].as_array();
    children
        .map(|children| {
            children
                .iter()
                .map(|child| {
                    let mut item = normalize(Platform::Reddit, &MAPPING, &child["data"]);
                    // Listing permalinks are site-relative.
                    if item.source_url.starts_with('/') {
                        item.source_url = format!("https://www.reddit.com{}", item.source_url);
                    }
                    item
                })
                .collect()
        })
        .unwrap_or_default()
}
