//! Hacker News via the Algolia search API.
//!
//! This surface is generous enough that it bypasses the breaker and rate-limit
//! machinery entirely. Multiple keywords are merged into one OR query so a
//! watchlist of terms costs a single request per poll.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use reqwest::Client;
use serde_json::Value;

use crate::error::HarvesterError;
use crate::item::{NormalizedItem, Platform};
use crate::normalize::{FieldRule, ItemField, MappingTable, normalize};

pub(crate) const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";

const DEFAULT_HITS_PER_PAGE: u32 = 50;

static MAPPING: MappingTable = MappingTable {
    rules: &[
        FieldRule {
            field: ItemField::ExternalId,
            sources: &["objectID"],
        },
        FieldRule {
            field: ItemField::Text,
            sources: &["comment_text", "story_text", "title"],
        },
        FieldRule {
            field: ItemField::Author,
            sources: &["author"],
        },
        FieldRule {
            field: ItemField::PostedAt,
            sources: &["created_at", "created_at_i"],
        },
        FieldRule {
            field: ItemField::SourceUrl,
            sources: &["url", "story_url"],
        },
        FieldRule {
            field: ItemField::Title,
            sources: &["title", "story_title"],
        },
        FieldRule {
            field: ItemField::Votes,
            sources: &["points"],
        },
        FieldRule {
            field: ItemField::CommentCount,
            sources: &["num_comments"],
        },
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HnTag {
    Story,
    Comment,
    AskHn,
    ShowHn,
    FrontPage,
}

impl HnTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            HnTag::Story => "story",
            HnTag::Comment => "comment",
            HnTag::AskHn => "ask_hn",
            HnTag::ShowHn => "show_hn",
            HnTag::FrontPage => "front_page",
        }
    }
}

impl Display for HnTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HnTag {
    type Err = HarvesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "story" => Ok(HnTag::Story),
            "comment" => Ok(HnTag::Comment),
            "ask_hn" | "ask" => Ok(HnTag::AskHn),
            "show_hn" | "show" => Ok(HnTag::ShowHn),
            "front_page" | "frontpage" => Ok(HnTag::FrontPage),
            other => Err(HarvesterError::UnknownPlatform {
                input: format!("hacker news tag `{other}`"),
            }),
        }
    }
}

/// Relevance-ranked search vs. a strictly chronological listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HnOrder {
    #[default]
    Relevance,
    Newest,
}

impl HnOrder {
    fn endpoint(&self) -> &'static str {
        match self {
            HnOrder::Relevance => "search",
            HnOrder::Newest => "search_by_date",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HnSearchQuery {
    pub keywords: Vec<String>,
    pub tags: Vec<HnTag>,
    /// Only return items created within the last N hours.
    pub window_hours: Option<u64>,
    pub order: HnOrder,
    pub hits_per_page: Option<u32>,
}

impl HnSearchQuery {
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn tag(mut self, tag: HnTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn within_hours(mut self, hours: u64) -> Self {
        self.window_hours = Some(hours);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = HnOrder::Newest;
        self
    }

    /// Join all keywords into one OR expression. Multi-word keywords are
    /// quoted so they match as phrases.
    pub fn merged_query(&self) -> String {
        self.keywords
            .iter()
            .map(|kw| {
                let kw = kw.trim();
                if kw.contains(' ') {
                    format!("\"{kw}\"")
                } else {
                    kw.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    fn tags_param(&self) -> Option<String> {
        match self.tags.as_slice() {
            [] => None,
            [one] => Some(one.as_str().to_string()),
            many => {
                // Parenthesized tags are OR-combined by the API.
                let joined = many
                    .iter()
                    .map(HnTag::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                Some(format!("({joined})"))
            }
        }
    }
}

pub struct HackerNewsClient {
    http: Client,
    base_url: String,
}

impl HackerNewsClient {
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

    pub async fn search(
        &self,
        query: &HnSearchQuery,
    ) -> Result<Vec<NormalizedItem>, HarvesterError> {
        let url = format!("{}/{}", self.base_url, query.order.endpoint());
        let mut params: Vec<(&str, String)> = vec![("query", query.merged_query())];
        if let Some(tags) = query.tags_param() {
            params.push(("tags", tags));
        }
        if let Some(hours) = query.window_hours {
            let cutoff = Utc::now() - TimeDelta::hours(hours as i64);
            params.push((
                "numericFilters",
                format!("created_at_i>{}", cutoff.timestamp()),
            ));
        }
        params.push((
            "hitsPerPage",
            query
                .hits_per_page
                .unwrap_or(DEFAULT_HITS_PER_PAGE)
                .to_string(),
        ));

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        Ok(parse_hits(&body))
    }
}

fn parse_hits(body: &Value) -> Vec<NormalizedItem> {
    body["hits"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .map(|hit| {
                    let mut item = normalize(Platform::HackerNews, &MAPPING, hit);
                    // Comments and Ask HN posts carry no url of their own.
                    if item.source_url.is_empty() && !item.external_id.is_empty() {
                        item.source_url =
                            format!("https://news.ycombinator.com/item?id={}", item.external_id);
                    }
                    item
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keywords_merge_into_one_or_query() {
        let query = HnSearchQuery::new(["rust", "memory safety", "borrow checker"]);
        assert_eq!(
            query.merged_query(),
            "rust OR \"memory safety\" OR \"borrow checker\""
        );
    }

    #[test]
    fn single_tag_is_bare_and_multiple_are_parenthesized() {
        let single = HnSearchQuery::new(["x"]).tag(HnTag::Story);
        assert_eq!(single.tags_param().as_deref(), Some("story"));

        let multi = HnSearchQuery::new(["x"]).tag(HnTag::AskHn).tag(HnTag::ShowHn);
        assert_eq!(multi.tags_param().as_deref(), Some("(ask_hn,show_hn)"));

        assert_eq!(HnSearchQuery::new(["x"]).tags_param(), None);
    }

    #[test]
    fn newest_first_switches_endpoints() {
        assert_eq!(HnOrder::Relevance.endpoint(), "search");
        assert_eq!(HnSearchQuery::new(["x"]).newest_first().order.endpoint(), "search_by_date");
    }

    #[test]
    fn tag_aliases_parse() {
        assert_eq!("ask".parse::<HnTag>().unwrap(), HnTag::AskHn);
        assert_eq!("front_page".parse::<HnTag>().unwrap(), HnTag::FrontPage);
        assert!("poll2".parse::<HnTag>().is_err());
    }

    #[test]
    fn hits_normalize_with_item_page_fallback() {
        let body = json!({
            "hits": [
                {
                    "objectID": "39001234",
                    "title": "Show HN: A thing",
                    "author": "pg",
                    "created_at_i": 1714564800,
                    "points": 120,
                    "num_comments": 48
                },
                {
                    "objectID": "39001235",
                    "comment_text": "I tried this and it works.",
                    "author": "dang",
                    "created_at_i": 1714564900,
                    "story_url": "https://example.com/post"
                }
            ]
        });

        let items = parse_hits(&body);
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].source_url,
            "https://news.ycombinator.com/item?id=39001234"
        );
        assert_eq!(items[0].text, "Show HN: A thing");
        assert_eq!(items[0].attributes.votes, Some(120));
        assert_eq!(items[1].text, "I tried this and it works.");
        assert_eq!(items[1].source_url, "https://example.com/post");
    }

    #[test]
    fn empty_body_yields_no_items() {
        assert!(parse_hits(&json!({})).is_empty());
    }
}
