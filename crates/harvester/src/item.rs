use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HarvesterError;

/// The surfaces this layer can acquire content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "google")]
    GoogleReviews,
    #[serde(rename = "trustpilot")]
    Trustpilot,
    #[serde(rename = "appstore")]
    AppStore,
    #[serde(rename = "playstore")]
    PlayStore,
    #[serde(rename = "quora")]
    Quora,
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "g2")]
    G2,
    #[serde(rename = "yelp")]
    Yelp,
    #[serde(rename = "amazon")]
    Amazon,
    #[serde(rename = "reddit")]
    Reddit,
    #[serde(rename = "hackernews")]
    HackerNews,
}

impl Platform {
    pub const ALL: [Platform; 11] = [
        Platform::GoogleReviews,
        Platform::Trustpilot,
        Platform::AppStore,
        Platform::PlayStore,
        Platform::Quora,
        Platform::YouTube,
        Platform::G2,
        Platform::Yelp,
        Platform::Amazon,
        Platform::Reddit,
        Platform::HackerNews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GoogleReviews => "google",
            Platform::Trustpilot => "trustpilot",
            Platform::AppStore => "appstore",
            Platform::PlayStore => "playstore",
            Platform::Quora => "quora",
            Platform::YouTube => "youtube",
            Platform::G2 => "g2",
            Platform::Yelp => "yelp",
            Platform::Amazon => "amazon",
            Platform::Reddit => "reddit",
            Platform::HackerNews => "hackernews",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = HarvesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HarvesterError::UnknownPlatform {
                input: s.to_string(),
            })
    }
}

/// One piece of content in the stable, platform-independent shape the rest of
/// the system consumes.
///
/// Common fields are always present (empty string when the provider omitted
/// them); anything platform-specific lives in [`ItemAttributes`] as optionals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    pub platform: Platform,
    pub external_id: String,
    pub text: String,
    pub author: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub source_url: String,
    #[serde(flatten)]
    pub attributes: ItemAttributes,
}

impl NormalizedItem {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            external_id: String::new(),
            text: String::new(),
            author: String::new(),
            posted_at: None,
            source_url: String::new(),
            attributes: ItemAttributes::default(),
        }
    }
}

/// Platform-specific optional attributes of a normalized item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_purchase: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pros: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cons: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_round_trips_through_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn unknown_platform_is_rejected() {
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn absent_attributes_are_not_serialized() {
        let item = NormalizedItem::new(Platform::Yelp);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("rating").is_none());
        assert_eq!(json["platform"], "yelp");
    }
}
