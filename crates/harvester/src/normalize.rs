//! Declarative field-coalescing normalization.
//!
//! Every platform returns its own raw JSON shape; a [`MappingTable`] describes,
//! per target field, the ordered candidate source keys to probe. The first
//! present key wins. This keeps the normalization rules data-driven and
//! testable without any HTTP involved.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::item::{NormalizedItem, Platform};

/// Target fields a mapping rule can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    ExternalId,
    Text,
    Author,
    PostedAt,
    SourceUrl,
    Title,
    Rating,
    Votes,
    CommentCount,
    VerifiedPurchase,
    Pros,
    Cons,
}

/// Ordered candidate source keys for one target field.
///
/// Source keys may be dotted paths into nested objects, e.g. `"author.name"`.
#[derive(Debug)]
pub struct FieldRule {
    pub field: ItemField,
    pub sources: &'static [&'static str],
}

#[derive(Debug)]
pub struct MappingTable {
    pub rules: &'static [FieldRule],
}

/// Map one raw provider item into the stable record shape.
///
/// Missing required text fields default to the empty string; optional
/// attributes stay absent. A candidate key whose value cannot be coerced is
/// skipped in favor of the next candidate.
pub fn normalize(platform: Platform, table: &MappingTable, raw: &Value) -> NormalizedItem {
    let mut item = NormalizedItem::new(platform);
    for rule in table.rules {
        for source in rule.sources {
            let Some(value) = lookup(raw, source) else {
                continue;
            };
            if apply(&mut item, rule.field, value) {
                break;
            }
        }
    }
    item
}

fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = raw;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    if current.is_null() { None } else { Some(current) }
}

fn apply(item: &mut NormalizedItem, field: ItemField, value: &Value) -> bool {
    match field {
        ItemField::ExternalId => assign_string(&mut item.external_id, value),
        ItemField::Text => assign_string(&mut item.text, value),
        ItemField::Author => assign_string(&mut item.author, value),
        ItemField::SourceUrl => assign_string(&mut item.source_url, value),
        ItemField::PostedAt => assign_option(&mut item.posted_at, value_as_datetime(value)),
        ItemField::Title => assign_option(&mut item.attributes.title, value_as_string(value)),
        ItemField::Rating => assign_option(&mut item.attributes.rating, value_as_f64(value)),
        ItemField::Votes => assign_option(&mut item.attributes.votes, value_as_i64(value)),
        ItemField::CommentCount => {
            assign_option(&mut item.attributes.comment_count, value_as_i64(value))
        }
        ItemField::VerifiedPurchase => {
            assign_option(&mut item.attributes.verified_purchase, value_as_bool(value))
        }
        ItemField::Pros => assign_option(&mut item.attributes.pros, value_as_string(value)),
        ItemField::Cons => assign_option(&mut item.attributes.cons, value_as_string(value)),
    }
}

fn assign_string(slot: &mut String, value: &Value) -> bool {
    match value_as_string(value) {
        Some(s) => {
            *slot = s;
            true
        }
        None => false,
    }
}

fn assign_option<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub(crate) fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

pub(crate) fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    }
}

pub(crate) fn value_as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            s.parse::<f64>().ok().and_then(epoch_to_datetime)
        }
        Value::Number(n) => n.as_f64().and_then(epoch_to_datetime),
        _ => None,
    }
}

fn epoch_to_datetime(epoch: f64) -> Option<DateTime<Utc>> {
    // Values past ~2001-09 in milliseconds exceed this in seconds; treat
    // anything that large as milliseconds.
    if epoch >= 1_000_000_000_000.0 {
        DateTime::from_timestamp_millis(epoch as i64)
    } else {
        DateTime::from_timestamp(epoch as i64, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static TABLE: MappingTable = MappingTable {
        rules: &[
            FieldRule {
                field: ItemField::ExternalId,
                sources: &["reviewId", "id"],
            },
            FieldRule {
                field: ItemField::Text,
                sources: &["text", "body", "reviewText"],
            },
            FieldRule {
                field: ItemField::Author,
                sources: &["author.name", "userName"],
            },
            FieldRule {
                field: ItemField::Rating,
                sources: &["rating", "stars"],
            },
            FieldRule {
                field: ItemField::PostedAt,
                sources: &["publishedAt", "created_utc"],
            },
            FieldRule {
                field: ItemField::VerifiedPurchase,
                sources: &["verified"],
            },
        ],
    };

    #[test]
    fn first_present_candidate_wins() {
        let raw = json!({ "body": "from body", "reviewText": "from reviewText", "id": "42" });
        let item = normalize(Platform::Amazon, &TABLE, &raw);
        assert_eq!(item.text, "from body");
        assert_eq!(item.external_id, "42");
    }

    #[test]
    fn earlier_candidate_shadows_later_one() {
        let raw = json!({ "text": "primary", "body": "secondary" });
        let item = normalize(Platform::Amazon, &TABLE, &raw);
        assert_eq!(item.text, "primary");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let item = normalize(Platform::Amazon, &TABLE, &json!({}));
        assert_eq!(item.text, "");
        assert_eq!(item.external_id, "");
        assert_eq!(item.attributes.rating, None);
        assert_eq!(item.attributes.verified_purchase, None);
        assert_eq!(item.posted_at, None);
    }

    #[test]
    fn dotted_paths_reach_nested_objects() {
        let raw = json!({ "author": { "name": "sam" } });
        let item = normalize(Platform::Amazon, &TABLE, &raw);
        assert_eq!(item.author, "sam");
    }

    #[test]
    fn numeric_coercion_accepts_strings_and_numbers() {
        let item = normalize(Platform::Amazon, &TABLE, &json!({ "rating": "4.5" }));
        assert_eq!(item.attributes.rating, Some(4.5));
        let item = normalize(Platform::Amazon, &TABLE, &json!({ "stars": 3 }));
        assert_eq!(item.attributes.rating, Some(3.0));
    }

    #[test]
    fn uncoercible_candidate_is_skipped_for_the_next() {
        // `rating` holds an object, so the `stars` candidate should win.
        let raw = json!({ "rating": { "max": 5 }, "stars": 2 });
        let item = normalize(Platform::Amazon, &TABLE, &raw);
        assert_eq!(item.attributes.rating, Some(2.0));
    }

    #[test]
    fn timestamps_parse_from_rfc3339_and_epochs() {
        let item = normalize(
            Platform::Reddit,
            &TABLE,
            &json!({ "publishedAt": "2024-05-01T12:00:00Z" }),
        );
        assert_eq!(item.posted_at.unwrap().timestamp(), 1_714_564_800);

        let item = normalize(Platform::Reddit, &TABLE, &json!({ "created_utc": 1714564800.0 }));
        assert_eq!(item.posted_at.unwrap().timestamp(), 1_714_564_800);

        let item = normalize(
            Platform::Reddit,
            &TABLE,
            &json!({ "created_utc": 1714564800000i64 }),
        );
        assert_eq!(item.posted_at.unwrap().timestamp(), 1_714_564_800);
    }

    #[test]
    fn null_values_do_not_count_as_present() {
        let raw = json!({ "text": null, "body": "fallback" });
        let item = normalize(Platform::Amazon, &TABLE, &raw);
        assert_eq!(item.text, "fallback");
    }
}
