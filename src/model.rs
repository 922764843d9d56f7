use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::heuristics::date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Jobs,
    Internships,
    Hackathons,
    Projects,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Jobs,
        Category::Internships,
        Category::Hackathons,
        Category::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Jobs => "jobs",
            Category::Internships => "internships",
            Category::Hackathons => "hackathons",
            Category::Projects => "projects",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jobs" => Some(Category::Jobs),
            "internships" => Some(Category::Internships),
            "hackathons" => Some(Category::Hackathons),
            "projects" => Some(Category::Projects),
            _ => None,
        }
    }

    /// Unknown categories route to jobs.
    pub fn parse_or_default(s: &str) -> Category {
        Category::parse(s).unwrap_or(Category::Jobs)
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Category::Jobs => "jobs.json",
            Category::Internships => "internships.json",
            Category::Hackathons => "hackathons.json",
            Category::Projects => "projects.json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Jobs => "Jobs",
            Category::Internships => "Internships",
            Category::Hackathons => "Hackathons",
            Category::Projects => "Projects",
        }
    }

    pub fn listing_type(&self) -> ListingType {
        match self {
            Category::Jobs => ListingType::Job,
            Category::Internships => ListingType::Internship,
            Category::Hackathons => ListingType::Hackathon,
            Category::Projects => ListingType::Project,
        }
    }

    pub fn default_image(&self) -> String {
        format!("/images/opportunities/{}-default.svg", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingType {
    Job,
    Internship,
    Hackathon,
    Project,
}

impl ListingType {
    pub fn parse(s: &str) -> Option<ListingType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "job" => Some(ListingType::Job),
            "internship" => Some(ListingType::Internship),
            "hackathon" => Some(ListingType::Hackathon),
            "project" => Some(ListingType::Project),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Job => "job",
            ListingType::Internship => "internship",
            ListingType::Hackathon => "hackathon",
            ListingType::Project => "project",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            ListingType::Job => Category::Jobs,
            ListingType::Internship => Category::Internships,
            ListingType::Hackathon => Category::Hackathons,
            ListingType::Project => Category::Projects,
        }
    }
}

/// One opportunity as stored in a category file. Every field is optional on disk;
/// unknown keys (image, lastDate, intro, ...) ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub apply_link: Option<String>,

    // jobs / internships
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,

    // projects
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub team_size: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listing {
    pub fn listing_type(&self) -> Option<ListingType> {
        self.kind.as_deref().and_then(ListingType::parse)
    }

    pub fn slug(&self) -> Option<&str> {
        present(&self.slug)
    }

    pub fn id_or_zero(&self) -> i64 {
        self.id.unwrap_or(0)
    }

    /// `postedAt` when parseable, else `postedDate`, else epoch 0 (millis).
    pub fn effective_timestamp(&self) -> i64 {
        present(&self.posted_at)
            .and_then(date::timestamp_millis)
            .or_else(|| present(&self.posted_date).and_then(date::timestamp_millis))
            .unwrap_or(0)
    }

    /// Newest first; equal timestamps fall back to the higher id.
    pub fn cmp_recency(a: &Listing, b: &Listing) -> Ordering {
        b.effective_timestamp()
            .cmp(&a.effective_timestamp())
            .then_with(|| b.id_or_zero().cmp(&a.id_or_zero()))
    }

    pub fn to_record(&self) -> Record {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Record::from(map),
            _ => Record::default(),
        }
    }
}

/// Trimmed, non-empty view of an optional text field.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `present(value)` or the placeholder; no field is ever rendered empty.
pub fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    present(value).unwrap_or(placeholder)
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

/// Scalar JSON value as display text: strings as-is, numbers and bools stringified.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Free-form record: a listing, a detail file, or the merged view of both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Typed view of the listing fields; malformed fields read as absent.
    pub fn to_listing(&self) -> Listing {
        serde_json::from_value(Value::Object(self.0.clone())).unwrap_or_default()
    }

    /// Trimmed, non-empty scalar text for `key`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(value_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn text_or(&self, key: &str, fallback: &str) -> String {
        self.text(key).unwrap_or_else(|| fallback.to_string())
    }

    /// First of `keys` that carries text.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.text(k))
    }

    /// String items of an array field; blanks and non-scalars dropped.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(value_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Raw items of an array field (strings and objects alike).
    pub fn items(&self, key: &str) -> &[Value] {
        match self.get(key) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_fields() {
        let l: Listing = serde_json::from_value(json!({
            "id": "42",
            "title": "Data Analyst",
            "teamSize": 4,
            "type": "job",
            "image": "/images/x.svg"
        }))
        .unwrap();
        assert_eq!(l.id, Some(42));
        assert_eq!(l.team_size.as_deref(), Some("4"));
        assert_eq!(l.listing_type(), Some(ListingType::Job));
        assert_eq!(l.extra.get("image"), Some(&json!("/images/x.svg")));
    }

    #[test]
    fn unknown_type_is_tolerated() {
        let l: Listing = serde_json::from_value(json!({ "type": "gig", "id": null })).unwrap();
        assert_eq!(l.listing_type(), None);
        assert_eq!(l.id, None);
    }

    #[test]
    fn effective_timestamp_prefers_posted_at() {
        let l = Listing {
            posted_at: Some("2026-02-20T10:00:00Z".into()),
            posted_date: Some("2026-02-19".into()),
            ..Default::default()
        };
        let only_date = Listing {
            posted_at: Some("garbage".into()),
            posted_date: Some("2026-02-19".into()),
            ..Default::default()
        };
        assert!(l.effective_timestamp() > only_date.effective_timestamp());
        assert!(only_date.effective_timestamp() > 0);
        assert_eq!(Listing::default().effective_timestamp(), 0);
    }

    #[test]
    fn recency_then_id() {
        let mk = |id, date: &str| Listing {
            id: Some(id),
            posted_date: Some(date.into()),
            ..Default::default()
        };
        let mut list = vec![mk(1, "2026-01-01"), mk(3, "2026-01-01"), mk(2, "2026-02-01")];
        list.sort_by(Listing::cmp_recency);
        let ids: Vec<i64> = list.iter().map(Listing::id_or_zero).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn record_roundtrips_extra_keys() {
        let l: Listing = serde_json::from_value(json!({
            "slug": "a", "lastDate": "2026-03-01", "responsibilities": ["x", "", "y"]
        }))
        .unwrap();
        let r = l.to_record();
        assert_eq!(r.text("slug").as_deref(), Some("a"));
        assert_eq!(r.text("lastDate").as_deref(), Some("2026-03-01"));
        assert_eq!(r.list("responsibilities"), vec!["x", "y"]);
        assert!(r.get("title").is_none());
    }

    #[test]
    fn placeholders() {
        assert_eq!(or_placeholder(&Some("  ".into()), "Not specified"), "Not specified");
        assert_eq!(or_placeholder(&None, "Unknown"), "Unknown");
        assert_eq!(Category::parse_or_default("gigs"), Category::Jobs);
    }
}
