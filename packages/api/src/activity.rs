//! Activity log filtering and the admin activity summary.
//!
//! The statistics endpoints return JSON whose shape the server owns, so the
//! summary reads numbers out of whatever arrives instead of binding to a
//! fixed schema.

use serde_json::Value;

/// Which slice of the activity log to page through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActivityFilter {
    #[default]
    All,
    Search(String),
    Category(String),
    User(String),
}

/// Filter modes offered by the activity tab, with their labels.
pub const FILTER_MODES: [(&str, &str); 4] = [
    ("all", "All activity"),
    ("search", "Search"),
    ("category", "Category"),
    ("user", "User email"),
];

impl ActivityFilter {
    /// Build a filter from a mode key and the typed text. Blank text means
    /// no filter.
    pub fn from_parts(mode: &str, text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return ActivityFilter::All;
        }
        match mode {
            "search" => ActivityFilter::Search(text.to_string()),
            "category" => ActivityFilter::Category(text.to_uppercase()),
            "user" => ActivityFilter::User(text.to_string()),
            _ => ActivityFilter::All,
        }
    }
}

/// Numbers shown above the activity log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDigest {
    /// Activity in the last day, when the server reported it.
    pub recent: Option<u64>,
    /// Labelled counts from the statistics endpoint.
    pub totals: Vec<(String, u64)>,
    /// Most active users, busiest first.
    pub top_users: Vec<(String, u64)>,
}

impl ActivityDigest {
    pub fn from_values(statistics: &Value, recent: &Value, most_active: &Value) -> Self {
        let mut top_users = ranked_users(most_active);
        top_users.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            recent: first_count(recent),
            totals: numeric_entries(statistics),
            top_users,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_none() && self.totals.is_empty() && self.top_users.is_empty()
    }
}

fn as_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

fn first_count(value: &Value) -> Option<u64> {
    match value {
        Value::Object(map) => map.values().find_map(as_count),
        other => as_count(other),
    }
}

// Top-level numbers, plus the numbers one object down ("byCategory": {...}).
fn numeric_entries(value: &Value) -> Vec<(String, u64)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (key, entry) in map {
        match entry {
            Value::Object(inner) => out.extend(
                inner
                    .iter()
                    .filter_map(|(k, v)| as_count(v).map(|n| (k.clone(), n))),
            ),
            other => {
                if let Some(n) = as_count(other) {
                    out.push((key.clone(), n));
                }
            }
        }
    }
    out
}

const USER_LABEL_KEYS: [&str; 5] = ["userFullName", "fullName", "name", "userEmail", "email"];

fn ranked_users(value: &Value) -> Vec<(String, u64)> {
    match value {
        Value::Array(items) => items.iter().filter_map(user_entry).collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| as_count(v).map(|n| (k.clone(), n)))
            .collect(),
        _ => Vec::new(),
    }
}

fn user_entry(item: &Value) -> Option<(String, u64)> {
    match item {
        Value::Object(map) => {
            let label = USER_LABEL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .filter(|s| !s.trim().is_empty())?;
            let count = map.values().find_map(as_count)?;
            Some((label.to_string(), count))
        }
        Value::Array(pair) => {
            let label = pair.first()?.as_str()?;
            let count = pair.iter().skip(1).find_map(as_count)?;
            Some((label.to_string(), count))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_from_parts() {
        assert_eq!(ActivityFilter::from_parts("search", "  "), ActivityFilter::All);
        assert_eq!(
            ActivityFilter::from_parts("search", " login "),
            ActivityFilter::Search("login".into())
        );
        assert_eq!(
            ActivityFilter::from_parts("category", "project"),
            ActivityFilter::Category("PROJECT".into())
        );
        assert_eq!(
            ActivityFilter::from_parts("user", "a+b@x.com"),
            ActivityFilter::User("a+b@x.com".into())
        );
        assert_eq!(ActivityFilter::from_parts("bogus", "x"), ActivityFilter::All);
    }

    #[test]
    fn test_digest_reads_common_shapes() {
        let digest = ActivityDigest::from_values(
            &json!({"totalActivities": 42, "byCategory": {"AUTH": 30, "PROJECT": 12}, "period": "7 days"}),
            &json!({"count": 5}),
            &json!([
                {"userEmail": "a@x.com", "activityCount": 3},
                {"userFullName": "Jane Doe", "userEmail": "jane@x.com", "activityCount": 9},
                ["b@x.com", 4],
            ]),
        );

        assert_eq!(digest.recent, Some(5));
        assert!(digest.totals.contains(&("totalActivities".into(), 42)));
        assert!(digest.totals.contains(&("AUTH".into(), 30)));
        assert_eq!(digest.totals.len(), 3);
        assert_eq!(
            digest.top_users,
            vec![
                ("Jane Doe".to_string(), 9),
                ("b@x.com".to_string(), 4),
                ("a@x.com".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_digest_tolerates_unexpected_json() {
        let digest = ActivityDigest::from_values(&json!("n/a"), &json!(7), &json!({"x@y.z": 2}));
        assert_eq!(digest.recent, Some(7));
        assert!(digest.totals.is_empty());
        assert_eq!(digest.top_users, vec![("x@y.z".to_string(), 2)]);

        assert!(ActivityDigest::from_values(&Value::Null, &Value::Null, &Value::Null).is_empty());
    }
}
