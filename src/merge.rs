use serde_json::Value;

use crate::model::Record;

/// Null, `""` and `[]` never override a base value.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Right-biased field merge: `overlay` wins wherever it carries a value.
pub fn merge(base: &Record, overlay: &Record) -> Record {
    let mut merged = base.clone();
    for (key, value) in overlay.as_map() {
        if !is_empty_value(value) {
            merged.insert(key, value.clone());
        }
    }
    merged
}

/// Keep `existing` as is and copy in `template` values only where `existing`
/// has nothing. Empty keys the template does not know about stay untouched.
pub fn fill_missing(existing: &Record, template: &Record) -> Record {
    let mut filled = existing.clone();
    for (key, value) in template.as_map() {
        if existing.get(key).map_or(true, is_empty_value) {
            filled.insert(key, value.clone());
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_override_values_are_skipped() {
        let base = record(json!({
            "title": "Data Analyst",
            "responsibilities": ["Build dashboards"],
            "salary": "₹4 LPA",
            "batch": "2025"
        }));
        let overlay = record(json!({
            "title": "",
            "responsibilities": [],
            "salary": null,
            "lastDate": null
        }));
        let merged = merge(&base, &overlay);
        assert_eq!(merged, base);
        assert!(merged.get("lastDate").is_none());
    }

    #[test]
    fn present_override_values_win() {
        let base = record(json!({ "title": "Old", "remote": true, "company": "Acme" }));
        let overlay = record(json!({ "title": "New", "remote": false, "faq": [{"q": "a", "a": "b"}] }));
        let merged = merge(&base, &overlay);
        assert_eq!(merged.text("title").as_deref(), Some("New"));
        assert_eq!(merged.get("remote"), Some(&json!(false)));
        assert_eq!(merged.text("company").as_deref(), Some("Acme"));
        assert_eq!(merged.items("faq").len(), 1);
    }

    #[test]
    fn whitespace_override_still_wins() {
        let base = record(json!({ "title": "Old" }));
        let merged = merge(&base, &record(json!({ "title": "  " })));
        assert_eq!(merged.get("title"), Some(&json!("  ")));
    }

    #[test]
    fn fill_missing_keeps_unknown_empty_keys() {
        let existing = record(json!({ "domain": "Agritech", "intro": "", "tips": [], "aboutCompany": "" }));
        let template = record(json!({ "domain": "Data Analytics", "intro": "Generated", "faq": [1] }));
        let filled = fill_missing(&existing, &template);
        assert_eq!(
            filled,
            record(json!({ "domain": "Agritech", "intro": "Generated", "tips": [], "aboutCompany": "", "faq": [1] }))
        );
        // plain merge would drop the empty keys the template never mentions
        assert!(merge(&template, &existing).get("tips").is_none());
    }

    #[test]
    fn idempotent() {
        let base = record(json!({ "a": "1", "b": [], "c": null }));
        let overlay = record(json!({ "a": "", "b": ["x"], "d": 0, "e": {} }));
        let once = merge(&base, &overlay);
        let twice = merge(&once, &overlay);
        assert_eq!(once, twice);
        assert_eq!(once.get("d"), Some(&json!(0)));
    }
}
