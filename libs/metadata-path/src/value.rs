//! Leaf value rendering
//!
//! Leaves are rendered as index-ready strings. Code lists (`{"codeListValue": ..}`)
//! and wrapped scalars (`{"value": ..}`) are unwrapped, and temporal values are
//! compacted so that lexical order matches chronological order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Render a JSON node as a leaf string, or `None` when it carries no scalar.
pub fn leaf_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Array(_) => None,
        Value::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(normalize_temporal(s)),
        Value::Object(obj) => obj
            .get("codeListValue")
            .or_else(|| obj.get("value"))
            .and_then(leaf_value),
    }
}

/// `YYYY-MM-DD` becomes `YYYYMMDD`; date-times become `YYYYMMDDHHMMSS`.
/// Anything else is returned unchanged.
pub fn normalize_temporal(raw: &str) -> String {
    let s = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.format("%Y%m%d").to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.naive_local().format("%Y%m%d%H%M%S").to_string();
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.format("%Y%m%d%H%M%S").to_string();
        }
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compacts_dates_and_date_times() {
        assert_eq!(normalize_temporal("1970-01-01"), "19700101");
        assert_eq!(normalize_temporal("2009-01-18T13:42:07"), "20090118134207");
        assert_eq!(normalize_temporal("2009-01-18T13:42:07+02:00"), "20090118134207");
        assert_eq!(normalize_temporal("2009-01-18 13:42:07"), "20090118134207");
        assert_eq!(normalize_temporal("2009"), "2009");
        assert_eq!(normalize_temporal("Sea surface"), "Sea surface");
    }

    #[test]
    fn unwraps_code_lists_and_wrapped_scalars() {
        assert_eq!(
            leaf_value(&json!({"codeListValue": "creation"})).as_deref(),
            Some("creation")
        );
        assert_eq!(leaf_value(&json!({"value": 12.5})).as_deref(), Some("12.5"));
        assert_eq!(leaf_value(&json!(true)).as_deref(), Some("true"));
        assert_eq!(leaf_value(&json!(null)), None);
        assert_eq!(leaf_value(&json!({"name": "x"})), None);
    }
}
