//! Accessors for the JSON rendition of the XML feeds. Attribute keys may
//! arrive with or without the `@` prefix, numbers may arrive as strings, and
//! a one-element list may arrive as a bare object.

use serde_json::Value;

pub fn field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    let obj = v.as_object()?;
    obj.get(key)
        .or_else(|| obj.get(&format!("@{key}")))
        .filter(|v| !v.is_null())
}

pub fn path<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(v, |cur, key| field(cur, key))
}

pub fn as_list(v: Option<&Value>) -> Vec<&Value> {
    match v {
        Some(Value::Array(items)) => items.iter().filter(|item| !item.is_null()).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

pub fn as_string_any(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn string_field(v: &Value, key: &str) -> Option<String> {
    field(v, key).and_then(as_string_any)
}

/// Parse an ordinal that the feed may spell as `"12"`, `12`, or `"12.0"`.
pub fn parse_ordinal(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return Some(n);
    }
    let f = trimmed.parse::<f64>().ok()?;
    if f.fract() != 0.0 || f < 0.0 || f > f64::from(u32::MAX) {
        return None;
    }
    Some(f as u32)
}

pub fn as_i32_any(v: &Value) -> Option<i32> {
    if let Some(n) = v.as_i64() {
        return i32::try_from(n).ok();
    }
    v.as_str()?.trim().parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_accepts_attribute_prefix() {
        let v = json!({"@playId": "36", "playDescription": "Kick"});
        assert_eq!(string_field(&v, "playId").as_deref(), Some("36"));
        assert_eq!(string_field(&v, "playDescription").as_deref(), Some("Kick"));
        assert_eq!(string_field(&v, "missing"), None);
    }

    #[test]
    fn as_list_wraps_single_objects() {
        let v = json!({"play": {"playId": 1}, "none": null, "many": [{"a": 1}, null, {"a": 2}]});
        assert_eq!(as_list(field(&v, "play")).len(), 1);
        assert!(as_list(field(&v, "none")).is_empty());
        assert_eq!(as_list(field(&v, "many")).len(), 2);
    }

    #[test]
    fn ordinals_tolerate_float_spelling() {
        assert_eq!(parse_ordinal("12"), Some(12));
        assert_eq!(parse_ordinal(" 3.0 "), Some(3));
        assert_eq!(parse_ordinal("3.5"), None);
        assert_eq!(parse_ordinal("-1"), None);
        assert_eq!(parse_ordinal(""), None);
    }

    #[test]
    fn numbers_and_blank_strings() {
        assert_eq!(as_string_any(&json!(7)).as_deref(), Some("7"));
        assert_eq!(as_string_any(&json!("  ")), None);
        assert_eq!(as_i32_any(&json!("24")), Some(24));
        assert_eq!(as_i32_any(&json!(17)), Some(17));
    }
}
