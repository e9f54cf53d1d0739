use serde_json::Value;

/// Extract a string field, ignoring non-string values.
pub fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(|x| x.as_str()).map(|s| s.to_string())
}

/// Extract an identifier that may be encoded as a string or an integer.
/// Empty strings count as absent.
pub fn id_field(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}

/// Extract a non-negative counter. Archive exports store counters as decimal strings,
/// so both `12` and `"12"` are accepted. Anything else yields `None`.
pub fn count_field(v: &Value, key: &str) -> Option<u64> {
    match v.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Extract a boolean, accepting `"true"`/`"false"` strings as well.
pub fn bool_field(v: &Value, key: &str) -> Option<bool> {
    match v.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    }
}

/// Array under `entities.<key>`, or an empty slice when any level is missing or mistyped.
pub fn entities_array<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get("entities")
        .and_then(|e| e.get(key))
        .and_then(|x| x.as_array())
        .map(|a| a.as_slice())
        .unwrap_or(&[])
}
