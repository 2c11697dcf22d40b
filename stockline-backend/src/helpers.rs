use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Escape the HTML-significant characters, quotes included.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trim and HTML-escape a free-text request field.
pub fn sanitize_text(input: &str) -> String {
    html_escape(input.trim())
}

/// Parse a request body as a JSON object, falling back to form encoding
/// when JSON parsing yields nothing.
pub fn parse_body(bytes: &[u8]) -> Map<String, Value> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(bytes) {
        if !map.is_empty() {
            return map;
        }
    }

    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes) {
        Ok(pairs) => pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
        Err(_) => Map::new(),
    }
}

/// A string field, if present as a JSON string.
pub fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// A string field that is present and non-blank, trimmed.
pub fn text_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    str_field(map, key).map(str::trim).filter(|s| !s.is_empty())
}

/// A numeric field, accepting JSON numbers and numeric strings.
pub fn f64_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// An integer field, accepting JSON numbers and numeric strings.
/// Fractional input is truncated, like an int cast.
pub fn i64_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    match map.get(key)? {
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
