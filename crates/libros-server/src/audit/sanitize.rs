//! Redaction and summarisation of request/response payloads
//!
//! Nothing sensitive and nothing large is persisted with an audit record:
//! credentials are replaced with [`REDACTED`] and response bodies are reduced
//! to a shape summary.

use http::HeaderMap;
use serde_json::{json, Map, Value as JsonValue};

pub const REDACTED: &str = "[REDACTED]";

/// Header names dropped from the captured request headers
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Body keys whose values are never stored, compared case-insensitively
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "refreshtoken",
    "refresh_token",
    "apikey",
    "api_key",
];

const PAGINATION_KEYS: &[&str] = &["total", "page", "limit", "totalPages"];

fn is_sensitive_field(key: &str) -> bool {
    SENSITIVE_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(key))
}

fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Header map as a JSON object with credentials redacted
///
/// Repeated headers are joined with `", "`. Non-UTF-8 values are stored
/// lossily.
pub fn sanitize_headers(headers: &HeaderMap) -> JsonValue {
    let mut out = Map::new();

    for name in headers.keys() {
        let value = if is_sensitive_header(name.as_str()) {
            REDACTED.to_string()
        } else {
            headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.insert(name.as_str().to_string(), JsonValue::String(value));
    }

    JsonValue::Object(out)
}

/// Deep copy of a request body with sensitive fields redacted at any depth
pub fn sanitize_body(body: &JsonValue) -> JsonValue {
    match body {
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_field(key) {
                        JsonValue::String(REDACTED.to_string())
                    } else {
                        sanitize_body(value)
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(sanitize_body).collect()),
        other => other.clone(),
    }
}

/// Size-bounded summary of a response body
///
/// - paginated envelopes keep their counters and the item count
/// - arrays become `{"type": "array", "count": n}`
/// - objects keep scalar fields; nested values become `"[Object]"` or
///   `"[Array(n)]"` and sensitive fields are redacted
/// - scalars pass through
pub fn sanitize_response(body: &JsonValue) -> JsonValue {
    match body {
        JsonValue::Object(map) if is_paginated(map) => {
            let item_count = map
                .get("items")
                .and_then(JsonValue::as_array)
                .map(Vec::len)
                .unwrap_or_default();

            let mut summary = Map::new();
            summary.insert("itemCount".to_string(), json!(item_count));
            for key in PAGINATION_KEYS {
                summary.insert(
                    (*key).to_string(),
                    map.get(*key).cloned().unwrap_or(JsonValue::Null),
                );
            }
            JsonValue::Object(summary)
        }
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_field(key) {
                        JsonValue::String(REDACTED.to_string())
                    } else {
                        shallow(value)
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        JsonValue::Array(items) => json!({ "type": "array", "count": items.len() }),
        other => other.clone(),
    }
}

fn is_paginated(map: &Map<String, JsonValue>) -> bool {
    map.get("items").is_some_and(JsonValue::is_array)
        && PAGINATION_KEYS.iter().all(|key| map.contains_key(*key))
}

fn shallow(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(_) => JsonValue::String("[Object]".to_string()),
        JsonValue::Array(items) => JsonValue::String(format!("[Array({})]", items.len())),
        scalar => scalar.clone(),
    }
}
