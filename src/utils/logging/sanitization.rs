//! Redaction and truncation of request data

use serde_json::Value;
use std::collections::HashMap;

/// Replacement for sensitive values
pub const REDACTED: &str = "[REDACTED]";

/// Marker appended to truncated bodies
pub const TRUNCATED: &str = "...[TRUNCATED]";

/// Redacts sensitive keys and bounds body size.
///
/// A key is sensitive when it contains any configured field name, compared
/// case-insensitively, so `X-Api-Key` matches `api-key` and `access_token`
/// matches `token`.
#[derive(Debug, Clone)]
pub struct FieldSanitizer {
    sensitive_fields: Vec<String>,
    max_body_bytes: usize,
}

impl FieldSanitizer {
    pub fn new(sensitive_fields: &[String], max_body_bytes: usize) -> Self {
        Self {
            sensitive_fields: sensitive_fields
                .iter()
                .map(|f| normalize(f))
                .filter(|f| !f.is_empty())
                .collect(),
            max_body_bytes,
        }
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = normalize(key);
        self.sensitive_fields
            .iter()
            .any(|field| key.contains(field.as_str()))
    }

    /// Parse a raw query string into sanitized key/value pairs
    pub fn sanitize_query(&self, query: &str) -> HashMap<String, String> {
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| {
                let value = if self.is_sensitive(&key) {
                    REDACTED.to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect()
    }

    /// Sanitize header name/value pairs
    pub fn sanitize_headers<'a, I>(&self, headers: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        headers
            .into_iter()
            .map(|(name, value)| {
                let value = if self.is_sensitive(name) {
                    REDACTED
                } else {
                    value
                };
                (name.to_lowercase(), value.to_string())
            })
            .collect()
    }

    /// Recursively redact sensitive keys in a JSON value
    pub fn sanitize_json(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| {
                        let value = if self.is_sensitive(key) {
                            Value::String(REDACTED.to_string())
                        } else {
                            self.sanitize_json(value)
                        };
                        (key.clone(), value)
                    })
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.sanitize_json(v)).collect()),
            other => other.clone(),
        }
    }

    /// Redact a form-urlencoded body, keeping pair order
    pub fn sanitize_form(&self, body: &str) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
            if self.is_sensitive(&key) {
                serializer.append_pair(&key, REDACTED);
            } else {
                serializer.append_pair(&key, &value);
            }
        }
        serializer.finish()
    }

    /// Sanitize a raw body. JSON and form bodies are redacted, every body is
    /// size-bounded.
    pub fn sanitize_body(&self, body: &str) -> String {
        let sanitized = match serde_json::from_str::<Value>(body) {
            Ok(json @ (Value::Object(_) | Value::Array(_))) => {
                serde_json::to_string(&self.sanitize_json(&json)).unwrap_or_else(|_| body.to_string())
            }
            _ if looks_like_form(body) => self.sanitize_form(body),
            _ => body.to_string(),
        };
        self.truncate(sanitized)
    }

    /// Cut `text` to the body limit on a char boundary, appending a marker
    pub fn truncate(&self, mut text: String) -> String {
        if text.len() <= self.max_body_bytes {
            return text;
        }
        let mut cut = self.max_body_bytes;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str(TRUNCATED);
        text
    }
}

/// `key=value` pairs joined by `&`, with no whitespace
fn looks_like_form(body: &str) -> bool {
    let body = body.trim_end_matches('&');
    !body.is_empty()
        && !body.chars().any(char::is_whitespace)
        && body.split('&').all(|pair| pair.split_once('=').is_some_and(|(k, _)| !k.is_empty()))
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitizer(max_body_bytes: usize) -> FieldSanitizer {
        FieldSanitizer::new(
            &["password".to_string(), "token".to_string(), "api-key".to_string()],
            max_body_bytes,
        )
    }

    #[test]
    fn test_sensitive_match_is_case_insensitive() {
        let s = sanitizer(1024);
        assert!(s.is_sensitive("Password"));
        assert!(s.is_sensitive("X-API-KEY"));
        assert!(s.is_sensitive("access_token"));
        assert!(!s.is_sensitive("username"));
    }

    #[test]
    fn test_sanitize_query() {
        let s = sanitizer(1024);
        let query = s.sanitize_query("user=alice&token=abc123&page=2");
        assert_eq!(query.get("user").unwrap(), "alice");
        assert_eq!(query.get("token").unwrap(), REDACTED);
        assert_eq!(query.get("page").unwrap(), "2");
    }

    #[test]
    fn test_sanitize_headers() {
        let s = sanitizer(1024);
        let headers = s.sanitize_headers(vec![
            ("Content-Type", "application/json"),
            ("X-Api-Key", "sk-123"),
        ]);
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(headers.get("x-api-key").unwrap(), REDACTED);
    }

    #[test]
    fn test_sanitize_nested_json_body() {
        let s = sanitizer(1024);
        let body = json!({
            "user": {"name": "alice", "password": "hunter2"},
            "sessions": [{"token": "t1"}, {"id": 7}]
        })
        .to_string();

        let sanitized: Value = serde_json::from_str(&s.sanitize_body(&body)).unwrap();
        assert_eq!(sanitized["user"]["name"], "alice");
        assert_eq!(sanitized["user"]["password"], REDACTED);
        assert_eq!(sanitized["sessions"][0]["token"], REDACTED);
        assert_eq!(sanitized["sessions"][1]["id"], 7);
    }

    #[test]
    fn test_sanitize_form_body() {
        let s = sanitizer(1024);
        assert_eq!(
            s.sanitize_body("user=bob&password=hunter2&note=a+b"),
            format!("user=bob&password={}&note=a+b", "%5BREDACTED%5D")
        );
        assert_eq!(
            s.sanitize_body("X-Api-Key=sk-1&page=2"),
            "X-Api-Key=%5BREDACTED%5D&page=2"
        );
    }

    #[test]
    fn test_plain_text_body_is_untouched() {
        let s = sanitizer(1024);
        assert_eq!(s.sanitize_body("password is hunter2"), "password is hunter2");
        assert_eq!(s.sanitize_body("just text"), "just text");
        assert_eq!(s.sanitize_body("a=1&b"), "a=1&b");
    }

    #[test]
    fn test_oversized_body_is_truncated() {
        let s = sanitizer(10);
        let body = "x".repeat(50);
        let sanitized = s.sanitize_body(&body);
        assert_eq!(sanitized, format!("{}{}", "x".repeat(10), TRUNCATED));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let s = sanitizer(3);
        // 'é' is two bytes; the cut must not split it
        let truncated = s.truncate("aéé".to_string());
        assert_eq!(truncated, format!("aé{}", TRUNCATED));
    }
}
