//! Canonical message record
//!
//! The unified representation of one ingested event, handed to the
//! publisher as a single JSON object with `body`, `method`, `path` and
//! `headers` keys.

use std::collections::BTreeMap;

use serde::Serialize;

use super::payload::Payload;

/// Headers that only make sense for a single connection and are never
/// copied into a message
pub const HOP_BY_HOP_HEADERS: [&str; 6] = [
    "Connection",
    "Keep-Alive",
    "Public",
    "Proxy-Authenticate",
    "Transfer-Encoding",
    "Upgrade",
];

/// Paths whose messages carry batches of events
const BATCH_PATHS: [&str; 3] = ["/v1/import", "/v1/batch", "/v1/b"];

/// Header name to values, names in canonical form
pub type HeaderValues = BTreeMap<String, Vec<String>>;

/// Check a header name against [`HOP_BY_HOP_HEADERS`], ignoring case
pub fn is_hop_by_hop_header(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|header| header.eq_ignore_ascii_case(name))
}

/// Canonical MIME header casing: `x-forwarded-for` becomes `X-Forwarded-For`
pub fn canonical_header_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            key.push(c.to_ascii_uppercase());
        } else {
            key.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    key
}

/// One normalized event, ready for publishing
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    body: Option<Payload>,
    method: String,
    path: String,
    headers: HeaderValues,
}

impl Message {
    /// Create a message without a body
    ///
    /// Header values are grouped per canonical name in the order given;
    /// hop-by-hop headers are dropped.
    pub fn new<I, K, V>(method: impl Into<String>, path: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut grouped = HeaderValues::new();
        for (name, value) in headers {
            let name = name.as_ref();
            if is_hop_by_hop_header(name) {
                continue;
            }
            grouped
                .entry(canonical_header_key(name))
                .or_default()
                .push(value.into());
        }

        Self {
            body: None,
            method: method.into(),
            path: path.into(),
            headers: grouped,
        }
    }

    /// Attach a payload
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Payload>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub const fn body(&self) -> Option<&Payload> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut Payload> {
        self.body.as_mut()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn headers(&self) -> &HeaderValues {
        &self.headers
    }

    /// Values recorded for a header, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .get(&canonical_header_key(name))
            .map(Vec::as_slice)
    }

    /// Whether this message was submitted to a batch endpoint
    pub fn is_batch(&self) -> bool {
        BATCH_PATHS.contains(&self.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::payload::Body;

    #[test]
    fn hop_by_hop_headers_are_dropped() {
        let msg = Message::new(
            "POST",
            "/v1/track",
            [
                ("connection", "close"),
                ("Content-Type", "application/json"),
                ("TRANSFER-ENCODING", "chunked"),
                ("keep-alive", "timeout=5"),
                ("upgrade", "h2c"),
                ("public", "GET"),
                ("proxy-authenticate", "Basic"),
            ],
        );

        assert!(msg.body().is_none());
        assert_eq!(msg.method(), "POST");
        assert_eq!(msg.path(), "/v1/track");
        assert_eq!(msg.headers().len(), 1);
        assert_eq!(
            msg.header("content-type"),
            Some(&["application/json".to_string()][..])
        );
    }

    #[test]
    fn repeated_headers_are_grouped_in_order() {
        let msg = Message::new(
            "GET",
            "/v1/p",
            [("x-tag", "a"), ("X-Tag", "b"), ("accept", "*/*")],
        );
        assert_eq!(
            msg.header("X-TAG"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(msg.headers().keys().collect::<Vec<_>>(), ["Accept", "X-Tag"]);
    }

    #[test]
    fn canonical_keys() {
        assert_eq!(canonical_header_key("content-type"), "Content-Type");
        assert_eq!(canonical_header_key("X-FORWARDED-FOR"), "X-Forwarded-For");
        assert_eq!(canonical_header_key("dnt"), "Dnt");
    }

    #[test]
    fn hop_by_hop_matching_ignores_case() {
        assert!(is_hop_by_hop_header("KEEP-ALIVE"));
        assert!(is_hop_by_hop_header("upgrade"));
        assert!(!is_hop_by_hop_header("Content-Length"));
    }

    #[test]
    fn batch_paths() {
        for (path, expected) in [
            ("/v1/import", true),
            ("/v1/batch", true),
            ("/v1/b", true),
            ("/v1/track", false),
            ("/v1/identify", false),
        ] {
            let msg = Message::new("POST", path, std::iter::empty::<(&str, &str)>());
            assert_eq!(msg.is_batch(), expected, "path: {path}");
        }
    }

    #[test]
    fn serializes_all_four_keys() {
        let mut body = Body::new();
        body.insert("event".to_string(), "Signed Up".into());
        let msg = Message::new("GET", "/v1/pixel/track", [("Dnt", "1")]).with_body(body);

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "body": {"event": "Signed Up"},
                "method": "GET",
                "path": "/v1/pixel/track",
                "headers": {"Dnt": ["1"]},
            })
        );
    }

    #[test]
    fn missing_body_serializes_as_null() {
        let msg = Message::new("POST", "/v1/track", std::iter::empty::<(&str, &str)>());
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value["body"].is_null());
    }
}
