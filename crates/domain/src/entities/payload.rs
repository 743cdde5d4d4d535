//! Message payload variants
//!
//! A payload is either the top-level members of a submitted JSON object,
//! each kept as its original JSON text, or a record built key by key from a
//! flat query string. Both variants serialize to the same JSON object shape.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::errors::DomainError;

/// Top-level key written by [`Payload::set_received_at`]
pub const PROPERTY_RECEIVED_AT: &str = "receivedAt";

/// Top-level members of a JSON object, each holding its original JSON text
pub type RawBody = BTreeMap<String, Box<RawValue>>;

/// Record synthesized from query parameters
pub type Body = BTreeMap<String, BodyValue>;

/// A value inside a constructed [`Body`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyValue {
    /// Single parameter value
    String(String),
    /// Repeated parameter, values in query order
    List(Vec<String>),
    /// Nested record created from a dotted key
    Record(Body),
}

impl BodyValue {
    /// Borrow the nested record, if this value is one
    #[must_use]
    pub const fn as_record(&self) -> Option<&Body> {
        match self {
            Self::Record(body) => Some(body),
            _ => None,
        }
    }
}

impl From<&str> for BodyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for BodyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for BodyValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Body> for BodyValue {
    fn from(body: Body) -> Self {
        Self::Record(body)
    }
}

/// The event payload carried by a [`crate::Message`]
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Decoded from opaque JSON without re-encoding nested values
    Raw(RawBody),
    /// Built from a flat query string
    Constructed(Body),
}

impl Payload {
    /// Write the `receivedAt` property as an RFC 3339 UTC timestamp
    pub fn set_received_at(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        let stamp = format_timestamp(at);
        match self {
            Self::Raw(raw) => {
                let encoded = RawValue::from_string(serde_json::to_string(&stamp)?)?;
                raw.insert(PROPERTY_RECEIVED_AT.to_string(), encoded);
            },
            Self::Constructed(body) => {
                body.insert(PROPERTY_RECEIVED_AT.to_string(), BodyValue::String(stamp));
            },
        }
        Ok(())
    }

    /// Remove a top-level property, returning whether it was present
    pub fn clear_property(&mut self, name: &str) -> bool {
        match self {
            Self::Raw(raw) => raw.remove(name).is_some(),
            Self::Constructed(body) => body.remove(name).is_some(),
        }
    }

    /// Whether a top-level property is present
    #[must_use]
    pub fn contains_property(&self, name: &str) -> bool {
        match self {
            Self::Raw(raw) => raw.contains_key(name),
            Self::Constructed(body) => body.contains_key(name),
        }
    }

    /// Number of top-level properties
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(raw) => raw.len(),
            Self::Constructed(body) => body.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the payload as a JSON value
    pub fn to_json_value(&self) -> Result<serde_json::Value, DomainError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<RawBody> for Payload {
    fn from(raw: RawBody) -> Self {
        Self::Raw(raw)
    }
}

impl From<Body> for Payload {
    fn from(body: Body) -> Self {
        Self::Constructed(body)
    }
}

/// Render a timestamp the way `receivedAt` is written
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_string()).unwrap()
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn raw_set_received_at() {
        let mut payload = Payload::Raw(RawBody::new());
        payload.set_received_at(epoch()).unwrap();
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"receivedAt":"1970-01-01T00:00:00Z"}"#);
    }

    #[test]
    fn constructed_set_received_at() {
        let mut payload = Payload::Constructed(Body::new());
        payload.set_received_at(epoch()).unwrap();
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"receivedAt":"1970-01-01T00:00:00Z"}"#);
    }

    #[test]
    fn set_received_at_overwrites_client_value() {
        let mut body = RawBody::new();
        body.insert(PROPERTY_RECEIVED_AT.to_string(), raw(r#""yesterday""#));
        let mut payload = Payload::Raw(body);
        payload.set_received_at(epoch()).unwrap();
        let value = payload.to_json_value().unwrap();
        assert_eq!(value["receivedAt"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn subsecond_timestamps_keep_precision() {
        let at = epoch() + chrono::Duration::milliseconds(250);
        assert_eq!(format_timestamp(at), "1970-01-01T00:00:00.250Z");
    }

    #[test]
    fn clear_property_on_both_variants() {
        let mut raw_body = RawBody::new();
        raw_body.insert("foo".to_string(), raw(r#""bar""#));
        let mut body = Body::new();
        body.insert("foo".to_string(), "bar".into());

        for mut payload in [Payload::Raw(raw_body), Payload::Constructed(body)] {
            assert!(payload.contains_property("foo"));
            assert!(payload.clear_property("foo"));
            assert!(!payload.contains_property("foo"));
            assert!(!payload.clear_property("foo"));
            assert!(payload.is_empty());
        }
    }

    #[test]
    fn raw_members_keep_original_text() {
        let mut body = RawBody::new();
        body.insert("n".to_string(), raw("1.50"));
        body.insert("o".to_string(), raw(r#"{"z":1, "a":2}"#));
        let json = serde_json::to_string(&Payload::Raw(body)).unwrap();
        assert_eq!(json, r#"{"n":1.50,"o":{"z":1, "a":2}}"#);
    }

    #[test]
    fn variants_serialize_to_the_same_shape() {
        let mut raw_body = RawBody::new();
        raw_body.insert("userId".to_string(), raw(r#""user""#));
        raw_body.insert("traits".to_string(), raw(r#"{"name":"baz","tags":["a","b"]}"#));

        let mut traits = Body::new();
        traits.insert("name".to_string(), "baz".into());
        traits.insert(
            "tags".to_string(),
            vec!["a".to_string(), "b".to_string()].into(),
        );
        let mut body = Body::new();
        body.insert("userId".to_string(), "user".into());
        body.insert("traits".to_string(), traits.into());

        assert_eq!(
            Payload::Raw(raw_body).to_json_value().unwrap(),
            Payload::Constructed(body).to_json_value().unwrap()
        );
    }

    #[test]
    fn body_value_as_record() {
        let value = BodyValue::Record(Body::new());
        assert!(value.as_record().is_some());
        assert!(BodyValue::from("x").as_record().is_none());
    }
}
