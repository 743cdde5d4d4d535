//! Message normalizer
//!
//! Turns the three accepted wire encodings into one [`Message`]:
//!
//! - a JSON object in the request body (non-GET requests),
//! - a base64 encoded JSON object in the `data` query parameter (GET),
//! - flat query parameters with dotted keys (pixel requests without `data`).

mod base64;
mod body;
mod path;
mod query;

use domain::{EventType, Message, Payload};
use futures::Stream;
use tracing::instrument;

pub use self::base64::decode_base64;
pub use body::{decode_base64_body, decode_json_body, read_limited};
pub use path::split_path;
pub use query::{QueryValues, decode_query};

use crate::error::ApplicationError;

/// Name of the query parameter carrying an opaque base64 payload
pub const DATA_PARAM: &str = "data";

/// The parts of an inbound request the normalizer reads
///
/// `path` is expected to be normalized already.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: String,
    pub path: String,
    pub query: QueryValues,
    pub headers: Vec<(String, String)>,
}

impl RequestHead {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        raw_query: Option<&str>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: raw_query.map(QueryValues::parse).unwrap_or_default(),
            headers,
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// The opaque payload parameter, when present and non-empty
    pub fn data_param(&self) -> Option<&str> {
        self.query.get(DATA_PARAM).filter(|data| !data.is_empty())
    }

    fn message(&self) -> Message {
        Message::new(
            self.method.as_str(),
            self.path.as_str(),
            self.headers.iter().map(|(name, value)| (name, value.as_str())),
        )
    }
}

/// Normalize a request for `event_type`
///
/// GET requests are read from the `data` parameter; everything else from a
/// JSON body bounded by the event type's size ceiling.
#[instrument(skip(head, body), fields(method = %head.method, path = %head.path))]
pub async fn normalize<S, B, E>(
    event_type: EventType,
    head: &RequestHead,
    body: S,
) -> Result<Message, ApplicationError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    if head.is_get() {
        return from_base64(event_type, head);
    }

    let bytes = read_limited(body, event_type.size_limit()).await?;
    let raw = decode_json_body(&bytes)?;
    Ok(head.message().with_body(Payload::Raw(raw)))
}

/// Normalize the base64 `data` parameter of a request
pub fn from_base64(event_type: EventType, head: &RequestHead) -> Result<Message, ApplicationError> {
    let data = head.query.get(DATA_PARAM).unwrap_or_default();
    let raw = decode_base64_body(data, event_type.size_limit())?;
    Ok(head.message().with_body(Payload::Raw(raw)))
}

/// Normalize the flat query parameters of a request
pub fn from_query(head: &RequestHead) -> Message {
    head.message()
        .with_body(Payload::Constructed(decode_query(&head.query)))
}

/// Normalize a pixel request: `data` when present, flat parameters otherwise
pub fn from_pixel(event_type: EventType, head: &RequestHead) -> Result<Message, ApplicationError> {
    if head.data_param().is_some() {
        from_base64(event_type, head)
    } else {
        Ok(from_query(head))
    }
}
