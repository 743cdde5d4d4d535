//! Size-bounded JSON body decoding

use bytes::{Bytes, BytesMut};
use domain::RawBody;
use futures::{Stream, StreamExt};
use tracing::debug;

use super::base64::decode_base64;
use crate::error::ApplicationError;

/// Collect a body stream, failing once more than `limit` bytes arrive
///
/// A stream error means the peer stopped sending mid-body and is reported
/// as [`ApplicationError::Truncated`].
pub async fn read_limited<S, B, E>(stream: S, limit: usize) -> Result<Bytes, ApplicationError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut buf = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            debug!(error = %e, read = buf.len(), "Body stream failed");
            ApplicationError::Truncated
        })?;
        let chunk = chunk.as_ref();
        let size = buf.len() + chunk.len();
        if size > limit {
            return Err(ApplicationError::SizeExceeded { limit, size });
        }
        buf.extend_from_slice(chunk);
    }

    Ok(buf.freeze())
}

/// Decode the first JSON object in a request body
///
/// Anything after the first complete value is ignored. A body that stops in
/// the middle of the value is [`ApplicationError::Truncated`]; an empty body
/// or any other syntax error is malformed input.
pub fn decode_json_body(bytes: &[u8]) -> Result<RawBody, ApplicationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApplicationError::Malformed(
            "error decoding json from request: empty body".to_string(),
        ));
    }

    match serde_json::Deserializer::from_slice(bytes)
        .into_iter::<RawBody>()
        .next()
    {
        Some(Ok(body)) => Ok(body),
        Some(Err(e)) if e.is_eof() => Err(ApplicationError::Truncated),
        Some(Err(e)) => Err(ApplicationError::Malformed(format!(
            "error decoding json from request: {e}"
        ))),
        None => Err(ApplicationError::Malformed(
            "error decoding json from request: empty body".to_string(),
        )),
    }
}

/// Decode an opaque base64 payload holding exactly one JSON object
///
/// The decoded size is checked against `limit` before any JSON decoding.
pub fn decode_base64_body(data: &str, limit: usize) -> Result<RawBody, ApplicationError> {
    let buf = decode_base64(data)
        .map_err(|e| ApplicationError::Malformed(format!("error decoding base64: {e} ({data:?})")))?;

    if buf.len() > limit {
        return Err(ApplicationError::SizeExceeded {
            limit,
            size: buf.len(),
        });
    }

    serde_json::from_slice(&buf)
        .map_err(|e| ApplicationError::Malformed(format!("error decoding json: {e}")))
}
