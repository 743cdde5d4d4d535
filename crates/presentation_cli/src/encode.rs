//! `encode`: build the base64 `data` parameter for GET submissions

use anyhow::{Context, bail};
use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
};
use clap::ValueEnum;
use serde_json::Value;

/// Base64 alphabet and padding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Codec {
    #[default]
    UrlSafeNoPad,
    UrlSafe,
    StandardNoPad,
    Standard,
}

impl Codec {
    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::UrlSafeNoPad => URL_SAFE_NO_PAD.encode(bytes),
            Self::UrlSafe => URL_SAFE.encode(bytes),
            Self::StandardNoPad => STANDARD_NO_PAD.encode(bytes),
            Self::Standard => STANDARD.encode(bytes),
        }
    }
}

/// Compact a JSON object and encode it
pub fn encode_payload(json: &str, codec: Codec) -> anyhow::Result<String> {
    let value: Value = serde_json::from_str(json).context("payload is not valid JSON")?;
    if !value.is_object() {
        bail!("payload must be a JSON object");
    }
    let compact = serde_json::to_vec(&value)?;
    Ok(codec.encode(&compact))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compacts_before_encoding() {
        let encoded = encode_payload("{ \"userId\" : \"user-id\" }", Codec::UrlSafeNoPad).unwrap();
        assert_eq!(encoded, URL_SAFE_NO_PAD.encode(r#"{"userId":"user-id"}"#));
    }

    #[test]
    fn padding_follows_codec() {
        let json = r#"{"a":"b"}"#;
        assert!(encode_payload(json, Codec::Standard).unwrap().ends_with('='));
        assert!(!encode_payload(json, Codec::StandardNoPad).unwrap().ends_with('='));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(encode_payload("[1, 2]", Codec::default()).is_err());
        assert!(encode_payload("{", Codec::default()).is_err());
    }
}
