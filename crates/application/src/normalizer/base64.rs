//! Base64 decoding across alphabets and padding styles

use base64::{
    DecodeError, Engine as _,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
};

/// Decode `data`, trying URL-safe unpadded, URL-safe padded, standard
/// unpadded and standard padded in that order
///
/// The first successful decode wins; if none succeeds the error of the last
/// attempt is returned.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD
        .decode(data)
        .or_else(|_| URL_SAFE.decode(data))
        .or_else(|_| STANDARD_NO_PAD.decode(data))
        .or_else(|_| STANDARD.decode(data))
}
