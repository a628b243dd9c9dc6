// src/codec.rs
//
// Share-link transport for mixes.
//
// A mix travels as JSON, base64-encoded into the `mix` query parameter of
// the page URL. Encoding always produces the URL-safe alphabet without
// padding; decoding also accepts standard base64 from older links.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::state::MixRecord;

/// Query parameter holding the encoded mix.
pub const MIX_PARAM: &str = "mix";

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Error decoding or encoding a mix.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("mix is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("mix is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("mix is not a valid mix record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a mix into a URL-safe string.
pub fn encode_mix(mix: &MixRecord) -> Result<String, CodecError> {
    let json = serde_json::to_string(mix)?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json))
}

/// Decode a mix produced by `encode_mix` (or an older standard-base64 link).
pub fn decode_mix(encoded: &str) -> Result<MixRecord, CodecError> {
    // Form-decoding turns '+' into ' ' on the way in.
    let encoded = encoded.trim().replace(' ', "+");

    let bytes = if encoded.contains(['+', '/']) {
        STANDARD_LENIENT.decode(&encoded)?
    } else {
        URL_SAFE_LENIENT.decode(&encoded)?
    };

    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Find the `mix` parameter in a query string (`?a=b&mix=...`).
pub fn read_mix_param(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == MIX_PARAM)
        .map(|(_, value)| percent_decode_base64(value))
        .filter(|value| !value.is_empty())
}

/// Undo the escapes a browser may apply to base64 characters.
///
/// Only `%2B`, `%2F` and `%3D` are handled; any other escape is left in
/// place and the value then fails to decode as base64.
fn percent_decode_base64(value: &str) -> String {
    value
        .replace("%2B", "+")
        .replace("%2b", "+")
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace("%3D", "=")
        .replace("%3d", "=")
}

/// Full share link for a mix.
pub fn share_url(base_url: &str, mix: &MixRecord) -> Option<String> {
    match encode_mix(mix) {
        Ok(encoded) => Some(format!("{}?{}={}", base_url, MIX_PARAM, encoded)),
        Err(e) => {
            log::error!("Error encoding mix: {}", e);
            None
        }
    }
}

/// Load a mix from a page's query string.
///
/// Returns None when there is no mix or it cannot be decoded; callers
/// start with an empty tape in that case.
pub fn load_mix_from_query(query: &str) -> Option<MixRecord> {
    let param = read_mix_param(query)?;
    match decode_mix(&param) {
        Ok(mix) => Some(mix),
        Err(e) => {
            log::warn!("Error decoding mix: {}", e);
            None
        }
    }
}
