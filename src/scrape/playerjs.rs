//! PlayerJS payload deobfuscation.
//!
//! The portal embeds the stream URL as a PlayerJS `file:` payload that is
//! base64 wrapped twice. Each wrap prepends two junk characters and
//! scatters marker tokens through the base64 text; a marker is `"F"`
//! followed by the base64 rendering of one of the site keys. Undoing one
//! wrap means: drop the first two characters, remove every marker token
//! (in reverse key order), then base64-decode what remains.

use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine};

use super::ScrapeError;

/// Standard alphabet, tolerant of stripped padding. The token removal can
/// eat `=` characters, so strict padding would reject valid payloads.
const B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Render the site keys as the marker tokens embedded in payloads.
#[must_use]
pub fn key_tokens(keys: &[String]) -> Vec<String> {
    keys.iter()
        .map(|key| format!("F{}", STANDARD.encode(key.as_bytes())))
        .collect()
}

/// Undo one obfuscation wrap.
pub fn decode_once(payload: &str, tokens: &[String]) -> Result<String, ScrapeError> {
    let mut text = payload
        .get(2..)
        .ok_or_else(|| ScrapeError::Decode("payload shorter than its prefix".to_string()))?
        .to_string();

    for token in tokens.iter().rev() {
        text = text.replace(token, "");
    }

    let bytes = B64
        .decode(&text)
        .map_err(|_| ScrapeError::Decode("payload is not valid base64".to_string()))?;

    String::from_utf8(bytes)
        .map_err(|_| ScrapeError::Decode("decoded payload is not valid UTF-8".to_string()))
}

/// Fully decode a PlayerJS `file:` payload. The portal wraps twice, so
/// this is two [`decode_once`] passes.
pub fn decode(payload: &str, keys: &[String]) -> Result<String, ScrapeError> {
    let tokens = key_tokens(keys);
    let inner = decode_once(payload, &tokens)?;
    decode_once(&inner, &tokens)
}
