//! At-rest obfuscation for the tag cache file
//!
//! A repeating-key XOR over the UTF-8 bytes of the plaintext, base64-encoded
//! for storage. The key is fixed and embedded: this keeps the cache away from
//! casual inspection but is not a security boundary.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// Fixed key shared by every cache file this crate writes
pub const CACHE_KEY: &str = "javdb_api_key_2026";

/// Errors from the decode path
///
/// Any of these means the bytes were not written by [`encode`] with the same
/// key; the caller treats that as a signal to try the next decoder.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn xor_with_key(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

/// Obfuscates a plaintext string for storage
pub fn encode(plaintext: &str, key: &str) -> String {
    STANDARD.encode(xor_with_key(plaintext.as_bytes(), key.as_bytes()))
}

/// Reverses [`encode`]
pub fn decode(encoded: &str, key: &str) -> Result<String, CipherError> {
    let raw = STANDARD.decode(encoded.trim())?;
    Ok(String::from_utf8(xor_with_key(&raw, key.as_bytes()))?)
}
