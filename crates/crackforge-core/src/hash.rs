use md5::{Digest, Md5};

use crate::error::CoreError;

/// Length of a hex-encoded MD5 digest.
pub const HASH_LEN: usize = 32;

/// Trim, lowercase, and validate a hash token against `^[0-9a-f]{32}$`.
pub fn normalize_hash(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim().to_ascii_lowercase();
    if trimmed.len() == HASH_LEN && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(trimmed)
    } else {
        Err(CoreError::InvalidHash(raw.to_string()))
    }
}

/// Lowercase hex MD5 digest of `input`.
pub fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
