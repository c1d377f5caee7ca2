use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use tfhe::named::Named;
use tfhe::safe_serialization::{safe_deserialize, safe_serialize};
use tfhe::{Unversionize, Versionize};

use crate::error::FheError;

/// Upper bound on any serialized tfhe object accepted from a caller.
pub const DEFAULT_SERIALIZED_SIZE_LIMIT: u64 = 1 << 24;

pub fn safe_serialize_item<T>(item: &T, limit: u64) -> Result<Vec<u8>, FheError>
where
    T: serde::Serialize + Versionize + Named,
{
    let mut buf = Vec::new();
    safe_serialize(item, &mut buf, limit).map_err(|e| FheError::Serialization(e.to_string()))?;
    Ok(buf)
}

pub fn safe_deserialize_item<T>(data: &[u8], limit: u64) -> Result<T, FheError>
where
    T: serde::de::DeserializeOwned + Unversionize + Named,
{
    let cursor = Cursor::new(data);
    let item = safe_deserialize(cursor, limit).map_err(|e| FheError::Serialization(e.to_string()))?;
    Ok(item)
}

/// SHA-256 of an opaque blob.
pub fn fingerprint(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Short printable form of a fingerprint, for log fields.
pub fn short_fingerprint(digest: &[u8; 32]) -> String {
    STANDARD.encode(&digest[..8])
}
