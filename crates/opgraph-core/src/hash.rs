//! Content hashes of query dicts and workflows.
//!
//! A hash covers the compact JSON a value serializes to, so it identifies
//! what the backend would receive. Operator ids are not part of the query
//! dict and therefore never affect it; parameter order does.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// BLAKE3 digest of a serialized query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }

    /// Leading 12 hex digits, for log lines and CLI output.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash the compact JSON of `value`.
pub fn content_hash_of<T: Serialize + ?Sized>(value: &T) -> Result<ContentHash> {
    let json = serde_json::to_vec(value).map_err(|e| Error::Serde(format!("hashing query: {e}")))?;
    Ok(ContentHash(*blake3::hash(&json).as_bytes()))
}
