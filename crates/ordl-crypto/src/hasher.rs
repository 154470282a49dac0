use ordl_types::{BlockHash, OrderRecord, PrevHash, Timestamp};

use crate::canonical::CanonicalBytes;

/// Domain-separated, length-prefixed BLAKE3 block hasher.
///
/// The digest input is the domain tag followed by three framed fields, each
/// written as a u64 big-endian byte length and then the bytes:
///
/// 1. the block timestamp as 8 big-endian bytes,
/// 2. the canonical serialization of the order record,
/// 3. the predecessor hash string (`"0"` for genesis, else 64 hex chars).
///
/// Framing every field keeps distinct `(timestamp, record, prev_hash)`
/// triples from producing the same byte stream.
pub struct RecordHasher {
    domain: &'static str,
}

impl RecordHasher {
    /// Hasher for ledger blocks.
    pub const BLOCK: Self = Self {
        domain: "ordl-block-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Compute the digest binding a record to its timestamp and predecessor.
    pub fn compute_hash(
        &self,
        timestamp: Timestamp,
        record: &OrderRecord,
        prev_hash: &PrevHash,
    ) -> Result<BlockHash, HasherError> {
        let payload = CanonicalBytes::new(record)?;
        let prev = prev_hash.to_hash_input();

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        update_framed(&mut hasher, &timestamp.to_be_bytes());
        update_framed(&mut hasher, payload.as_bytes());
        update_framed(&mut hasher, prev.as_bytes());
        Ok(BlockHash::from_bytes(*hasher.finalize().as_bytes()))
    }

    /// Recompute and compare against a stored digest.
    pub fn verify(
        &self,
        timestamp: Timestamp,
        record: &OrderRecord,
        prev_hash: &PrevHash,
        expected: &BlockHash,
    ) -> Result<bool, HasherError> {
        Ok(self.compute_hash(timestamp, record, prev_hash)? == *expected)
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

fn update_framed(hasher: &mut blake3::Hasher, field: &[u8]) {
    hasher.update(&(field.len() as u64).to_be_bytes());
    hasher.update(field);
}

/// Errors from hashing operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("non-integer number {0} cannot be canonicalized")]
    FloatRejected(String),
}
