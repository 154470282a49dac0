//! Record hashing for the order ledger.
//!
//! Provides canonical serialization of order records, the domain-separated
//! BLAKE3 block digest, and hash chain verification.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod canonical;
pub mod chain;
pub mod hasher;

pub use canonical::CanonicalBytes;
pub use chain::{ChainError, ChainLink, HashChainVerifier};
pub use hasher::{HasherError, RecordHasher};
