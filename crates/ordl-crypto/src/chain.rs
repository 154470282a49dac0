use ordl_types::{BlockHash, OrderRecord, PrevHash, Timestamp};

use crate::hasher::{HasherError, RecordHasher};

/// Trait for blocks that participate in a hash chain.
pub trait ChainLink {
    /// Creation timestamp bound into the digest.
    fn timestamp(&self) -> Timestamp;
    /// The embedded order record.
    fn record(&self) -> &OrderRecord;
    /// Back-reference to the predecessor (sentinel for genesis).
    fn prev_hash(&self) -> &PrevHash;
    /// The block's own stored digest.
    fn block_hash(&self) -> BlockHash;
}

/// Hash chain integrity verifier.
///
/// Verifies that a sequence of blocks forms a valid hash chain:
/// the first block is a well-formed genesis, each later block's prev_hash
/// matches the preceding block's hash, and each stored hash reproduces from
/// the block's own fields.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, stopping at the first failure.
    pub fn verify_chain(links: &[impl ChainLink]) -> Result<(), ChainError> {
        match Self::scan(links, true).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Verify a chain and collect every failure, in index order.
    pub fn find_violations(links: &[impl ChainLink]) -> Vec<ChainError> {
        Self::scan(links, false)
    }

    /// Check a single link against its predecessor (`None` for index 0).
    pub fn check_link(
        index: usize,
        link: &impl ChainLink,
        previous: Option<&BlockHash>,
    ) -> Vec<ChainError> {
        let mut failures = Vec::new();

        match (previous, link.prev_hash()) {
            (None, PrevHash::Genesis) => {
                if !link.record().is_genesis() {
                    failures.push(ChainError::GenesisMalformed {
                        reason: format!(
                            "genesis record has order id {:?}",
                            link.record().order_id
                        ),
                    });
                }
            }
            (None, PrevHash::Block(_)) => failures.push(ChainError::GenesisMalformed {
                reason: "genesis block references a predecessor".into(),
            }),
            (Some(_), PrevHash::Genesis) => failures.push(ChainError::MissingPrevHash { index }),
            (Some(expected), PrevHash::Block(actual)) => {
                if actual != expected {
                    failures.push(ChainError::BrokenLink { index });
                }
            }
        }

        match RecordHasher::BLOCK.verify(
            link.timestamp(),
            link.record(),
            link.prev_hash(),
            &link.block_hash(),
        ) {
            Ok(true) => {}
            Ok(false) => failures.push(ChainError::HashMismatch { index }),
            Err(source) => failures.push(ChainError::Hasher { index, source }),
        }

        failures
    }

    fn scan(links: &[impl ChainLink], stop_at_first: bool) -> Vec<ChainError> {
        if links.is_empty() {
            return vec![ChainError::Empty];
        }

        let mut failures = Vec::new();
        let mut previous: Option<BlockHash> = None;
        for (index, link) in links.iter().enumerate() {
            failures.extend(Self::check_link(index, link, previous.as_ref()));
            if stop_at_first && !failures.is_empty() {
                break;
            }
            previous = Some(link.block_hash());
        }
        failures
    }
}

/// Errors from chain verification.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain has no genesis block")]
    Empty,

    #[error("malformed genesis block: {reason}")]
    GenesisMalformed { reason: String },

    #[error("broken link at index {index}: prev_hash does not match")]
    BrokenLink { index: usize },

    #[error("missing prev_hash at index {index} (should reference previous block)")]
    MissingPrevHash { index: usize },

    #[error("hash mismatch at index {index}: computed hash differs from stored")]
    HashMismatch { index: usize },

    #[error("cannot hash block at index {index}: {source}")]
    Hasher { index: usize, source: HasherError },
}

impl ChainError {
    /// Index of the offending block, where one applies.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::GenesisMalformed { .. } => Some(0),
            Self::BrokenLink { index }
            | Self::MissingPrevHash { index }
            | Self::HashMismatch { index }
            | Self::Hasher { index, .. } => Some(*index),
        }
    }
}

#[cfg(test)]
mod tests {
    use ordl_types::Amount;

    use super::*;

    /// Test block for chain verification.
    struct TestBlock {
        timestamp: Timestamp,
        record: OrderRecord,
        prev: PrevHash,
        hash: BlockHash,
    }

    impl ChainLink for TestBlock {
        fn timestamp(&self) -> Timestamp {
            self.timestamp
        }
        fn record(&self) -> &OrderRecord {
            &self.record
        }
        fn prev_hash(&self) -> &PrevHash {
            &self.prev
        }
        fn block_hash(&self) -> BlockHash {
            self.hash
        }
    }

    fn make(record: OrderRecord, prev: PrevHash, millis: i64) -> TestBlock {
        let timestamp = Timestamp::from_millis(millis);
        let hash = RecordHasher::BLOCK
            .compute_hash(timestamp, &record, &prev)
            .unwrap();
        TestBlock {
            timestamp,
            record,
            prev,
            hash,
        }
    }

    fn build_chain(count: usize) -> Vec<TestBlock> {
        let mut chain = vec![make(OrderRecord::genesis(), PrevHash::Genesis, 1_000)];
        for i in 1..count {
            let prev = PrevHash::Block(chain[i - 1].hash);
            let record = OrderRecord::new(
                format!("ord-{i}"),
                "user",
                vec!["p1".into()],
                Amount::from_minor(i as u64 * 100),
            );
            chain.push(make(record, prev, 1_000 + i as i64));
        }
        chain
    }

    #[test]
    fn empty_chain_is_rejected() {
        let chain: Vec<TestBlock> = vec![];
        assert_eq!(
            HashChainVerifier::verify_chain(&chain).unwrap_err(),
            ChainError::Empty
        );
    }

    #[test]
    fn genesis_only_chain() {
        assert!(HashChainVerifier::verify_chain(&build_chain(1)).is_ok());
    }

    #[test]
    fn multi_block_chain() {
        let chain = build_chain(10);
        assert!(HashChainVerifier::verify_chain(&chain).is_ok());
        assert!(HashChainVerifier::find_violations(&chain).is_empty());
    }

    #[test]
    fn genesis_with_prev_hash_fails() {
        let mut chain = build_chain(1);
        chain[0].prev = PrevHash::Block(BlockHash::from_bytes([1; 32]));
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert!(matches!(err, ChainError::GenesisMalformed { .. }));
    }

    #[test]
    fn non_genesis_record_at_index_zero_fails() {
        let record = OrderRecord::new("A", "u", vec![], Amount::ZERO);
        let chain = vec![make(record, PrevHash::Genesis, 1)];
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err.index(), Some(0));
    }

    #[test]
    fn broken_link_detected() {
        let mut chain = build_chain(3);
        chain[2].prev = PrevHash::Block(BlockHash::from_bytes([99; 32]));
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::BrokenLink { index: 2 });
    }

    #[test]
    fn missing_prev_hash_detected() {
        let mut chain = build_chain(3);
        chain[1].prev = PrevHash::Genesis;
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::MissingPrevHash { index: 1 });
    }

    #[test]
    fn tampered_record_detected() {
        let mut chain = build_chain(3);
        chain[1].record.total_amount = Amount::from_minor(1);
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::HashMismatch { index: 1 });
    }

    #[test]
    fn find_violations_reports_every_failure() {
        let mut chain = build_chain(5);
        chain[1].record.user_id = "mallory".into();
        chain[3].timestamp = Timestamp::from_millis(0);
        let violations = HashChainVerifier::find_violations(&chain);
        assert_eq!(
            violations,
            vec![
                ChainError::HashMismatch { index: 1 },
                ChainError::HashMismatch { index: 3 },
            ]
        );
    }

    #[test]
    fn rehashed_block_still_breaks_successor_link() {
        let mut chain = build_chain(3);
        chain[1].record.user_id = "mallory".into();
        let prev = chain[1].prev;
        chain[1].hash = RecordHasher::BLOCK
            .compute_hash(chain[1].timestamp, &chain[1].record, &prev)
            .unwrap();
        let err = HashChainVerifier::verify_chain(&chain).unwrap_err();
        assert_eq!(err, ChainError::BrokenLink { index: 2 });
    }
}
