use ordl_crypto::{ChainLink, HasherError, RecordHasher};
use ordl_types::{BlockHash, OrderRecord, PrevHash, Timestamp};
use serde::{Deserialize, Serialize};

/// One sealed entry of the ledger.
///
/// Fields are private: a block is sealed once by the ledger and every
/// caller works on a clone, so stored blocks cannot be altered through
/// returned values. Deserialized blocks are only trusted after passing
/// chain validation in [`crate::Ledger::restore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    timestamp: Timestamp,
    data: OrderRecord,
    prev_hash: PrevHash,
    hash: BlockHash,
}

impl Block {
    /// Seal a record: compute its hash over the timestamp, the record and
    /// the predecessor reference.
    pub(crate) fn seal(
        timestamp: Timestamp,
        data: OrderRecord,
        prev_hash: PrevHash,
    ) -> Result<Self, HasherError> {
        let hash = RecordHasher::BLOCK.compute_hash(timestamp, &data, &prev_hash)?;
        Ok(Self {
            timestamp,
            data,
            prev_hash,
            hash,
        })
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn data(&self) -> &OrderRecord {
        &self.data
    }

    pub fn prev_hash(&self) -> &PrevHash {
        &self.prev_hash
    }

    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn order_id(&self) -> &str {
        &self.data.order_id
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_genesis()
    }

    /// Recompute this block's hash from its current fields.
    pub fn recompute_hash(&self) -> Result<BlockHash, HasherError> {
        RecordHasher::BLOCK.compute_hash(self.timestamp, &self.data, &self.prev_hash)
    }

    #[cfg(test)]
    pub(crate) fn data_mut(&mut self) -> &mut OrderRecord {
        &mut self.data
    }
}

impl ChainLink for Block {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn record(&self) -> &OrderRecord {
        &self.data
    }

    fn prev_hash(&self) -> &PrevHash {
        &self.prev_hash
    }

    fn block_hash(&self) -> BlockHash {
        self.hash
    }
}
