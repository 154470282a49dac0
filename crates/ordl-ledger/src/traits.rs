use ordl_types::{BlockHash, OrderRecord};

use crate::block::Block;
use crate::error::LedgerError;

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Seal `record` into a new block linked to the current last block.
    fn append(&self, record: OrderRecord) -> Result<Block, LedgerError>;
}

/// Read boundary for ledger queries.
pub trait LedgerReader: Send + Sync {
    fn genesis(&self) -> Result<Block, LedgerError>;

    fn last(&self) -> Result<Block, LedgerError>;

    fn get_by_order_id(&self, order_id: &str) -> Result<Option<Block>, LedgerError>;

    /// Like [`LedgerReader::get_by_order_id`], also returning the block's
    /// chain position.
    fn locate_order_id(&self, order_id: &str) -> Result<Option<(usize, Block)>, LedgerError>;

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>, LedgerError>;

    fn read_all(&self) -> Result<Vec<Block>, LedgerError>;

    fn block_count(&self) -> Result<usize, LedgerError>;
}
