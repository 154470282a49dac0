use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ordl_crypto::HashChainVerifier;
use ordl_types::{BlockHash, OrderRecord, PrevHash, Timestamp};
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};
use crate::validation::ValidationReport;

/// In-memory, append-only, hash-linked order ledger.
///
/// All state sits behind one reader/writer lock. [`LedgerWriter::append`]
/// holds the write lock across reading the last block, hashing and pushing,
/// so concurrent appends are totally ordered and no two blocks can claim
/// the same predecessor. Every other operation takes the read lock.
///
/// A ledger restored without an audit is read-only: its chain was never
/// verified, so nothing may be linked onto it.
pub struct Ledger {
    config: LedgerConfig,
    writable: bool,
    inner: RwLock<LedgerState>,
}

struct LedgerState {
    blocks: Vec<Block>,
    order_index: HashMap<String, usize>,
    hash_index: HashMap<BlockHash, usize>,
}

impl LedgerState {
    fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut state = Self {
            blocks: Vec::with_capacity(blocks.len()),
            order_index: HashMap::new(),
            hash_index: HashMap::new(),
        };
        for block in blocks {
            state.push(block);
        }
        state
    }

    fn push(&mut self, block: Block) {
        let position = self.blocks.len();
        // First occurrence wins for duplicate order ids.
        self.order_index
            .entry(block.order_id().to_string())
            .or_insert(position);
        self.hash_index.entry(block.hash()).or_insert(position);
        self.blocks.push(block);
    }

    fn last(&self) -> Result<&Block, LedgerError> {
        self.blocks.last().ok_or(LedgerError::EmptyChain)
    }
}

impl Ledger {
    /// Create a ledger holding only a freshly sealed genesis block.
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Result<Self, LedgerError> {
        let genesis = Block::seal(Timestamp::now(), OrderRecord::genesis(), PrevHash::Genesis)?;
        info!(hash = %genesis.hash().short_hex(), "ledger initialized with genesis block");
        Ok(Self {
            config,
            writable: true,
            inner: RwLock::new(LedgerState::from_blocks(vec![genesis])),
        })
    }

    /// Rebuild a ledger from previously exported blocks.
    ///
    /// The chain is verified before it is accepted unless
    /// [`LedgerConfig::audit_on_restore`] is disabled, in which case the
    /// ledger is read-only and [`LedgerWriter::append`] fails with
    /// [`LedgerError::ReadOnly`]. An empty sequence is always rejected.
    pub fn restore(blocks: Vec<Block>, config: LedgerConfig) -> Result<Self, LedgerError> {
        if blocks.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        if config.audit_on_restore {
            HashChainVerifier::verify_chain(&blocks)?;
        }
        info!(blocks = blocks.len(), audited = config.audit_on_restore, "ledger restored");
        Ok(Self {
            writable: config.audit_on_restore,
            config,
            inner: RwLock::new(LedgerState::from_blocks(blocks)),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Whether [`LedgerWriter::append`] is permitted.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Check every block's stored hash and predecessor link.
    ///
    /// Returns `Ok(false)` on the first mismatch. Corruption is a reported
    /// condition, never an error; `Err` means only that the lock is poisoned.
    pub fn validate(&self) -> Result<bool, LedgerError> {
        let state = self.read_state()?;
        match HashChainVerifier::verify_chain(&state.blocks) {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(error = %err, "ledger validation failed");
                Ok(false)
            }
        }
    }

    /// Full integrity report listing every violation.
    pub fn audit(&self) -> Result<ValidationReport, LedgerError> {
        let state = self.read_state()?;
        Ok(ValidationReport::from_blocks(&state.blocks))
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))
    }
}

impl LedgerWriter for Ledger {
    fn append(&self, record: OrderRecord) -> Result<Block, LedgerError> {
        if !self.writable {
            return Err(LedgerError::ReadOnly);
        }
        let mut state = self.write_state()?;

        let last = state.last()?;
        let prev_hash = PrevHash::Block(last.hash());
        let timestamp = if self.config.clamp_timestamps {
            Timestamp::now().not_before(last.timestamp())
        } else {
            Timestamp::now()
        };

        let block = Block::seal(timestamp, record, prev_hash)?;
        state.push(block.clone());

        debug!(
            index = state.blocks.len() - 1,
            order_id = %block.order_id(),
            hash = %block.hash().short_hex(),
            "block appended"
        );
        Ok(block)
    }
}

impl LedgerReader for Ledger {
    fn genesis(&self) -> Result<Block, LedgerError> {
        let state = self.read_state()?;
        state.blocks.first().cloned().ok_or(LedgerError::EmptyChain)
    }

    fn last(&self) -> Result<Block, LedgerError> {
        let state = self.read_state()?;
        state.last().cloned()
    }

    fn get_by_order_id(&self, order_id: &str) -> Result<Option<Block>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .order_index
            .get(order_id)
            .and_then(|&position| state.blocks.get(position))
            .cloned())
    }

    fn locate_order_id(&self, order_id: &str) -> Result<Option<(usize, Block)>, LedgerError> {
        let state = self.read_state()?;
        Ok(state.order_index.get(order_id).and_then(|&position| {
            state
                .blocks
                .get(position)
                .map(|block| (position, block.clone()))
        }))
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .hash_index
            .get(hash)
            .and_then(|&position| state.blocks.get(position))
            .cloned())
    }

    fn read_all(&self) -> Result<Vec<Block>, LedgerError> {
        let state = self.read_state()?;
        Ok(state.blocks.clone())
    }

    fn block_count(&self) -> Result<usize, LedgerError> {
        let state = self.read_state()?;
        Ok(state.blocks.len())
    }
}
