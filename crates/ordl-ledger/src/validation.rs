use ordl_crypto::{ChainError, HashChainVerifier};
use tracing::warn;

use crate::block::Block;
use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of a full-chain audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub block_count: usize,
    pub genesis_valid: bool,
    pub links_valid: bool,
    pub hashes_valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Audit a block sequence.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let violations: Vec<Violation> = HashChainVerifier::find_violations(blocks)
            .into_iter()
            .map(Violation::from)
            .collect();

        for violation in &violations {
            warn!(
                index = ?violation.index,
                kind = ?violation.kind,
                "{}", violation.description
            );
        }

        let has = |kind: ViolationKind| violations.iter().any(|v| v.kind == kind);
        Self {
            block_count: blocks.len(),
            genesis_valid: !has(ViolationKind::GenesisMalformed) && !has(ViolationKind::EmptyChain),
            links_valid: !has(ViolationKind::HashChainBreak),
            hashes_valid: !has(ViolationKind::HashMismatch) && !has(ViolationKind::Unhashable),
            violations,
        }
    }
}

/// A specific integrity violation detected during an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub index: Option<usize>,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    EmptyChain,
    GenesisMalformed,
    HashChainBreak,
    HashMismatch,
    Unhashable,
}

impl From<ChainError> for Violation {
    fn from(err: ChainError) -> Self {
        let kind = match &err {
            ChainError::Empty => ViolationKind::EmptyChain,
            ChainError::GenesisMalformed { .. } => ViolationKind::GenesisMalformed,
            ChainError::BrokenLink { .. } | ChainError::MissingPrevHash { .. } => {
                ViolationKind::HashChainBreak
            }
            ChainError::HashMismatch { .. } => ViolationKind::HashMismatch,
            ChainError::Hasher { .. } => ViolationKind::Unhashable,
        };
        Self {
            index: err.index(),
            kind,
            description: err.to_string(),
        }
    }
}

/// Chain integrity validator over any [`LedgerReader`].
pub struct ChainValidator;

impl ChainValidator {
    /// Audit a snapshot of the reader's chain.
    pub fn audit<R: LedgerReader + ?Sized>(reader: &R) -> Result<ValidationReport, LedgerError> {
        let blocks = reader.read_all()?;
        Ok(ValidationReport::from_blocks(&blocks))
    }
}
