use ordl_crypto::{ChainError, HasherError};

/// Errors produced by ledger operations.
///
/// Corruption found by [`crate::Ledger::validate`] is reported as `false`,
/// not as an error; `IntegrityViolation` is raised only when a chain is
/// rejected on restore.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("integrity violation at index {index}: {reason}")]
    IntegrityViolation { index: usize, reason: String },

    #[error("ledger was restored without an audit and is read-only")]
    ReadOnly,

    #[error("chain contains no genesis block")]
    EmptyChain,

    #[error("ledger {0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error("hashing error: {0}")]
    Hashing(#[from] HasherError),
}

impl From<ChainError> for LedgerError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Empty => Self::EmptyChain,
            other => Self::IntegrityViolation {
                index: other.index().unwrap_or(0),
                reason: other.to_string(),
            },
        }
    }
}
