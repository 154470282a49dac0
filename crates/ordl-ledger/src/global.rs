//! Process-wide ledger instance.
//!
//! Prefer constructing a [`Ledger`] at startup and passing a
//! [`SharedLedger`] handle to callers. [`global`] exists for code that has
//! no handle to thread through: it creates the ledger lazily on first use,
//! exactly once, however many threads race to call it.

use std::sync::{Arc, OnceLock};

use crate::error::LedgerError;
use crate::memory::Ledger;

/// Cheaply clonable handle to a ledger shared between callers.
pub type SharedLedger = Arc<Ledger>;

static GLOBAL: OnceLock<Result<Ledger, LedgerError>> = OnceLock::new();

/// The process-wide ledger, created with the default configuration on
/// first access.
pub fn global() -> Result<&'static Ledger, LedgerError> {
    GLOBAL.get_or_init(Ledger::new).as_ref().map_err(Clone::clone)
}
