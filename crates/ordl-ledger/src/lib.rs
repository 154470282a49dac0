//! Append-only, hash-linked order ledger.
//!
//! This crate provides:
//! - [`Block`]: an order record sealed with its timestamp and predecessor hash
//! - [`Ledger`]: the in-memory chain behind a single reader/writer lock
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - Full-chain validation and audit reports
//! - Restore from exported blocks, with verification
//! - A lazily created process-wide instance

pub mod block;
pub mod config;
pub mod error;
pub mod global;
pub mod memory;
pub mod traits;
pub mod validation;

pub use block::Block;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use global::{global, SharedLedger};
pub use memory::Ledger;
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{ChainValidator, ValidationReport, Violation, ViolationKind};
