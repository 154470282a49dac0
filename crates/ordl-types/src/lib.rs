//! Foundation types for the order ledger.
//!
//! Every other `ordl` crate depends on `ordl-types`.
//!
//! # Key Types
//!
//! - [`OrderRecord`]: The order payload embedded in every block
//! - [`OrderStatus`]: Fixed set of order lifecycle labels
//! - [`Amount`]: Non-negative money amount in minor units
//! - [`Timestamp`]: Wall-clock milliseconds since the UNIX epoch
//! - [`BlockHash`]: 256-bit block digest, rendered as lowercase hex
//! - [`PrevHash`]: A block's back-reference, or the genesis sentinel

pub mod amount;
pub mod error;
pub mod hash;
pub mod order;
pub mod temporal;

pub use amount::Amount;
pub use error::TypeError;
pub use hash::{BlockHash, PrevHash};
pub use order::{OrderRecord, OrderStatus, GENESIS_ORDER_ID};
pub use temporal::Timestamp;
