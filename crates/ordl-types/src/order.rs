use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::TypeError;

/// Order identifier reserved for the genesis record.
pub const GENESIS_ORDER_ID: &str = "genesis";

/// Lifecycle label of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Completed, Self::Failed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

/// The order payload carried by a block.
///
/// Product quantity is expressed by repetition: an order for two units of
/// `p1` lists `"p1"` twice in `product_ids`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub user_id: String,
    pub product_ids: Vec<String>,
    pub total_amount: Amount,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// A pending order created now.
    pub fn new(
        order_id: impl Into<String>,
        user_id: impl Into<String>,
        product_ids: Vec<String>,
        total_amount: Amount,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            user_id: user_id.into(),
            product_ids,
            total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// The sentinel record embedded in the genesis block.
    pub fn genesis() -> Self {
        Self {
            order_id: GENESIS_ORDER_ID.to_string(),
            user_id: String::new(),
            product_ids: Vec::new(),
            total_amount: Amount::ZERO,
            status: OrderStatus::Completed,
            created_at: Utc::now(),
        }
    }

    /// Generate a fresh time-ordered order identifier (UUID v7).
    pub fn generate_id() -> String {
        uuid::Uuid::now_v7().to_string()
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns `true` for the reserved genesis record.
    pub fn is_genesis(&self) -> bool {
        self.order_id == GENESIS_ORDER_ID
    }

    /// Expand `(product_id, quantity)` lines into the repeated form.
    pub fn expand_quantities<'a, I>(lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        lines
            .into_iter()
            .flat_map(|(product, qty)| std::iter::repeat(product.to_string()).take(qty as usize))
            .collect()
    }
}
