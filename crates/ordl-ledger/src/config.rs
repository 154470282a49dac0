use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::Ledger`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Clamp each new block's timestamp to be no earlier than its
    /// predecessor's, so wall-clock steps backwards never reorder the chain.
    pub clamp_timestamps: bool,
    /// Reject restored chains that fail validation. Disable only to load a
    /// known-corrupt export for inspection.
    pub audit_on_restore: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            clamp_timestamps: true,
            audit_on_restore: true,
        }
    }
}

impl LedgerConfig {
    /// Configuration for forensic inspection of untrusted exports.
    pub fn inspection() -> Self {
        Self {
            audit_on_restore: false,
            ..Default::default()
        }
    }
}
