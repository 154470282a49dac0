use std::path::Path;

use anyhow::Context;
use ordl_ledger::LedgerConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the `ordl` binary, loaded from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Worker threads used by `simulate`.
    pub workers: usize,
    /// Orders appended by `simulate`.
    pub orders: usize,
    /// Distinct simulated users.
    pub users: usize,
    /// Maximum product lines per simulated order.
    pub max_items: usize,
    /// Ledger settings. `audit_on_restore` decides whether `show` refuses
    /// a corrupt export; `verify` always inspects and reports.
    pub ledger: LedgerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            orders: 100,
            users: 10,
            max_items: 5,
            ledger: LedgerConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config() {
        let c = CliConfig::default();
        assert_eq!(c.workers, 4);
        assert_eq!(c.orders, 100);
        assert!(c.ledger.audit_on_restore);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 8\n\n[ledger]\nclamp_timestamps = false").unwrap();

        let c = CliConfig::load(file.path()).unwrap();
        assert_eq!(c.workers, 8);
        assert_eq!(c.orders, 100);
        assert!(!c.ledger.clamp_timestamps);
        assert!(c.ledger.audit_on_restore);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(CliConfig::load(Path::new("/nonexistent/ordl.toml")).is_err());
        assert_eq!(CliConfig::load_or_default(None).unwrap(), CliConfig::default());
    }
}
