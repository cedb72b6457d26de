//! Runtime configuration loaded from `config.toml`.
//!
//! Tunes the RPC endpoint and the batching throttle. When no config file is
//! present the built-in defaults are used, so the binary works with zero
//! setup against the public node. If the RPC rejects requests, lower
//! `batch_size` or raise `sleep_ms`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use llamas::deployment;

/// Default number of sub-calls bundled into one multicall.
const DEFAULT_BATCH_SIZE: usize = 50;

/// Default pause between consecutive batches, in milliseconds.
const DEFAULT_SLEEP_MS: u64 = 1000;

/// Snapshot runtime configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON-RPC endpoint; must serve archival `eth_call` state.
    pub rpc_url: String,
    /// Sub-calls per multicall batch.
    pub batch_size: usize,
    /// Self-imposed pause between batches (rate limit, not backoff).
    pub sleep_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: deployment::MAINNET.default_rpc.to_owned(),
            batch_size: DEFAULT_BATCH_SIZE,
            sleep_ms: DEFAULT_SLEEP_MS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Returns [`Config::default`] if the file does not exist, allowing the
    /// binary to work without any config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if `batch_size` is zero.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };
        ensure!(config.batch_size > 0, "batch_size must be at least 1");
        Ok(config)
    }

    /// The inter-batch pause as a [`Duration`].
    #[must_use]
    pub const fn sleep(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }
}
