//! Llamas ownership snapshot CLI.
//!
//! Reconstructs, at a given historical block, who holds each of the 1,111
//! Llamas tokens — merging direct wallet ownership with tokens deposited in
//! the `LlamaLocker` — and writes `Snapshot_<block>.json` and
//! `Snapshot_<block>.csv` sorted by locked count.
//!
//! # Usage
//!
//! ```bash
//! # Snapshot at block 19500000 using the default public RPC
//! llamas-snapshot 19500000
//!
//! # Custom endpoint and output directory
//! llamas-snapshot 19500000 --rpc https://my-archive-node.example.com --out-dir ./snapshots
//! ```
//!
//! The RPC endpoint must serve archival state (`eth_call` at historical
//! blocks). Rerunning for an already-snapshotted block is a no-op.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use llamas_snapshot::config::Config;
use llamas_snapshot::snapshot;

/// Historical ownership snapshot for the Llamas NFT collection.
#[derive(Debug, Parser)]
#[command(name = "llamas-snapshot", version, about)]
struct Cli {
    /// Target historical block height.
    block_number: u64,

    /// Path to an optional TOML config file (RPC endpoint, batch tuning).
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the RPC endpoint from the config.
    #[arg(long)]
    rpc: Option<String>,

    /// Directory the artifacts are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(rpc) = cli.rpc {
        config.rpc_url = rpc;
    }

    tracing::info!(
        block = cli.block_number,
        batch_size = config.batch_size,
        sleep_ms = config.sleep_ms,
        out_dir = %cli.out_dir.display(),
        "starting snapshot"
    );

    let summary = snapshot::take_snapshot(&config, &cli.out_dir, cli.block_number)
        .await
        .with_context(|| format!("snapshot at block {}", cli.block_number))?;

    tracing::info!(
        addresses = summary.addresses,
        locker_held = summary.locker_held,
        unique_locked_holders = summary.unique_locked_holders,
        total_unlocked = summary.total_unlocked,
        total_locked = summary.total_locked,
        "snapshot complete"
    );

    Ok(())
}
