//! Snapshot failure taxonomy.
//!
//! Every variant is fatal: the run either completes and writes both
//! artifacts, or stops at the first error having written nothing. There is
//! deliberately no retry path — the artifact-existence guard makes a manual
//! rerun a cheap no-op once a snapshot exists.

use std::path::PathBuf;

use alloy::providers::MulticallError;
use alloy::transports::TransportError;
use thiserror::Error;

/// Errors surfaced by a snapshot run.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The requested block is past the current chain head.
    #[error("block {requested} exceeds current chain head {head}")]
    InvalidBlock {
        /// The block height asked for on the command line.
        requested: u64,
        /// The chain head reported by the RPC endpoint.
        head: u64,
    },

    /// A snapshot artifact for this block already exists.
    #[error("snapshot for block {block} already completed ({path})", path = .path.display())]
    AlreadySnapshotted {
        /// The block height asked for.
        block: u64,
        /// The existing JSON artifact.
        path: PathBuf,
    },

    /// The configured RPC endpoint is not a valid URL.
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// An RPC request exceeded the per-request timeout.
    #[error("RPC request timed out")]
    Timeout,

    /// A multicall aggregate failed (transport or decode).
    #[error("multicall failed: {0}")]
    Multicall(#[from] MulticallError),

    /// A plain RPC call failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Artifact I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("writing csv: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("writing json: {0}")]
    Json(#[from] serde_json::Error),
}
