//! The snapshot pipeline.
//!
//! A single linear pass: artifact guard → connect → validate the target
//! block against the chain head → phase 1 (direct `ownerOf` owners) →
//! phase 2 (`locks` records for locker-held tokens) → stable sort →
//! persist. Any error aborts the run before anything is written.

use std::path::Path;

use alloy::eips::BlockId;
use alloy::primitives::{Address, U256};
use alloy::providers::{CallItem, Provider, ProviderBuilder};
use alloy::sol_types::SolCall;

use llamas::contracts::{ILlamaLocker, ILlamasNft};
use llamas::deployment;
use llamas::ownership::{self, OwnershipTable};

use crate::config::Config;
use crate::error::SnapshotError;
use crate::output;
use crate::scheduler::{self, BatchPlan};

/// Counters reported after a completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Distinct addresses in the written artifacts.
    pub addresses: usize,
    /// Tokens whose direct owner was the locker contract.
    pub locker_held: usize,
    /// Addresses holding at least one locked token.
    pub unique_locked_holders: u64,
    /// Sum of all unlocked counts.
    pub total_unlocked: u64,
    /// Sum of all locked counts.
    pub total_locked: u64,
}

/// Reconstruct ownership at `target_block` and write both artifacts.
///
/// # Errors
///
/// Fails without touching the network if an artifact for `target_block`
/// already exists, and fails fast on an out-of-range block or any RPC
/// error. Artifacts are only written once both phases completed.
pub async fn take_snapshot(
    config: &Config,
    out_dir: &Path,
    target_block: u64,
) -> Result<RunSummary, SnapshotError> {
    // Guard first: a rerun for a completed block must not issue a single call.
    if let Some(path) = output::existing_snapshot(out_dir, target_block) {
        return Err(SnapshotError::AlreadySnapshotted {
            block: target_block,
            path,
        });
    }

    tracing::info!(rpc = %config.rpc_url, "connecting");
    let provider = ProviderBuilder::new().connect_http(
        config
            .rpc_url
            .parse()
            .map_err(|e| SnapshotError::InvalidRpcUrl(format!("{}: {e}", config.rpc_url)))?,
    );

    snapshot_with(&provider, config, out_dir, target_block).await
}

/// Validate the head and run both phases against an already-built provider.
async fn snapshot_with<P: Provider>(
    provider: &P,
    config: &Config,
    out_dir: &Path,
    target_block: u64,
) -> Result<RunSummary, SnapshotError> {
    let deployment = deployment::MAINNET;

    let head = tokio::time::timeout(scheduler::REQUEST_TIMEOUT, provider.get_block_number())
        .await
        .map_err(|_| SnapshotError::Timeout)??;
    if target_block > head {
        return Err(SnapshotError::InvalidBlock {
            requested: target_block,
            head,
        });
    }

    let plan = BatchPlan {
        batch_size: config.batch_size,
        delay: config.sleep(),
        block: BlockId::number(target_block),
    };

    // Phase 1: direct owner of every token in the collection.
    let owner_calls: Vec<CallItem<ILlamasNft::ownerOfCall>> = deployment
        .token_ids()
        .map(|id| {
            let call = ILlamasNft::ownerOfCall {
                tokenId: U256::from(id),
            };
            CallItem::new(deployment.nft, call.abi_encode().into())
        })
        .collect();

    tracing::info!(block = target_block, tokens = owner_calls.len(), "reading direct owners");
    let owners = scheduler::execute_batched(provider, owner_calls, &plan, "owners").await?;

    let mut table = OwnershipTable::new();
    let locker_ids = ownership::apply_direct_owners(&mut table, &owners, deployment.locker);
    tracing::info!(
        holders = table.len(),
        locker_held = locker_ids.len(),
        "unlocked holders recorded"
    );

    // Phase 2: lock records for every token the locker custodies.
    let lock_calls: Vec<CallItem<ILlamaLocker::locksCall>> = locker_ids
        .iter()
        .map(|&id| {
            let call = ILlamaLocker::locksCall {
                tokenId: U256::from(id),
            };
            CallItem::new(deployment.locker, call.abi_encode().into())
        })
        .collect();

    let unique_locked_holders = if lock_calls.is_empty() {
        0
    } else {
        tracing::info!(locks = lock_calls.len(), "reading lock records");
        let records = scheduler::execute_batched(provider, lock_calls, &plan, "locks").await?;
        let lock_owners: Vec<Address> = records.iter().map(|r| r.owner).collect();
        ownership::apply_lock_owners(&mut table, &lock_owners)
    };
    tracing::info!(unique_locked_holders, "locked holders recorded");

    table.sort_by_locked();
    output::write_artifacts(out_dir, target_block, &table)?;

    Ok(RunSummary {
        addresses: table.len(),
        locker_held: locker_ids.len(),
        unique_locked_holders,
        total_unlocked: table.total_unlocked(),
        total_locked: table.total_locked(),
    })
}

#[cfg(test)]
mod tests {
    use alloy::providers::mock::Asserter;

    use super::*;

    #[tokio::test]
    async fn block_past_chain_head_is_rejected_without_artifacts() {
        let dir =
            std::env::temp_dir().join(format!("llamas-snapshot-head-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("temp dir: {e}"));

        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        // eth_blockNumber reports a head below the requested block.
        asserter.push_success(&10_u64);

        let result = snapshot_with(&provider, &Config::default(), &dir, 42).await;
        assert!(
            matches!(
                result,
                Err(SnapshotError::InvalidBlock {
                    requested: 42,
                    head: 10
                })
            ),
            "a block past the head must fail validation"
        );
        assert!(
            output::existing_snapshot(&dir, 42).is_none(),
            "no completion marker on failure"
        );
        assert!(!dir.join("Snapshot_42.csv").exists(), "no csv on failure");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn completed_block_is_refused_before_any_network_call() {
        let dir =
            std::env::temp_dir().join(format!("llamas-snapshot-guard-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("temp dir: {e}"));
        std::fs::write(dir.join("Snapshot_42.json"), "{}")
            .unwrap_or_else(|e| panic!("marker: {e}"));

        // An unroutable endpoint proves the guard fires before connecting.
        let config = Config {
            rpc_url: "http://127.0.0.1:1".to_owned(),
            ..Config::default()
        };

        let result = take_snapshot(&config, &dir, 42).await;
        assert!(
            matches!(result, Err(SnapshotError::AlreadySnapshotted { block: 42, .. })),
            "existing artifact must short-circuit the run"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }
}
