//! Rate-limited sequential batch execution over multicall.
//!
//! An ordered list of encoded calls is partitioned into fixed-size chunks;
//! each chunk becomes one `Multicall3.aggregate` round trip pinned to the
//! target block, chunks run strictly one after another, and a fixed pause
//! separates them. The pause is a self-imposed throttle to keep public RPC
//! endpoints happy, not backoff: any failed batch aborts the whole run and
//! the operator reruns once the artifact guard lets them.

use std::time::Duration;

use alloy::eips::BlockId;
use alloy::providers::{CallItem, Provider};
use alloy::sol_types::SolCall;

use crate::error::SnapshotError;

/// Per-request timeout for RPC calls.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How one phase's calls are sliced and paced.
#[derive(Debug, Clone, Copy)]
pub struct BatchPlan {
    /// Sub-calls per multicall round trip.
    pub batch_size: usize,
    /// Pause between consecutive round trips.
    pub delay: Duration,
    /// Historical block every batch is evaluated at.
    pub block: BlockId,
}

/// Split `items` into contiguous chunks of at most `size`, preserving order.
///
/// All chunks are exactly `size` long except possibly the last, which holds
/// the remainder. `size` must be nonzero (enforced at config load).
pub fn partition<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    debug_assert!(size > 0, "batch size must be nonzero");
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size.max(1)));
    let mut rest = items;
    while rest.len() > size {
        let tail = rest.split_off(size);
        chunks.push(rest);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// Execute `calls` in sequential batches, returning results in call order.
///
/// `result[j]` corresponds to `calls[j]`, so callers can map results back to
/// the originating token ID by position. Batches are never issued
/// concurrently; every batch is evaluated atomically at `plan.block`.
///
/// # Errors
///
/// Fails fast on the first timed-out or failed batch; no partial results
/// are returned.
pub async fn execute_batched<P, D>(
    provider: &P,
    calls: Vec<CallItem<D>>,
    plan: &BatchPlan,
    phase: &str,
) -> Result<Vec<D::Return>, SnapshotError>
where
    P: Provider,
    D: SolCall + 'static,
{
    let expected = calls.len();
    let chunks = partition(calls, plan.batch_size);
    let total = chunks.len();
    let mut results = Vec::with_capacity(expected);

    for (i, chunk) in chunks.into_iter().enumerate() {
        let mut multicall = provider.multicall().dynamic::<D>().block(plan.block);
        for call in chunk {
            multicall = multicall.add_call_dynamic(call);
        }

        let batch = tokio::time::timeout(REQUEST_TIMEOUT, multicall.aggregate())
            .await
            .map_err(|_| SnapshotError::Timeout)??;
        results.extend(batch);

        tracing::info!(phase, batch = i + 1, total, "batch complete");

        if i + 1 < total {
            tokio::time::sleep(plan.delay).await;
        }
    }

    Ok(results)
}
