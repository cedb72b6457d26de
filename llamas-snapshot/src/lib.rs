//! Llamas ownership snapshot library.
//!
//! Reconstructs, at a pinned historical block, who holds each token of the
//! Llamas collection — directly in a wallet or deposited in the locker —
//! and persists the merged per-address counts as JSON and CSV artifacts.

pub mod config;
pub mod error;
pub mod output;
pub mod scheduler;
pub mod snapshot;
