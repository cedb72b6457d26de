//! Llamas NFT collection bindings and ownership accounting.
//!
//! Read-only contract interfaces for the Llamas ERC-721 collection and its
//! companion `LlamaLocker` custody contract, plus the in-memory ownership
//! table used to merge direct (unlocked) and custodied (locked) holdings
//! per address.

pub mod contracts;
pub mod deployment;
pub mod ownership;

pub use deployment::Deployment;
pub use ownership::{HolderCounts, OwnershipTable};
