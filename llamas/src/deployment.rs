//! Static deployment constants for the Llamas collection.
//!
//! Both contracts live on Ethereum mainnet only; there is exactly one
//! deployment, so the table is a single constant rather than a per-chain
//! lookup.

use alloy::primitives::{Address, address};

/// Addresses and collection parameters for one deployment.
#[derive(Debug, Clone, Copy)]
pub struct Deployment {
    /// The Llamas ERC-721 collection contract.
    pub nft: Address,
    /// The `LlamaLocker` custody contract.
    pub locker: Address,
    /// Fixed collection supply; token IDs are `0..total_supply`.
    pub total_supply: u64,
    /// Suggested public archival RPC endpoint.
    pub default_rpc: &'static str,
}

/// The Ethereum mainnet deployment (chain ID 1).
pub const MAINNET: Deployment = Deployment {
    nft: address!("e127cE638293FA123Be79C25782a5652581Db234"),
    locker: address!("99c3f30Bbc9137F6E917B03C74aEd8a4309B3E1b"),
    total_supply: 1111,
    default_rpc: "https://ethereum-rpc.publicnode.com",
};

impl Deployment {
    /// All token IDs of the collection, in ascending order.
    #[must_use]
    pub fn token_ids(&self) -> impl Iterator<Item = u64> + use<> {
        0..self.total_supply
    }
}
