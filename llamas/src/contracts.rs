//! Solidity interface bindings for the on-chain contracts.
//!
//! Only the view functions the snapshot needs are bound. `getLocks` is part
//! of the locker's public interface and is kept for completeness, though the
//! snapshot reads individual lock records via `locks(tokenId)`.

use alloy::sol;

sol! {
    /// The Llamas ERC-721 collection (Vyper contract, fixed supply).
    #[sol(rpc)]
    interface ILlamasNft {
        function ownerOf(uint256 tokenId) external view returns (address owner);
    }

    /// The `LlamaLocker` custody contract.
    ///
    /// While a token is deposited the NFT's direct owner is the locker
    /// itself; the original depositor is recorded in the lock record.
    #[sol(rpc)]
    interface ILlamaLocker {
        /// A single custody record.
        struct NftLock {
            address owner;
            uint256 lockedAt;
            uint256 tokenId;
        }

        function locks(uint256 tokenId) external view returns (address owner, uint256 lockedAt, uint256 lockedTokenId);

        function getLocks() external view returns (NftLock[] memory results);
    }
}
