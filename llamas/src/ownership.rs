//! In-memory ownership accounting.
//!
//! [`OwnershipTable`] accumulates per-address unlocked/locked counts across
//! the two snapshot phases. Entries keep their insertion order, which is
//! what makes the final sort stable-tie-broken by discovery order, and the
//! insert-or-update path is an explicit entry operation rather than an
//! implicit create-on-access.

use std::collections::HashMap;

use alloy::primitives::Address;
use serde::Serialize;

/// Unlocked/locked token counts for one address.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HolderCounts {
    /// Tokens held directly in the address's wallet.
    pub unlocked: u64,
    /// Tokens deposited in the locker on the address's behalf.
    pub locked: u64,
}

/// Per-address ownership table, ordered by first sighting.
#[derive(Debug, Default)]
pub struct OwnershipTable {
    /// Address → position in `entries`.
    index: HashMap<Address, usize>,
    entries: Vec<(Address, HolderCounts)>,
}

impl OwnershipTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct addresses observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no address has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert-or-update: the counts for `address`, created zeroed on first
    /// sighting.
    pub fn counts_mut(&mut self, address: Address) -> &mut HolderCounts {
        let slot = match self.index.get(&address) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push((address, HolderCounts::default()));
                self.index.insert(address, slot);
                slot
            }
        };
        // Index invariant: every slot in `index` points into `entries`.
        &mut self.entries[slot].1
    }

    /// Read-only counts for `address`, if it has been observed.
    #[must_use]
    pub fn counts(&self, address: &Address) -> Option<&HolderCounts> {
        self.index.get(address).and_then(|&i| self.entries.get(i)).map(|(_, c)| c)
    }

    /// Entries in their current order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &HolderCounts)> {
        self.entries.iter().map(|(a, c)| (a, c))
    }

    /// Re-order entries by `locked` descending; ties keep discovery order.
    pub fn sort_by_locked(&mut self) {
        // Vec::sort_by is stable.
        self.entries.sort_by(|a, b| b.1.locked.cmp(&a.1.locked));
        for (slot, (address, _)) in self.entries.iter().enumerate() {
            self.index.insert(*address, slot);
        }
    }

    /// Sum of `unlocked` across all entries.
    #[must_use]
    pub fn total_unlocked(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c.unlocked).sum()
    }

    /// Sum of `locked` across all entries.
    #[must_use]
    pub fn total_locked(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c.locked).sum()
    }
}

/// Phase 1: classify the direct owner of every token in the collection.
///
/// `owners[j]` must be the `ownerOf(j)` result, in token-ID order. Tokens
/// whose direct owner is the locker contract are collected into the returned
/// ID list and contribute to no address's `unlocked` count; the locker
/// address itself never gets a table entry.
pub fn apply_direct_owners(
    table: &mut OwnershipTable,
    owners: &[Address],
    locker: Address,
) -> Vec<u64> {
    let mut locker_ids = Vec::new();
    for (token_id, owner) in owners.iter().enumerate() {
        if *owner == locker {
            locker_ids.push(token_id as u64);
        } else {
            table.counts_mut(*owner).unlocked += 1;
        }
    }
    locker_ids
}

/// Phase 2: credit each lock record's depositor with one locked token.
///
/// `owners` are the `locks(id).owner` results for the IDs found in phase 1.
/// Returns the number of addresses whose `locked` count moved off zero
/// (unique locked holders, reported in the run summary).
pub fn apply_lock_owners(table: &mut OwnershipTable, owners: &[Address]) -> u64 {
    let mut unique_holders = 0;
    for owner in owners {
        let counts = table.counts_mut(*owner);
        counts.locked += 1;
        if counts.locked == 1 {
            unique_holders += 1;
        }
    }
    unique_holders
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn counts_mut_creates_zeroed_entry_once() {
        let mut table = OwnershipTable::new();
        assert_eq!(*table.counts_mut(addr(1)), HolderCounts::default(), "fresh entry is zeroed");
        table.counts_mut(addr(1)).unlocked += 3;
        assert_eq!(table.len(), 1, "same address must not duplicate");
        assert_eq!(table.counts(&addr(1)).map(|c| c.unlocked), Some(3), "updates hit the one entry");
    }

    #[test]
    fn direct_owners_split_locker_from_wallets() {
        let locker = addr(0xAA);
        // Token 2 sits in the locker; the rest belong to two wallets.
        let owners = [addr(1), addr(2), locker, addr(1), addr(1)];

        let mut table = OwnershipTable::new();
        let locker_ids = apply_direct_owners(&mut table, &owners, locker);

        assert_eq!(locker_ids, vec![2], "locker-held token IDs collected by position");
        assert!(table.counts(&locker).is_none(), "locker address gets no entry");
        assert_eq!(table.counts(&addr(1)).map(|c| c.unlocked), Some(3), "wallet count");
        assert_eq!(table.counts(&addr(2)).map(|c| c.unlocked), Some(1), "wallet count");
        assert_eq!(
            table.total_unlocked() + locker_ids.len() as u64,
            owners.len() as u64,
            "every token is either unlocked or locker-held"
        );
    }

    #[test]
    fn lock_owners_credit_depositors_and_count_unique_holders() {
        let mut table = OwnershipTable::new();
        // addr(1) already holds unlocked tokens; addr(9) appears only here.
        table.counts_mut(addr(1)).unlocked = 2;

        let unique = apply_lock_owners(&mut table, &[addr(1), addr(9), addr(1)]);

        assert_eq!(unique, 2, "each address counted once on its first lock");
        assert_eq!(table.counts(&addr(1)).map(|c| c.locked), Some(2), "repeat depositor");
        assert_eq!(
            table.counts(&addr(9)),
            Some(&HolderCounts { unlocked: 0, locked: 1 }),
            "lock-only address created on first sighting"
        );
        assert_eq!(table.total_locked(), 3, "one credit per lock record");
    }

    #[test]
    fn sort_is_descending_and_stable_on_ties() {
        let mut table = OwnershipTable::new();
        table.counts_mut(addr(1)).locked = 1;
        table.counts_mut(addr(2)).locked = 3;
        table.counts_mut(addr(3)).locked = 1;
        table.counts_mut(addr(4)).locked = 0;

        table.sort_by_locked();

        let order: Vec<Address> = table.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            order,
            vec![addr(2), addr(1), addr(3), addr(4)],
            "descending by locked, discovery order on ties"
        );
        // Index stays consistent after the re-order.
        assert_eq!(table.counts(&addr(3)).map(|c| c.locked), Some(1), "lookup after sort");
    }
}
