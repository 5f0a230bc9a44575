//! In-memory mock collaborators for tests.
//!
//! Enabled with the `test-helpers` feature (and in this crate's own tests).
//! These are deliberately simple table-driven fakes: tests configure exact
//! owners, royalty rows, split fan-outs, and which recipients reject
//! incoming value.

use std::collections::{HashMap, HashSet};

use crate::{
    Address, AssetId, AssetRegistry, CollabError, EscrowLedger, RoyaltyDirectory, SendBudget,
    SendError, SplitProbe, SplitShares, ValueBank,
};

/// In-memory asset registry with per-holder edition balances.
///
/// Each asset maps to `holder -> units`. Single-edition assets behave like
/// a plain ownership table; a multi-edition seller keeps custody of their
/// remaining units as editions sell one at a time.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    holdings: HashMap<AssetId, HashMap<Address, u32>>,
    credits: HashMap<Address, u64>,
    fail_reads: bool,
    fail_transfers: bool,
}

impl MemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `owner` the sole holder of one edition of `asset`, replacing
    /// any prior holders.
    pub fn set_owner(&mut self, asset: AssetId, owner: Address) {
        self.holdings.insert(asset, HashMap::from([(owner, 1)]));
    }

    /// Mint `units` additional editions of `asset` to `owner`.
    pub fn mint(&mut self, asset: AssetId, owner: Address, units: u32) {
        *self
            .holdings
            .entry(asset)
            .or_default()
            .entry(owner)
            .or_insert(0) += units;
    }

    /// Editions of `asset` currently held by `holder`.
    #[must_use]
    pub fn units_of(&self, asset: AssetId, holder: Address) -> u32 {
        self.holdings
            .get(&asset)
            .and_then(|h| h.get(&holder))
            .copied()
            .unwrap_or(0)
    }

    /// Grant `holder` extra balance units (used for membership carve-outs).
    pub fn credit(&mut self, holder: Address, units: u64) {
        *self.credits.entry(holder).or_insert(0) += units;
    }

    /// Make every read call revert from now on.
    pub fn fail_reads(&mut self) {
        self.fail_reads = true;
    }

    /// Make every transfer call revert from now on.
    pub fn fail_transfers(&mut self) {
        self.fail_transfers = true;
    }
}

impl AssetRegistry for MemoryRegistry {
    fn owner_of(&self, asset: AssetId) -> Result<Address, CollabError> {
        if self.fail_reads {
            return Err(CollabError::Reverted);
        }
        let holders = self.holdings.get(&asset).ok_or(CollabError::Missing)?;
        let mut live = holders.iter().filter(|&(_, &units)| units > 0);
        match (live.next(), live.next()) {
            // A unique owner exists only while one account holds every unit.
            (Some((holder, _)), None) => Ok(*holder),
            _ => Err(CollabError::Missing),
        }
    }

    fn balance_of(&self, holder: Address) -> u64 {
        let owned: u64 = self
            .holdings
            .values()
            .filter_map(|h| h.get(&holder))
            .map(|&units| u64::from(units))
            .sum();
        owned + self.credits.get(&holder).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: Address, to: Address, asset: AssetId) -> Result<(), CollabError> {
        if self.fail_transfers {
            return Err(CollabError::Reverted);
        }
        let holders = self.holdings.get_mut(&asset).ok_or(CollabError::Missing)?;
        match holders.get_mut(&from) {
            Some(units) if *units > 0 => {
                *units -= 1;
                if *units == 0 {
                    holders.remove(&from);
                }
                *holders.entry(to).or_insert(0) += 1;
                Ok(())
            }
            _ => Err(CollabError::Reverted),
        }
    }
}

/// Table-driven royalty directory.
#[derive(Debug, Default)]
pub struct TableRoyalties {
    info: HashMap<AssetId, (Vec<Address>, Vec<u64>)>,
    creators: HashMap<AssetId, Address>,
    fail: bool,
}

impl TableRoyalties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&mut self, asset: AssetId, recipients: Vec<Address>, shares_bp: Vec<u64>) {
        self.info.insert(asset, (recipients, shares_bp));
    }

    pub fn set_creator(&mut self, asset: AssetId, creator: Address) {
        self.creators.insert(asset, creator);
    }

    /// Make every call revert from now on.
    pub fn fail_all(&mut self) {
        self.fail = true;
    }
}

impl RoyaltyDirectory for TableRoyalties {
    fn creator_payment_info(
        &self,
        asset: AssetId,
    ) -> Result<(Vec<Address>, Vec<u64>), CollabError> {
        if self.fail {
            return Err(CollabError::Reverted);
        }
        Ok(self.info.get(&asset).cloned().unwrap_or_default())
    }

    fn token_creator(&self, asset: AssetId) -> Result<Address, CollabError> {
        if self.fail {
            return Err(CollabError::Reverted);
        }
        self.creators
            .get(&asset)
            .copied()
            .ok_or(CollabError::Missing)
    }
}

/// Table-driven percent-split probe.
#[derive(Debug, Default)]
pub struct TableSplits {
    splits: HashMap<Address, SplitShares>,
}

impl TableSplits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_split(&mut self, split: Address, recipients: Vec<Address>, shares_bp: Vec<u64>) {
        self.splits.insert(
            split,
            SplitShares {
                recipients,
                shares_bp,
            },
        );
    }
}

impl SplitProbe for TableSplits {
    fn probe_split(&self, recipient: Address) -> Option<SplitShares> {
        self.splits.get(&recipient).cloned()
    }
}

/// Value bank that records deliveries and can be told to reject specific
/// recipients (simulating contracts with no receive path).
#[derive(Debug, Default)]
pub struct MockBank {
    delivered: Vec<(Address, u128)>,
    rejecting: HashSet<Address>,
    /// Recipients that only accept sends at or above this budget.
    budget_hungry: HashMap<Address, u64>,
}

impl MockBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, recipient: Address) {
        self.rejecting.insert(recipient);
    }

    /// Simulate a recipient whose receive path needs at least `budget` units.
    pub fn require_budget(&mut self, recipient: Address, budget: u64) {
        self.budget_hungry.insert(recipient, budget);
    }

    /// Total delivered directly to `recipient` across all sends.
    #[must_use]
    pub fn delivered_to(&self, recipient: Address) -> u128 {
        self.delivered
            .iter()
            .filter(|(to, _)| *to == recipient)
            .map(|(_, amount)| amount)
            .sum()
    }

    /// All deliveries in order.
    #[must_use]
    pub fn deliveries(&self) -> &[(Address, u128)] {
        &self.delivered
    }
}

impl ValueBank for MockBank {
    fn send(&mut self, to: Address, amount: u128, budget: SendBudget) -> Result<(), SendError> {
        if self.rejecting.contains(&to) {
            return Err(SendError::Rejected);
        }
        if let Some(needed) = self.budget_hungry.get(&to) {
            if budget.0 < *needed {
                return Err(SendError::BudgetExceeded);
            }
        }
        self.delivered.push((to, amount));
        Ok(())
    }
}

/// In-memory escrow-credit ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    credits: HashMap<Address, u128>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EscrowLedger for MemoryLedger {
    fn deposit_for(&mut self, recipient: Address, amount: u128) {
        *self.credits.entry(recipient).or_insert(0) += amount;
    }

    fn balance_of(&self, recipient: Address) -> u128 {
        self.credits.get(&recipient).copied().unwrap_or(0)
    }

    fn total_balance_of(&self, recipient: Address) -> u128 {
        self.balance_of(recipient)
    }
}
