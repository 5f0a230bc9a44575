//! External collaborator interfaces.
//!
//! The settlement engine never owns token custody, royalty metadata, or the
//! escrow-credit ledger — those live behind the traits here. Calls into
//! collaborators are untrusted: read-side failures are modeled as ordinary
//! `Err`/`None` values that resolution absorbs (absence of a capability is
//! a normal outcome, not an exceptional path), and the only fallible value
//! movement is [`ValueBank::send`], which the escrow-fallback sender wraps.

use thiserror::Error;

use crate::{Address, AssetId};

/// Resource ceiling for one direct value transfer.
///
/// Bounds how much execution a recipient can consume, so one hostile
/// recipient cannot make settlement fail for everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SendBudget(pub u64);

/// Why a direct value transfer failed. Never surfaced past the
/// escrow-fallback sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("recipient rejected the transfer")]
    Rejected,
    #[error("send budget exceeded")]
    BudgetExceeded,
    #[error("recipient has no receive path")]
    NoReceiver,
}

/// Why a collaborator read or custody call failed. Read-side failures are
/// absorbed as "absent info"; custody failures abort the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollabError {
    #[error("collaborator call reverted")]
    Reverted,
    #[error("no such entry")]
    Missing,
}

/// The external asset registry: ownership, balances, custody transfer.
pub trait AssetRegistry {
    /// Current owner of an asset: the account holding every edition.
    /// Fails while editions are spread across holders.
    fn owner_of(&self, asset: AssetId) -> std::result::Result<Address, CollabError>;

    /// Number of assets (or membership credits) held by an account.
    fn balance_of(&self, holder: Address) -> u64;

    /// Safe-transfer semantics: moves custody of one edition or fails
    /// atomically. A multi-edition seller keeps their remaining units.
    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        asset: AssetId,
    ) -> std::result::Result<(), CollabError>;
}

/// The external royalty directory: per-asset creator payment info.
pub trait RoyaltyDirectory {
    /// Ordered `(recipients, shares_in_basis_points)` for an asset. Shares
    /// need not sum to 10000; they are renormalized against their own total.
    fn creator_payment_info(
        &self,
        asset: AssetId,
    ) -> std::result::Result<(Vec<Address>, Vec<u64>), CollabError>;

    /// Original creator of the asset. May fail — treated as unknown.
    fn token_creator(&self, asset: AssetId) -> std::result::Result<Address, CollabError>;
}

/// Recipient list exposed by a percent-split contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitShares {
    pub recipients: Vec<Address>,
    pub shares_bp: Vec<u64>,
}

/// Opportunistic probe for the percent-split capability.
pub trait SplitProbe {
    /// `Some` if the recipient is a well-formed percent-split contract,
    /// `None` otherwise (including every probe failure).
    fn probe_split(&self, recipient: Address) -> Option<SplitShares>;
}

/// Direct value transfer out of the market's controlled balance.
pub trait ValueBank {
    /// Attempt a direct transfer capped to `budget`.
    fn send(
        &mut self,
        to: Address,
        amount: u128,
        budget: SendBudget,
    ) -> std::result::Result<(), SendError>;
}

/// The external escrow-credit ledger for undeliverable payouts.
///
/// Credits written here are only ever decremented by the collaborator's
/// own withdraw path, never by this engine.
pub trait EscrowLedger {
    /// Credit `amount` to `recipient`'s escrow balance.
    fn deposit_for(&mut self, recipient: Address, amount: u128);

    /// Available escrow balance.
    fn balance_of(&self, recipient: Address) -> u128;

    /// Locked + available escrow balance.
    fn total_balance_of(&self, recipient: Address) -> u128;
}

/// One of each collaborator, bundled for call ergonomics.
///
/// `membership` is the optional registry whose holders qualify for the
/// zero-treasury-fee carve-out.
pub struct Collaborators<'a> {
    pub registry: &'a mut dyn AssetRegistry,
    pub royalties: &'a dyn RoyaltyDirectory,
    pub splits: &'a dyn SplitProbe,
    pub membership: Option<&'a dyn AssetRegistry>,
    pub bank: &'a mut dyn ValueBank,
    pub ledger: &'a mut dyn EscrowLedger,
}
