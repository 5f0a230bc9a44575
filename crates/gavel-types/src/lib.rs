//! # gavel-types
//!
//! Shared types, errors, and configuration for the **Gavel** marketplace
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AssetId`], [`SaleId`]
//! - **Listing model**: [`ListingRecord`], [`Mechanism`], [`Auction`], [`Offer`], [`PrivateSale`]
//! - **Fee model**: [`FeeConfig`], [`FeeBreakdown`], [`CreatorShare`], [`FeeResolution`]
//! - **Events**: [`MarketEvent`] carrying full resolved amounts for auditability
//! - **Collaborator interfaces**: [`AssetRegistry`], [`RoyaltyDirectory`],
//!   [`SplitProbe`], [`ValueBank`], [`EscrowLedger`], bundled in [`Collaborators`]
//! - **Errors**: [`MarketError`] with `GVL_ERR_` prefix codes
//! - **Constants**: fee divisors, send budgets, auction duration bounds
//!
//! In-memory mock collaborators for tests live in [`mock`] behind the
//! `test-helpers` feature.

pub mod collab;
pub mod constants;
pub mod error;
pub mod event;
pub mod fees;
pub mod ids;
pub mod listing;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

// Re-export all primary types at crate root for ergonomic imports:
//   use gavel_types::{Address, AssetId, MarketError, Mechanism, ...};

pub use collab::*;
pub use error::*;
pub use event::*;
pub use fees::*;
pub use ids::*;
pub use listing::*;

// Constants are accessed via `gavel_types::constants::FOO`
// (not re-exported to avoid name collisions).
