//! # gavel-market
//!
//! **Sale-state machine**: per-asset arbitration between the four sale
//! mechanisms (buy price, reserve auction, standing offer, private sale).
//!
//! ## Invariants
//!
//! - At most one mechanism is live and authoritative per asset, enforced by
//!   construction: each asset maps to one record holding one mechanism.
//! - Custody of the asset moves to the market for the duration of auctions
//!   and private sales; releasing it (to the buyer on success, back to the
//!   seller on cancellation) is part of the same atomic operation.
//! - Funds committed by bidders and offerors are always paid out, refunded,
//!   or escrowed — there is no path that drops or double-spends value.
//! - Every state-mutating entry point that performs payouts runs inside a
//!   reentrancy guard, and all local mutations complete before any external
//!   payout call (checks, then effects, then interactions).
//!
//! Operations live in three modules by mechanism; all of them are methods
//! on [`Marketplace`].

mod auction;
mod market;
mod offer;
mod roles;

pub use market::Marketplace;
pub use roles::{Role, RoleTable};
