//! # gavel-payout
//!
//! **Payout plane**: escrow-fallback value sending and fee/royalty
//! resolution.
//!
//! ## Architecture
//!
//! Settlement of any sale flows through two pieces:
//!
//! 1. [`pay`] — attempts a direct transfer through the [`ValueBank`]
//!    collaborator under a bounded [`SendBudget`]; on any failure the amount
//!    is credited to the recipient's escrow-ledger balance instead. Value is
//!    always either delivered or escrowed, never dropped, and the caller
//!    never observes a failure.
//! 2. [`FeeEngine`] — resolves how a sale price splits across the treasury,
//!    the creator pool (recursively flattening nested percent-split
//!    recipients), and the owner, then pays each resolved row. Untrusted
//!    collaborator calls that fail are absorbed as absent information:
//!    resolution always terminates with a best-effort answer.
//!
//! [`ValueBank`]: gavel_types::ValueBank
//! [`SendBudget`]: gavel_types::SendBudget

pub mod engine;
pub mod flatten;
pub mod sender;

pub use engine::{DistributionReceipt, FeeEngine};
pub use flatten::{LeafShare, flatten_recipients};
pub use sender::{PayOutcome, pay};
