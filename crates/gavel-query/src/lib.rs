//! # gavel-query
//!
//! **Read-only query aggregator**: one call answers everything a reader
//! needs about an asset — beneficial owner, the live sale mechanism, and a
//! fee-breakdown preview for the mechanism's current price basis — plus a
//! natural-language summary built from the display helpers.
//!
//! Nothing here mutates state. Fee previews reuse the payout engine's
//! resolution, so a preview always matches what settlement would pay.

pub mod format;
mod status;

pub use format::{format_amount, format_payment, format_time_delta};
pub use status::{
    AuctionDetails, FullStatus, OfferDetails, PrivateSaleDetails, full_status, human_summary,
};
