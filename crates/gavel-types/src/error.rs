//! Error types for the Gavel settlement engine.
//!
//! All errors use the `GVL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Listing / validation errors
//! - 2xx: Auction errors
//! - 3xx: Offer / private-sale errors
//! - 4xx: Settlement / payout errors
//! - 5xx: Access-control errors
//! - 9xx: General / internal errors
//!
//! Collaborator probe failures and direct-transfer failures are deliberately
//! absent: both are recovered locally (absent info / escrow fallback) and
//! never surface to callers.

use thiserror::Error;

use crate::AssetId;

/// Central error enum for all Gavel operations.
///
/// Every variant rejects the whole operation atomically — no partial
/// effects persist, and no operation is retried automatically.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Listing / Validation Errors (1xx)
    // =================================================================
    /// Prices and offer amounts must be strictly positive.
    #[error("GVL_ERR_100: Price must be greater than zero")]
    ZeroPrice,

    /// The attached value does not match the required amount exactly.
    #[error("GVL_ERR_101: Payment mismatch: expected {expected}, attached {attached}")]
    PaymentMismatch { expected: u128, attached: u128 },

    /// No live listing (of the required mechanism) exists for the asset.
    #[error("GVL_ERR_102: No active listing for {0}")]
    NoActiveListing(AssetId),

    /// The caller does not own / did not list the asset.
    #[error("GVL_ERR_103: Caller is not the owner or seller of {0}")]
    NotSeller(AssetId),

    /// Another sale mechanism currently owns settlement rights over the asset.
    #[error("GVL_ERR_104: Listing conflict for {asset}: {reason}")]
    ListingConflict { asset: AssetId, reason: String },

    /// Multi-edition listings need at least one edition.
    #[error("GVL_ERR_105: Edition count must be greater than zero")]
    ZeroCount,

    /// Offers and private sales must expire in the future.
    #[error("GVL_ERR_106: Expiration is not in the future")]
    ExpirationInPast,

    // =================================================================
    // Auction Errors (2xx)
    // =================================================================
    /// No auction exists for this asset.
    #[error("GVL_ERR_200: No auction for {0}")]
    AuctionNotFound(AssetId),

    /// A bid arrived after the fixed end time.
    #[error("GVL_ERR_201: Auction for {0} has ended")]
    AuctionEnded(AssetId),

    /// Bids must strictly exceed both the reserve and the standing high bid.
    #[error("GVL_ERR_202: Bid too low: must exceed {must_exceed}, offered {offered}")]
    BidTooLow { must_exceed: u128, offered: u128 },

    /// Settlement was attempted before the fixed end time elapsed.
    #[error("GVL_ERR_203: Auction for {0} is still running")]
    AuctionStillRunning(AssetId),

    /// Only an admin may force-cancel an auction that already has bids.
    #[error("GVL_ERR_204: Auction for {0} has bids; only an admin may force-cancel")]
    AuctionHasBids(AssetId),

    /// Auction duration outside the configured bounds.
    #[error("GVL_ERR_205: Auction duration out of bounds: {seconds}s")]
    InvalidDuration { seconds: i64 },

    /// Auctionable items are restricted to a single edition by construction.
    #[error("GVL_ERR_206: Auctions require a single-edition item (count was {count})")]
    MultiEditionAuction { count: u32 },

    // =================================================================
    // Offer / Private-Sale Errors (3xx)
    // =================================================================
    /// The standing offer expired before it was accepted.
    #[error("GVL_ERR_300: Offer for {0} has expired")]
    OfferExpired(AssetId),

    /// A replacement offer must exceed the standing one.
    #[error("GVL_ERR_301: Offer must exceed the standing offer of {standing}")]
    OfferBelowStanding { standing: u128 },

    /// No standing offer exists for this asset.
    #[error("GVL_ERR_302: No offer for {0}")]
    OfferNotFound(AssetId),

    /// Private sales are restricted to the pre-authorized counterpart.
    #[error("GVL_ERR_303: Caller is not the designated private-sale buyer")]
    NotDesignatedBuyer,

    /// The private sale expired before completion.
    #[error("GVL_ERR_304: Private sale for {0} has expired")]
    PrivateSaleExpired(AssetId),

    /// No private sale exists for this asset.
    #[error("GVL_ERR_305: No private sale for {0}")]
    PrivateSaleNotFound(AssetId),

    // =================================================================
    // Settlement / Payout Errors (4xx)
    // =================================================================
    /// A payout-performing entry point was re-entered mid-settlement.
    #[error("GVL_ERR_400: Reentrant settlement blocked")]
    ReentrantSettlement,

    /// The asset registry rejected a custody transfer; the whole
    /// operation is aborted with no state change.
    #[error("GVL_ERR_401: Asset registry rejected transfer of {0}")]
    AssetTransferRejected(AssetId),

    // =================================================================
    // Access-Control Errors (5xx)
    // =================================================================
    /// The caller lacks the role required for this operation.
    #[error("GVL_ERR_500: Caller is not authorized for this operation")]
    Unauthorized,

    /// Fee divisors are bounded below (which bounds the fee percentage above).
    #[error("GVL_ERR_501: Fee divisor below minimum of {minimum}")]
    FeeDivisorTooLow { minimum: u128 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("GVL_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;
