//! Events emitted by the sale-state machine for external observers.
//!
//! Settlement events carry the full resolved amounts so external auditors
//! can reconcile every smallest unit that moved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, AssetId, SaleId};

/// Audit-trail event stream, buffered by the market and drained by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A buy-price listing was created (or re-priced).
    ItemCreated {
        asset: AssetId,
        seller: Address,
        price: u128,
        count: u32,
    },
    /// A sale finalized: buy, auction settle, offer accept, or private sale.
    ItemSold {
        asset: AssetId,
        sale: SaleId,
        seller: Address,
        buyer: Address,
        price: u128,
        treasury_fee: u128,
        creator_revenue: u128,
        owner_revenue: u128,
    },
    /// A reserve auction went live and custody moved to the market.
    AuctionCreated {
        asset: AssetId,
        seller: Address,
        reserve_price: u128,
        end: DateTime<Utc>,
    },
    /// A bid was recorded; `refunded` names the immediately-superseded
    /// bidder, if any (exactly one refund per superseding bid).
    BidAdded {
        asset: AssetId,
        bidder: Address,
        amount: u128,
        refunded: Option<(Address, u128)>,
    },
    /// An auction was cancelled and custody returned to the seller.
    AuctionCancelled {
        asset: AssetId,
        by: Address,
        refunded: Option<(Address, u128)>,
    },
    /// A buy-price or private-sale listing was withdrawn.
    ListCancelled { asset: AssetId, seller: Address },
    /// A standing offer was recorded; `refunded` names the replaced offeror.
    OfferMade {
        asset: AssetId,
        buyer: Address,
        amount: u128,
        expiration: DateTime<Utc>,
        refunded: Option<(Address, u128)>,
    },
    /// A standing offer was withdrawn and its funds refunded.
    OfferCancelled {
        asset: AssetId,
        buyer: Address,
        amount: u128,
    },
    /// A private sale was pre-authorized and custody moved to the market.
    PrivateSaleCreated {
        asset: AssetId,
        seller: Address,
        buyer: Address,
        amount: u128,
        expiration: DateTime<Utc>,
    },
    /// A direct payout failed and the amount was credited to the
    /// recipient's escrow-ledger balance instead.
    WithdrawalToEscrow { recipient: Address, amount: u128 },
}
