//! Per-asset listing model.
//!
//! Each asset has at most one [`ListingRecord`], and each record holds
//! exactly one live [`Mechanism`] — the invariant that an asset's
//! authoritative sale mechanism is unique is enforced by construction.
//! Custody of the underlying asset moves to the market (`in_escrow`) for
//! the duration of auctions and private sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Address;

/// A fixed, immediately-executable sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyPrice {
    /// Exact amount (smallest unit) a buyer must attach.
    pub price: u128,
}

/// A time-bounded reserve auction with a fixed end time.
///
/// There is intentionally no anti-sniping extension: the end time set at
/// creation is final, so a last-minute bid cannot prolong the auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    /// Minimum acceptable bid; the first bid must strictly exceed it.
    pub reserve_price: u128,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Standing high bidder, if any bid has been placed.
    pub high_bidder: Option<Address>,
    /// Standing high bid amount; zero until the first bid.
    pub high_bid: u128,
}

impl Auction {
    /// Whether bids are currently accepted.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now >= self.start && now <= self.end
    }

    /// Whether the fixed end time has elapsed.
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.end
    }
}

/// A standing offer from one buyer, funds held by the market until it is
/// refunded (replacement / cancellation) or settled (acceptance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub buyer: Address,
    pub amount: u128,
    pub expiration: DateTime<Utc>,
}

impl Offer {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }
}

/// A pre-authorized fixed-price sale restricted to one counterpart address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateSale {
    pub buyer: Address,
    pub amount: u128,
    pub expiration: DateTime<Utc>,
}

impl PrivateSale {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }
}

/// The unique authoritative sale mechanism for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mechanism {
    BuyPrice(BuyPrice),
    Auction(Auction),
    Offer(Offer),
    PrivateSale(PrivateSale),
}

impl Mechanism {
    /// Stable lowercase name for logs and conflict messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Mechanism::BuyPrice(_) => "buy price",
            Mechanism::Auction(_) => "auction",
            Mechanism::Offer(_) => "offer",
            Mechanism::PrivateSale(_) => "private sale",
        }
    }
}

/// Per-asset listing state owned by the sale-state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// The account that receives the owner-revenue bucket on settlement.
    pub seller: Address,
    /// Remaining editions. Auctions and private sales require exactly 1;
    /// buy-price listings stay buyable until this reaches zero.
    pub count: u32,
    pub mechanism: Mechanism,
    /// True while the market holds custody of the asset (auction or
    /// private-sale flow currently owns settlement rights).
    pub in_escrow: bool,
}
