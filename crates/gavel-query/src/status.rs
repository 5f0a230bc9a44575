//! Read-only status projection over the market and its collaborators.

use chrono::{DateTime, Utc};
use gavel_market::Marketplace;
use gavel_types::{
    Address, AssetId, AssetRegistry, FeeBreakdown, Mechanism, RoyaltyDirectory, SplitProbe,
};
use serde::{Deserialize, Serialize};

use crate::format::{format_payment, format_time_delta};

/// Auction state as seen by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionDetails {
    pub reserve_price: u128,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub high_bidder: Option<Address>,
    pub high_bid: u128,
    /// Whether the fixed end time has elapsed at the query's `now`.
    pub ended: bool,
}

/// Standing-offer state as seen by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDetails {
    pub buyer: Address,
    pub amount: u128,
    pub expiration: DateTime<Utc>,
    pub expired: bool,
}

/// Private-sale state as seen by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateSaleDetails {
    pub buyer: Address,
    pub amount: u128,
    pub expiration: DateTime<Utc>,
    pub expired: bool,
}

/// Everything a reader needs about one asset in a single call: ownership,
/// the live mechanism (at most one, by construction), and a fee preview for
/// the mechanism's current price basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullStatus {
    pub asset: AssetId,
    /// Beneficial owner: the seller while the market holds custody,
    /// otherwise the registry's answer (`None` if the registry cannot say).
    pub owner: Option<Address>,
    pub in_escrow: bool,
    pub buy_price: Option<u128>,
    /// Remaining editions on a buy-price listing.
    pub remaining_editions: Option<u32>,
    pub auction: Option<AuctionDetails>,
    pub offer: Option<OfferDetails>,
    pub private_sale: Option<PrivateSaleDetails>,
    /// Preview of how a sale at the current price basis would split. Absent
    /// when no price is determinable (no live mechanism and no bids).
    pub fees: Option<FeeBreakdown>,
}

/// Aggregate the full sale status of one asset.
///
/// Purely derived: reads the market's listing table and the collaborators,
/// mutates nothing, and absorbs every collaborator failure as absent info.
#[must_use]
#[allow(clippy::too_many_arguments)] // read-side mirror of Collaborators
pub fn full_status(
    market: &Marketplace,
    registry: &dyn AssetRegistry,
    royalties: &dyn RoyaltyDirectory,
    splits: &dyn SplitProbe,
    membership: Option<&dyn AssetRegistry>,
    asset: AssetId,
    now: DateTime<Utc>,
) -> FullStatus {
    let record = market.listing(asset);
    let in_escrow = record.is_some_and(|r| r.in_escrow);
    let owner = if in_escrow {
        record.map(|r| r.seller)
    } else {
        registry.owner_of(asset).ok()
    };

    let mut status = FullStatus {
        asset,
        owner,
        in_escrow,
        buy_price: None,
        remaining_editions: None,
        auction: None,
        offer: None,
        private_sale: None,
        fees: None,
    };

    // At most one arm populates, mirroring the one-mechanism invariant.
    let price_basis = match record.map(|r| &r.mechanism) {
        Some(Mechanism::BuyPrice(bp)) => {
            status.buy_price = Some(bp.price);
            status.remaining_editions = record.map(|r| r.count);
            Some(bp.price)
        }
        Some(Mechanism::Auction(a)) => {
            status.auction = Some(AuctionDetails {
                reserve_price: a.reserve_price,
                start: a.start,
                end: a.end,
                high_bidder: a.high_bidder,
                high_bid: a.high_bid,
                ended: a.has_ended(now),
            });
            Some(if a.high_bid > 0 { a.high_bid } else { a.reserve_price })
        }
        Some(Mechanism::Offer(o)) => {
            status.offer = Some(OfferDetails {
                buyer: o.buyer,
                amount: o.amount,
                expiration: o.expiration,
                expired: o.is_expired(now),
            });
            Some(o.amount)
        }
        Some(Mechanism::PrivateSale(ps)) => {
            status.private_sale = Some(PrivateSaleDetails {
                buyer: ps.buyer,
                amount: ps.amount,
                expiration: ps.expiration,
                expired: ps.is_expired(now),
            });
            Some(ps.amount)
        }
        None => None,
    };

    if let Some(price) = price_basis {
        let seller = record.map_or(owner.unwrap_or(Address::ZERO), |r| r.seller);
        status.fees = Some(
            market
                .fees()
                .resolve_fees(royalties, splits, membership, asset, price, seller)
                .breakdown,
        );
    }

    status
}

/// One-line natural-language rendering of a [`FullStatus`].
#[must_use]
pub fn human_summary(status: &FullStatus, now: DateTime<Utc>) -> String {
    let asset = status.asset;
    let mut line = if let Some(a) = &status.auction {
        let window = if a.ended {
            "ended".to_string()
        } else {
            format!("ending in {}", format_time_delta(a.end - now))
        };
        match a.high_bidder {
            Some(bidder) => format!(
                "{asset} is in a reserve auction {window}; high bid {} by {}",
                format_payment(a.high_bid),
                bidder.short(),
            ),
            None => format!(
                "{asset} is in a reserve auction {window}; no bids yet, reserve {}",
                format_payment(a.reserve_price),
            ),
        }
    } else if let Some(price) = status.buy_price {
        let editions = status.remaining_editions.unwrap_or(1);
        if editions > 1 {
            format!(
                "{asset} is listed for {} ({editions} editions remaining)",
                format_payment(price)
            )
        } else {
            format!("{asset} is listed for {}", format_payment(price))
        }
    } else if let Some(o) = &status.offer {
        let timing = if o.expired {
            "expired".to_string()
        } else {
            format!("expiring in {}", format_time_delta(o.expiration - now))
        };
        format!(
            "{asset} has a standing offer of {} from {}, {timing}",
            format_payment(o.amount),
            o.buyer.short(),
        )
    } else if let Some(ps) = &status.private_sale {
        let timing = if ps.expired {
            "expired".to_string()
        } else {
            format!("expiring in {}", format_time_delta(ps.expiration - now))
        };
        format!(
            "{asset} is reserved for private sale to {} at {}, {timing}",
            ps.buyer.short(),
            format_payment(ps.amount),
        )
    } else {
        match status.owner {
            Some(owner) => format!("{asset} is not listed; owned by {}", owner.short()),
            None => format!("{asset} is not listed; owner unknown"),
        }
    };

    if let Some(fees) = &status.fees {
        line.push_str(&format!(
            " (a sale would pay {} to the treasury, {} to creators, {} to the owner)",
            format_payment(fees.treasury_fee),
            format_payment(fees.creator_revenue),
            format_payment(fees.owner_revenue),
        ));
    }
    line
}
