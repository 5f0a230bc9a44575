//! Reserve-auction operations.
//!
//! Auctions hold asset custody at the market address from creation until
//! settlement or cancellation. The end time fixed at creation is final:
//! there is no anti-sniping extension. Each superseding bid refunds the
//! immediately-superseded bidder exactly once, through the escrow-fallback
//! sender, so a hostile bidder cannot block being outbid.

use chrono::{DateTime, Duration, Utc};
use gavel_types::{
    Address, AssetId, AssetRegistry, Auction, Collaborators, ListingRecord, MarketError,
    MarketEvent, Mechanism, Result, SaleId,
};

use crate::market::Marketplace;
use gavel_types::constants::{MAX_AUCTION_DURATION_SECS, MIN_AUCTION_DURATION_SECS};

impl Marketplace {
    /// Open a reserve auction and move the asset into market custody.
    ///
    /// Single-edition only: an existing multi-edition buy-price listing on
    /// the asset blocks the auction; a single-edition buy-price listing by
    /// the same seller is replaced.
    pub fn create_auction(
        &mut self,
        registry: &mut dyn AssetRegistry,
        asset: AssetId,
        seller: Address,
        reserve_price: u128,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if reserve_price == 0 {
            return Err(MarketError::ZeroPrice);
        }
        let seconds = duration.num_seconds();
        if !(MIN_AUCTION_DURATION_SECS..=MAX_AUCTION_DURATION_SECS).contains(&seconds) {
            return Err(MarketError::InvalidDuration { seconds });
        }
        if let Some(record) = self.listings.get(&asset) {
            match &record.mechanism {
                Mechanism::BuyPrice(_) if record.seller == seller => {
                    if record.count != 1 {
                        return Err(MarketError::MultiEditionAuction {
                            count: record.count,
                        });
                    }
                }
                other => {
                    return Err(MarketError::ListingConflict {
                        asset,
                        reason: format!("asset is held by a live {}", other.name()),
                    });
                }
            }
        }
        if registry.owner_of(asset) != Ok(seller) {
            return Err(MarketError::NotSeller(asset));
        }

        registry
            .transfer(seller, self.address, asset)
            .map_err(|_| MarketError::AssetTransferRejected(asset))?;

        let end = now + duration;
        self.listings.insert(
            asset,
            ListingRecord {
                seller,
                count: 1,
                mechanism: Mechanism::Auction(Auction {
                    reserve_price,
                    start: now,
                    end,
                    high_bidder: None,
                    high_bid: 0,
                }),
                in_escrow: true,
            },
        );
        self.events.push(MarketEvent::AuctionCreated {
            asset,
            seller,
            reserve_price,
            end,
        });
        tracing::info!(%asset, %seller, reserve_price, %end, "auction created");
        Ok(())
    }

    /// Record a bid. Must strictly exceed both the reserve price and the
    /// standing high bid; the superseded bidder (if any) is refunded.
    pub fn place_bid(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        bidder: Address,
        amount: u128,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.enter_settlement()?;
        let result = self.place_bid_inner(collab, asset, bidder, amount, now);
        self.exit_settlement();
        result
    }

    fn place_bid_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        bidder: Address,
        amount: u128,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let superseded = {
            let record = self
                .listings
                .get_mut(&asset)
                .ok_or(MarketError::AuctionNotFound(asset))?;
            let Mechanism::Auction(auction) = &mut record.mechanism else {
                return Err(MarketError::AuctionNotFound(asset));
            };
            if !auction.is_open(now) {
                return Err(MarketError::AuctionEnded(asset));
            }
            if amount <= auction.high_bid || amount <= auction.reserve_price {
                return Err(MarketError::BidTooLow {
                    must_exceed: auction.high_bid.max(auction.reserve_price),
                    offered: amount,
                });
            }
            let superseded = auction.high_bidder.map(|b| (b, auction.high_bid));
            auction.high_bidder = Some(bidder);
            auction.high_bid = amount;
            superseded
        };

        // State recorded first; exactly one refund per superseding bid.
        if let Some((prev_bidder, prev_amount)) = superseded {
            self.refund(&mut *collab.bank, &mut *collab.ledger, prev_bidder, prev_amount);
        }
        self.events.push(MarketEvent::BidAdded {
            asset,
            bidder,
            amount,
            refunded: superseded,
        });
        tracing::debug!(%asset, %bidder, amount, "bid recorded");
        Ok(())
    }

    /// Cancel an auction: custody returns to the seller and any standing
    /// bid is refunded. The seller may cancel only while no bids stand; an
    /// admin may force-cancel at any time before settlement.
    pub fn cancel_auction(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
    ) -> Result<()> {
        self.enter_settlement()?;
        let result = self.cancel_auction_inner(collab, asset, caller);
        self.exit_settlement();
        result
    }

    fn cancel_auction_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
    ) -> Result<()> {
        let (seller, standing) = match self.listings.get(&asset) {
            Some(record) => match &record.mechanism {
                Mechanism::Auction(a) => {
                    (record.seller, a.high_bidder.map(|b| (b, a.high_bid)))
                }
                _ => return Err(MarketError::AuctionNotFound(asset)),
            },
            None => return Err(MarketError::AuctionNotFound(asset)),
        };
        if !self.roles.is_admin(caller) {
            if caller != seller {
                return Err(MarketError::NotSeller(asset));
            }
            if standing.is_some() {
                return Err(MarketError::AuctionHasBids(asset));
            }
        }

        collab
            .registry
            .transfer(self.address, seller, asset)
            .map_err(|_| MarketError::AssetTransferRejected(asset))?;
        self.listings.remove(&asset);

        if let Some((bidder, amount)) = standing {
            self.refund(&mut *collab.bank, &mut *collab.ledger, bidder, amount);
        }
        self.events.push(MarketEvent::AuctionCancelled {
            asset,
            by: caller,
            refunded: standing,
        });
        tracing::info!(%asset, by = %caller, "auction cancelled");
        Ok(())
    }

    /// Settle an ended auction. Callable by anyone (keeper-style): with a
    /// standing bid, custody moves to the winner and proceeds are
    /// distributed; with no bids, settlement degrades to a cancellation and
    /// `Ok(None)` is returned.
    pub fn accept_winning_bid(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        now: DateTime<Utc>,
    ) -> Result<Option<SaleId>> {
        self.enter_settlement()?;
        let result = self.accept_winning_bid_inner(collab, asset, caller, now);
        self.exit_settlement();
        result
    }

    fn accept_winning_bid_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        now: DateTime<Utc>,
    ) -> Result<Option<SaleId>> {
        let (seller, auction) = match self.listings.get(&asset) {
            Some(record) => match &record.mechanism {
                Mechanism::Auction(a) => (record.seller, *a),
                _ => return Err(MarketError::AuctionNotFound(asset)),
            },
            None => return Err(MarketError::AuctionNotFound(asset)),
        };
        if !auction.has_ended(now) {
            return Err(MarketError::AuctionStillRunning(asset));
        }

        let Some(winner) = auction.high_bidder else {
            // Zero bids: degrade to a cancellation.
            collab
                .registry
                .transfer(self.address, seller, asset)
                .map_err(|_| MarketError::AssetTransferRejected(asset))?;
            self.listings.remove(&asset);
            self.events.push(MarketEvent::AuctionCancelled {
                asset,
                by: caller,
                refunded: None,
            });
            tracing::info!(%asset, "auction ended with no bids, custody returned");
            return Ok(None);
        };

        collab
            .registry
            .transfer(self.address, winner, asset)
            .map_err(|_| MarketError::AssetTransferRejected(asset))?;
        self.listings.remove(&asset);
        let sale = self.finalize_sale(collab, asset, seller, winner, auction.high_bid);
        Ok(Some(sale))
    }
}
