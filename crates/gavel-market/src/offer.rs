//! Standing offers and private sales.
//!
//! An offer commits the offeror's funds to the market until it is refunded
//! (replacement or cancellation) or settled (acceptance by the asset's
//! owner). A replacement offer must strictly exceed the standing one unless
//! the standing one has expired; the replaced offeror is refunded exactly
//! once. Private sales escrow asset custody at creation, so the designated
//! buyer is guaranteed delivery on payment.

use chrono::{DateTime, Utc};
use gavel_types::{
    Address, AssetId, AssetRegistry, Collaborators, ListingRecord, MarketError, MarketEvent,
    Mechanism, Offer, PrivateSale, Result, SaleId,
};

use crate::market::Marketplace;

impl Marketplace {
    /// Record a standing offer on an asset. The asset must have a resolvable
    /// owner and must not be held by another live mechanism; an existing
    /// offer is replaced only by a strictly higher one (or any amount once
    /// it has expired).
    pub fn make_offer(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        buyer: Address,
        amount: u128,
        expiration: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.enter_settlement()?;
        let result = self.make_offer_inner(collab, asset, buyer, amount, expiration, now);
        self.exit_settlement();
        result
    }

    fn make_offer_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        buyer: Address,
        amount: u128,
        expiration: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if amount == 0 {
            return Err(MarketError::ZeroPrice);
        }
        if expiration <= now {
            return Err(MarketError::ExpirationInPast);
        }

        let (seller, superseded) = match self.listings.get(&asset) {
            None => {
                let owner = collab
                    .registry
                    .owner_of(asset)
                    .map_err(|_| MarketError::NoActiveListing(asset))?;
                (owner, None)
            }
            Some(record) => match &record.mechanism {
                Mechanism::Offer(prev) => {
                    if !prev.is_expired(now) && amount <= prev.amount {
                        return Err(MarketError::OfferBelowStanding {
                            standing: prev.amount,
                        });
                    }
                    (record.seller, Some((prev.buyer, prev.amount)))
                }
                other => {
                    return Err(MarketError::ListingConflict {
                        asset,
                        reason: format!("asset is held by a live {}", other.name()),
                    });
                }
            },
        };

        self.listings.insert(
            asset,
            ListingRecord {
                seller,
                count: 1,
                mechanism: Mechanism::Offer(Offer {
                    buyer,
                    amount,
                    expiration,
                }),
                in_escrow: false,
            },
        );
        if let Some((prev_buyer, prev_amount)) = superseded {
            self.refund(&mut *collab.bank, &mut *collab.ledger, prev_buyer, prev_amount);
        }
        self.events.push(MarketEvent::OfferMade {
            asset,
            buyer,
            amount,
            expiration,
            refunded: superseded,
        });
        tracing::debug!(%asset, %buyer, amount, "offer recorded");
        Ok(())
    }

    /// Withdraw a standing offer and refund its funds. The offeror may
    /// withdraw at any time; once the offer has expired, anyone may sweep
    /// it (admins included).
    pub fn cancel_offer(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.enter_settlement()?;
        let result = self.cancel_offer_inner(collab, asset, caller, now);
        self.exit_settlement();
        result
    }

    fn cancel_offer_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let offer = match self.listings.get(&asset) {
            Some(record) => match &record.mechanism {
                Mechanism::Offer(offer) => *offer,
                _ => return Err(MarketError::OfferNotFound(asset)),
            },
            None => return Err(MarketError::OfferNotFound(asset)),
        };
        if caller != offer.buyer && !offer.is_expired(now) && !self.roles.is_admin(caller) {
            return Err(MarketError::Unauthorized);
        }

        self.listings.remove(&asset);
        self.refund(&mut *collab.bank, &mut *collab.ledger, offer.buyer, offer.amount);
        self.events.push(MarketEvent::OfferCancelled {
            asset,
            buyer: offer.buyer,
            amount: offer.amount,
        });
        Ok(())
    }

    /// Accept a standing offer. Only the asset's current owner may accept,
    /// and only before the offer expires; custody moves to the offeror and
    /// the committed funds are distributed.
    pub fn accept_offer(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        now: DateTime<Utc>,
    ) -> Result<SaleId> {
        self.enter_settlement()?;
        let result = self.accept_offer_inner(collab, asset, caller, now);
        self.exit_settlement();
        result
    }

    fn accept_offer_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        now: DateTime<Utc>,
    ) -> Result<SaleId> {
        let offer = match self.listings.get(&asset) {
            Some(record) => match &record.mechanism {
                Mechanism::Offer(offer) => *offer,
                _ => return Err(MarketError::OfferNotFound(asset)),
            },
            None => return Err(MarketError::OfferNotFound(asset)),
        };
        if offer.is_expired(now) {
            return Err(MarketError::OfferExpired(asset));
        }
        if collab.registry.owner_of(asset) != Ok(caller) {
            return Err(MarketError::NotSeller(asset));
        }

        collab
            .registry
            .transfer(caller, offer.buyer, asset)
            .map_err(|_| MarketError::AssetTransferRejected(asset))?;
        self.listings.remove(&asset);
        Ok(self.finalize_sale(collab, asset, caller, offer.buyer, offer.amount))
    }

    /// Pre-authorize a fixed-price sale to one counterpart. Custody moves
    /// to the market immediately, so the designated buyer is guaranteed
    /// delivery on payment.
    pub fn create_private_sale(
        &mut self,
        registry: &mut dyn AssetRegistry,
        asset: AssetId,
        seller: Address,
        buyer: Address,
        amount: u128,
        expiration: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if amount == 0 {
            return Err(MarketError::ZeroPrice);
        }
        if expiration <= now {
            return Err(MarketError::ExpirationInPast);
        }
        if let Some(record) = self.listings.get(&asset) {
            match &record.mechanism {
                Mechanism::BuyPrice(_) if record.seller == seller && record.count == 1 => {}
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
        self.listings.insert(
            asset,
            ListingRecord {
                seller,
                count: 1,
                mechanism: Mechanism::PrivateSale(PrivateSale {
                    buyer,
                    amount,
                    expiration,
                }),
                in_escrow: true,
            },
        );
        self.events.push(MarketEvent::PrivateSaleCreated {
            asset,
            seller,
            buyer,
            amount,
            expiration,
        });
        tracing::info!(%asset, %seller, %buyer, amount, "private sale created");
        Ok(())
    }

    /// Complete a private sale. Only the designated buyer may pay, the
    /// attached value must match exactly, and the sale must not be expired.
    pub fn buy_private(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        attached: u128,
        now: DateTime<Utc>,
    ) -> Result<SaleId> {
        self.enter_settlement()?;
        let result = self.buy_private_inner(collab, asset, caller, attached, now);
        self.exit_settlement();
        result
    }

    fn buy_private_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        caller: Address,
        attached: u128,
        now: DateTime<Utc>,
    ) -> Result<SaleId> {
        let (seller, sale) = match self.listings.get(&asset) {
            Some(record) => match &record.mechanism {
                Mechanism::PrivateSale(ps) => (record.seller, *ps),
                _ => return Err(MarketError::PrivateSaleNotFound(asset)),
            },
            None => return Err(MarketError::PrivateSaleNotFound(asset)),
        };
        if caller != sale.buyer {
            return Err(MarketError::NotDesignatedBuyer);
        }
        if sale.is_expired(now) {
            return Err(MarketError::PrivateSaleExpired(asset));
        }
        if attached != sale.amount {
            return Err(MarketError::PaymentMismatch {
                expected: sale.amount,
                attached,
            });
        }

        collab
            .registry
            .transfer(self.address, caller, asset)
            .map_err(|_| MarketError::AssetTransferRejected(asset))?;
        self.listings.remove(&asset);
        Ok(self.finalize_sale(collab, asset, seller, caller, sale.amount))
    }

    /// Withdraw a private sale and return custody to the seller. Seller or
    /// admin at any time; anyone once the sale has expired.
    pub fn cancel_private_sale(
        &mut self,
        registry: &mut dyn AssetRegistry,
        asset: AssetId,
        caller: Address,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let (seller, sale) = match self.listings.get(&asset) {
            Some(record) => match &record.mechanism {
                Mechanism::PrivateSale(ps) => (record.seller, *ps),
                _ => return Err(MarketError::PrivateSaleNotFound(asset)),
            },
            None => return Err(MarketError::PrivateSaleNotFound(asset)),
        };
        if caller != seller && !sale.is_expired(now) && !self.roles.is_admin(caller) {
            return Err(MarketError::NotSeller(asset));
        }

        registry
            .transfer(self.address, seller, asset)
            .map_err(|_| MarketError::AssetTransferRejected(asset))?;
        self.listings.remove(&asset);
        self.events.push(MarketEvent::ListCancelled { asset, seller });
        Ok(())
    }
}
