//! The market core: listing table, event buffer, settlement plumbing, and
//! the buy-price mechanism. Auction and offer/private-sale operations live
//! in their own modules as further `impl Marketplace` blocks.

use std::collections::HashMap;

use gavel_payout::{FeeEngine, PayOutcome, pay};
use gavel_types::constants::SEND_BUDGET_SINGLE;
use gavel_types::{
    Address, AssetId, AssetRegistry, BuyPrice, Collaborators, EscrowLedger, FeeConfig,
    ListingRecord, MarketError, MarketEvent, Mechanism, Result, SaleId, SendBudget, ValueBank,
};
use serde::{Deserialize, Serialize};

use crate::roles::{Role, RoleTable};

/// The sale-state machine for one market instance.
///
/// Holds the per-asset listing table, the buffered audit-event stream, and
/// the monotonic sale sequence that makes finalized [`SaleId`]s
/// deterministic. All value movement goes through the payout engine's
/// escrow-fallback sender, so no operation can fail on an undeliverable
/// recipient.
#[derive(Debug, Serialize, Deserialize)]
pub struct Marketplace {
    /// Custody address for escrowed assets (auctions, private sales).
    pub(crate) address: Address,
    pub(crate) fees: FeeEngine,
    pub(crate) roles: RoleTable,
    pub(crate) listings: HashMap<AssetId, ListingRecord>,
    /// Buffered events, drained by the host via [`Marketplace::take_events`].
    pub(crate) events: Vec<MarketEvent>,
    /// Monotonic counter of finalized sales; feeds deterministic sale ids.
    pub(crate) sale_seq: u64,
    /// Reentrancy flag held across every payout-performing entry point.
    pub(crate) settling: bool,
}

impl Marketplace {
    #[must_use]
    pub fn new(market_address: Address, fee_config: FeeConfig, admin: Address) -> Self {
        Self {
            address: market_address,
            fees: FeeEngine::new(fee_config),
            roles: RoleTable::new(admin),
            listings: HashMap::new(),
            events: Vec::new(),
            sale_seq: 0,
            settling: false,
        }
    }

    /// The market's own custody address.
    #[must_use]
    pub fn market_address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn fees(&self) -> &FeeEngine {
        &self.fees
    }

    /// Current listing record for an asset, if any mechanism is live.
    #[must_use]
    pub fn listing(&self, asset: AssetId) -> Option<&ListingRecord> {
        self.listings.get(&asset)
    }

    /// Number of finalized sales so far.
    #[must_use]
    pub fn sales_finalized(&self) -> u64 {
        self.sale_seq
    }

    #[must_use]
    pub fn is_admin(&self, who: Address) -> bool {
        self.roles.is_admin(who)
    }

    /// Buffered events since the last drain.
    #[must_use]
    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    /// Drain the buffered event stream.
    pub fn take_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    // =====================================================================
    // Role-gated admin surface
    // =====================================================================

    pub fn grant_admin(&mut self, caller: Address, who: Address) -> Result<()> {
        self.roles.grant(caller, who, Role::Admin)
    }

    pub fn revoke_admin(&mut self, caller: Address, who: Address) -> Result<()> {
        self.roles.revoke(caller, who)
    }

    /// Repoint the treasury-fee recipient.
    pub fn set_treasury(&mut self, caller: Address, treasury: Address) -> Result<()> {
        if !self.roles.is_admin(caller) {
            return Err(MarketError::Unauthorized);
        }
        self.fees.config_mut().treasury = treasury;
        tracing::info!(%treasury, "treasury repointed");
        Ok(())
    }

    /// Adjust fee divisors. Divisors are bounded below, which bounds the
    /// fee percentages above.
    pub fn set_fee_divisors(
        &mut self,
        caller: Address,
        treasury_fee_divisor: u128,
        royalty_divisor: u128,
    ) -> Result<()> {
        if !self.roles.is_admin(caller) {
            return Err(MarketError::Unauthorized);
        }
        self.fees
            .config_mut()
            .set_divisors(treasury_fee_divisor, royalty_divisor)?;
        tracing::info!(treasury_fee_divisor, royalty_divisor, "fee divisors updated");
        Ok(())
    }

    // =====================================================================
    // Settlement plumbing (shared by all mechanisms)
    // =====================================================================

    /// Take the settlement guard. Held for the whole of every
    /// payout-performing entry point.
    pub(crate) fn enter_settlement(&mut self) -> Result<()> {
        if self.settling {
            return Err(MarketError::ReentrantSettlement);
        }
        self.settling = true;
        Ok(())
    }

    pub(crate) fn exit_settlement(&mut self) {
        self.settling = false;
    }

    /// Refund committed funds (superseded bid, withdrawn offer) to one
    /// recipient, escrow-crediting on failure.
    pub(crate) fn refund(
        &mut self,
        bank: &mut dyn ValueBank,
        ledger: &mut dyn EscrowLedger,
        recipient: Address,
        amount: u128,
    ) {
        let outcome = pay(bank, ledger, recipient, amount, SendBudget(SEND_BUDGET_SINGLE));
        if outcome == PayOutcome::Escrowed {
            self.events
                .push(MarketEvent::WithdrawalToEscrow { recipient, amount });
        }
    }

    /// Distribute sale proceeds, mint the deterministic sale id, and emit
    /// the settlement events. Callers have already moved asset custody and
    /// completed all listing-table mutations.
    pub(crate) fn finalize_sale(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        seller: Address,
        buyer: Address,
        price: u128,
    ) -> SaleId {
        let receipt = self.fees.distribute(collab, asset, price, seller);
        let sale = SaleId::deterministic(asset, self.sale_seq);
        self.sale_seq += 1;

        let breakdown = &receipt.resolution.breakdown;
        self.events.push(MarketEvent::ItemSold {
            asset,
            sale,
            seller,
            buyer,
            price,
            treasury_fee: breakdown.treasury_fee,
            creator_revenue: breakdown.creator_revenue,
            owner_revenue: breakdown.owner_revenue,
        });
        for &(recipient, amount) in &receipt.escrowed {
            self.events
                .push(MarketEvent::WithdrawalToEscrow { recipient, amount });
        }

        tracing::info!(%asset, %sale, %seller, %buyer, price, "sale finalized");
        sale
    }

    // =====================================================================
    // Buy-price mechanism
    // =====================================================================

    /// List an asset at a fixed price, `count` editions deep. Re-listing an
    /// asset that already carries a buy price re-prices it; any other live
    /// mechanism is a conflict.
    pub fn set_buy_price(
        &mut self,
        registry: &dyn AssetRegistry,
        asset: AssetId,
        seller: Address,
        price: u128,
        count: u32,
    ) -> Result<()> {
        if price == 0 {
            return Err(MarketError::ZeroPrice);
        }
        if count == 0 {
            return Err(MarketError::ZeroCount);
        }
        if let Some(record) = self.listings.get(&asset) {
            if !matches!(record.mechanism, Mechanism::BuyPrice(_)) {
                return Err(MarketError::ListingConflict {
                    asset,
                    reason: format!("asset is held by a live {}", record.mechanism.name()),
                });
            }
        }
        if registry.owner_of(asset) != Ok(seller) {
            return Err(MarketError::NotSeller(asset));
        }

        self.listings.insert(
            asset,
            ListingRecord {
                seller,
                count,
                mechanism: Mechanism::BuyPrice(BuyPrice { price }),
                in_escrow: false,
            },
        );
        self.events.push(MarketEvent::ItemCreated {
            asset,
            seller,
            price,
            count,
        });
        tracing::info!(%asset, %seller, price, count, "buy price set");
        Ok(())
    }

    /// Withdraw a buy-price listing. Seller or admin only.
    pub fn cancel_buy_price(&mut self, asset: AssetId, caller: Address) -> Result<()> {
        let record = self
            .listings
            .get(&asset)
            .ok_or(MarketError::NoActiveListing(asset))?;
        if !matches!(record.mechanism, Mechanism::BuyPrice(_)) {
            return Err(MarketError::NoActiveListing(asset));
        }
        let seller = record.seller;
        if caller != seller && !self.roles.is_admin(caller) {
            return Err(MarketError::NotSeller(asset));
        }

        self.listings.remove(&asset);
        self.events.push(MarketEvent::ListCancelled { asset, seller });
        Ok(())
    }

    /// Execute a buy-price sale. The attached value must match the listed
    /// price exactly; custody of one edition moves seller to buyer before
    /// any payout. A multi-edition listing stays live with a decremented
    /// count until the last edition sells.
    pub fn buy(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        buyer: Address,
        attached: u128,
    ) -> Result<SaleId> {
        self.enter_settlement()?;
        let result = self.buy_inner(collab, asset, buyer, attached);
        self.exit_settlement();
        result
    }

    fn buy_inner(
        &mut self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        buyer: Address,
        attached: u128,
    ) -> Result<SaleId> {
        let (seller, price, count) = match self.listings.get(&asset) {
            Some(record) => match &record.mechanism {
                Mechanism::BuyPrice(bp) => (record.seller, bp.price, record.count),
                other => {
                    return Err(MarketError::ListingConflict {
                        asset,
                        reason: format!("asset is held by a live {}", other.name()),
                    });
                }
            },
            None => return Err(MarketError::NoActiveListing(asset)),
        };
        if attached != price {
            return Err(MarketError::PaymentMismatch {
                expected: price,
                attached,
            });
        }

        collab
            .registry
            .transfer(seller, buyer, asset)
            .map_err(|_| MarketError::AssetTransferRejected(asset))?;

        // Listing-table effects complete before the payout fan-out.
        if count <= 1 {
            self.listings.remove(&asset);
        } else if let Some(record) = self.listings.get_mut(&asset) {
            record.count = count - 1;
        }

        Ok(self.finalize_sale(collab, asset, seller, buyer, price))
    }
}
