//! Fee resolution and distribution.
//!
//! `resolve_fees` is a pure function of current collaborator state: calling
//! it twice with unchanged state yields identical output, and it never
//! fails — every collaborator error is absorbed as absent information,
//! because resolution also runs in read-only preview contexts where
//! aborting is unacceptable.
//!
//! Fee policy (all integer math, fixed divisors):
//! 1. Treasury fee is `price / treasury_fee_divisor`, waived entirely when
//!    the seller holds a qualifying membership asset.
//! 2. No creator recipients: the owner takes `price - treasury_fee`.
//! 3. Seller is the creator (or the sole recipient is the seller): the
//!    creator pool takes `price - treasury_fee`, the owner takes zero.
//! 4. Secondary sale: the creator pool takes `price / royalty_divisor` and
//!    the owner takes the subtraction remainder, so rounding always favors
//!    owner over creator over treasury.

use gavel_types::constants::{BASIS_POINTS, SEND_BUDGET_FANOUT, SEND_BUDGET_SINGLE};
use gavel_types::{
    Address, AssetId, AssetRegistry, Collaborators, CreatorShare, FeeBreakdown, FeeConfig,
    FeeResolution, RoyaltyDirectory, SendBudget, SplitProbe,
};
use serde::{Deserialize, Serialize};

use crate::flatten::flatten_recipients;
use crate::sender::{PayOutcome, pay};

/// Floor of `value * numerator / denominator`, overflow-safe near
/// `u128::MAX`: when the product does not fit in a `u128`, the division runs
/// first with a remainder correction. The correction is exact whenever
/// `remainder * numerator` fits, and short by at most one unit otherwise.
fn mul_div_floor(value: u128, numerator: u128, denominator: u128) -> u128 {
    debug_assert!(denominator > 0);
    if let Some(product) = value.checked_mul(numerator) {
        return product / denominator;
    }
    // Only reachable for value > u128::MAX / numerator, which forces
    // numerator <= denominator at both call sites.
    debug_assert!(numerator <= denominator);
    let whole = value / denominator * numerator;
    let remainder = value % denominator;
    match remainder.checked_mul(numerator) {
        Some(product) => whole + product / denominator,
        None => whole + remainder / (denominator / numerator),
    }
}

/// Outcome of one `distribute` call: the resolution that was paid out plus
/// every payout that had to fall back to the escrow ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReceipt {
    pub resolution: FeeResolution,
    /// `(recipient, amount)` pairs credited to escrow instead of delivered.
    pub escrowed: Vec<(Address, u128)>,
}

/// The fee/royalty resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEngine {
    config: FeeConfig,
}

impl FeeEngine {
    #[must_use]
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &FeeConfig {
        &self.config
    }

    /// Mutable access for the market's role-gated admin surface.
    pub fn config_mut(&mut self) -> &mut FeeConfig {
        &mut self.config
    }

    /// Resolve how `price` splits across treasury, creators, and owner.
    ///
    /// The returned share rows carry the exact amounts `distribute` would
    /// pay, remainder absorption included: with more than one row the last
    /// row receives `creator_revenue - already_assigned`; a single row
    /// receives the full creator revenue. The row belonging to the resolved
    /// token creator (falling back to the seller) is moved to index 0 — a
    /// display-priority convention that never changes any amount. Remainder
    /// absorption keys off iteration order after that move: the dust lands
    /// on whichever row ends up last, never on the prioritized creator row
    /// unless it is the only one.
    #[must_use]
    pub fn resolve_fees(
        &self,
        royalties: &dyn RoyaltyDirectory,
        splits: &dyn SplitProbe,
        membership: Option<&dyn AssetRegistry>,
        asset: AssetId,
        price: u128,
        seller: Address,
    ) -> FeeResolution {
        if price == 0 {
            return FeeResolution {
                breakdown: FeeBreakdown {
                    treasury_fee: 0,
                    creator_revenue: 0,
                    owner_revenue: 0,
                },
                shares: Vec::new(),
            };
        }

        // Membership carve-out: qualifying sellers pay no treasury fee.
        let is_member = membership.is_some_and(|m| m.balance_of(seller) > 0);
        let treasury_fee = if is_member {
            0
        } else {
            price / self.config.treasury_fee_divisor
        };

        // Untrusted reads: failure means absence, never an error.
        let (recipients, shares_bp) = royalties.creator_payment_info(asset).unwrap_or_default();
        let token_creator = royalties.token_creator(asset).ok();

        let mut leaves = flatten_recipients(splits, &recipients, &shares_bp);

        let (creator_revenue, owner_revenue) = if leaves.is_empty() {
            (0, price - treasury_fee)
        } else if token_creator == Some(seller)
            || (recipients.len() == 1 && recipients[0] == seller)
        {
            // Primary / self-sale: full pass-through to the creator pool.
            (price - treasury_fee, 0)
        } else {
            let royalty = price / self.config.royalty_divisor;
            (royalty, price - treasury_fee - royalty)
        };

        // Creator-priority reorder (stable, amount-invariant).
        let priority = token_creator.unwrap_or(seller);
        if let Some(pos) = leaves.iter().position(|l| l.recipient == priority) {
            let row = leaves.remove(pos);
            leaves.insert(0, row);
        }

        let mut shares = Vec::with_capacity(leaves.len());
        let mut assigned: u128 = 0;
        for (i, leaf) in leaves.iter().enumerate() {
            let amount = if i + 1 == leaves.len() {
                creator_revenue - assigned
            } else {
                mul_div_floor(
                    creator_revenue,
                    u128::from(leaf.share_bp),
                    u128::from(BASIS_POINTS),
                )
            };
            assigned += amount;
            #[allow(clippy::cast_possible_truncation)] // amount <= price
            let absolute_share_bp = mul_div_floor(amount, u128::from(BASIS_POINTS), price) as u64;
            shares.push(CreatorShare {
                recipient: leaf.recipient,
                relative_share_bp: leaf.share_bp,
                absolute_share_bp,
                amount,
            });
        }

        FeeResolution {
            breakdown: FeeBreakdown {
                treasury_fee,
                creator_revenue,
                owner_revenue,
            },
            shares,
        }
    }

    /// Resolve and pay out: one payout for the treasury, one per flattened
    /// creator row, one for the owner. Value leaves the market's controlled
    /// balance by exactly `price`.
    pub fn distribute(
        &self,
        collab: &mut Collaborators<'_>,
        asset: AssetId,
        price: u128,
        seller: Address,
    ) -> DistributionReceipt {
        let resolution = self.resolve_fees(
            collab.royalties,
            collab.splits,
            collab.membership,
            asset,
            price,
            seller,
        );
        debug_assert_eq!(resolution.breakdown.total(), price);

        let mut escrowed = Vec::new();
        let mut settle = |bank: &mut dyn gavel_types::ValueBank,
                          ledger: &mut dyn gavel_types::EscrowLedger,
                          to: Address,
                          amount: u128,
                          budget: u64| {
            if pay(bank, ledger, to, amount, SendBudget(budget)) == PayOutcome::Escrowed {
                escrowed.push((to, amount));
            }
        };

        settle(
            &mut *collab.bank,
            &mut *collab.ledger,
            self.config.treasury,
            resolution.breakdown.treasury_fee,
            SEND_BUDGET_SINGLE,
        );
        for share in &resolution.shares {
            settle(
                &mut *collab.bank,
                &mut *collab.ledger,
                share.recipient,
                share.amount,
                SEND_BUDGET_FANOUT,
            );
        }
        settle(
            &mut *collab.bank,
            &mut *collab.ledger,
            seller,
            resolution.breakdown.owner_revenue,
            SEND_BUDGET_SINGLE,
        );

        tracing::info!(
            %asset,
            price,
            treasury_fee = resolution.breakdown.treasury_fee,
            creator_revenue = resolution.breakdown.creator_revenue,
            owner_revenue = resolution.breakdown.owner_revenue,
            escrowed = escrowed.len(),
            "sale proceeds distributed"
        );

        DistributionReceipt {
            resolution,
            escrowed,
        }
    }
}
