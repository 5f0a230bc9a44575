//! Fee and royalty model.
//!
//! All amounts are in the payment currency's smallest unit; all division is
//! integer floor division. The three buckets of a [`FeeBreakdown`] always
//! sum to the sale price exactly: the owner bucket is computed last by
//! subtraction, so rounding remainders flow toward the owner and neither
//! the treasury nor the creators are ever shorted by rounding.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_FEE_DIVISOR;
use crate::{Address, MarketError, Result};

/// Fee policy configuration held by the fee resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Recipient of the platform fee bucket.
    pub treasury: Address,
    /// Treasury fee is `price / treasury_fee_divisor` (default 20 = 5%).
    pub treasury_fee_divisor: u128,
    /// Secondary-sale royalty is `price / royalty_divisor` (default 10 = 10%).
    pub royalty_divisor: u128,
}

impl FeeConfig {
    /// Config with the default 5% treasury / 10% royalty policy.
    #[must_use]
    pub fn new(treasury: Address) -> Self {
        Self {
            treasury,
            treasury_fee_divisor: crate::constants::DEFAULT_TREASURY_FEE_DIVISOR,
            royalty_divisor: crate::constants::DEFAULT_ROYALTY_DIVISOR,
        }
    }

    /// Update both divisors, enforcing the maximum-fee bound.
    ///
    /// # Errors
    /// Returns [`MarketError::FeeDivisorTooLow`] if either divisor would
    /// allow a fee above the configured maximum percentage.
    pub fn set_divisors(&mut self, treasury_fee_divisor: u128, royalty_divisor: u128) -> Result<()> {
        if treasury_fee_divisor < MIN_FEE_DIVISOR || royalty_divisor < MIN_FEE_DIVISOR {
            return Err(MarketError::FeeDivisorTooLow {
                minimum: MIN_FEE_DIVISOR,
            });
        }
        self.treasury_fee_divisor = treasury_fee_divisor;
        self.royalty_divisor = royalty_divisor;
        Ok(())
    }
}

/// How one sale price splits across the three buckets.
///
/// Invariant: `treasury_fee + creator_revenue + owner_revenue == price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub treasury_fee: u128,
    pub creator_revenue: u128,
    pub owner_revenue: u128,
}

impl FeeBreakdown {
    /// Sum of all three buckets — must equal the sale price.
    #[must_use]
    pub fn total(&self) -> u128 {
        self.treasury_fee + self.creator_revenue + self.owner_revenue
    }
}

/// One flattened, leaf-level creator payout row.
///
/// Computed fresh on every resolution — never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorShare {
    pub recipient: Address,
    /// Share within the creator pool, normalized to basis points of 10000.
    pub relative_share_bp: u64,
    /// Share of the total sale price, in basis points of 10000.
    pub absolute_share_bp: u64,
    /// Exact amount this row receives (remainder absorption included).
    pub amount: u128,
}

/// Full output of fee resolution: the bucket breakdown plus the flattened
/// creator rows, creator-priority row first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeResolution {
    pub breakdown: FeeBreakdown,
    pub shares: Vec<CreatorShare>,
}
