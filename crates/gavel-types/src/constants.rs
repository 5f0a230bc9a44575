//! System-wide constants for the Gavel settlement engine.

/// Basis-point denominator: shares are expressed in units of 1/10000.
pub const BASIS_POINTS: u64 = 10_000;

/// Default treasury fee divisor: `price / 20` = 5%.
pub const DEFAULT_TREASURY_FEE_DIVISOR: u128 = 20;

/// Default creator royalty divisor on secondary sales: `price / 10` = 10%.
pub const DEFAULT_ROYALTY_DIVISOR: u128 = 10;

/// Smallest divisor either fee may be configured to (caps each fee at 25%).
pub const MIN_FEE_DIVISOR: u128 = 4;

/// Send budget for a lone disbursement (treasury, owner, bid refund).
pub const SEND_BUDGET_SINGLE: u64 = 20_000;

/// Send budget reserved for multi-recipient creator fan-out, so one
/// misbehaving recipient cannot starve the others.
pub const SEND_BUDGET_FANOUT: u64 = 210_000;

/// Maximum recursion depth when flattening nested percent-split recipients.
/// Deeper nesting is treated as a plain address.
pub const MAX_SPLIT_DEPTH: usize = 4;

/// Maximum entries accepted from one royalty or split recipient list.
/// Longer lists are treated as malformed (absent info / not a split).
pub const MAX_ROYALTY_RECIPIENTS: usize = 50;

/// Minimum reserve-auction duration in seconds (15 minutes).
pub const MIN_AUCTION_DURATION_SECS: i64 = 15 * 60;

/// Maximum reserve-auction duration in seconds (30 days).
pub const MAX_AUCTION_DURATION_SECS: i64 = 30 * 24 * 60 * 60;

/// Decimal places of the payment currency's smallest unit (display only).
pub const PAYMENT_DECIMALS: u32 = 18;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Gavel";
