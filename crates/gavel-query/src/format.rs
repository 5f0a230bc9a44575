//! Display helpers for amounts and time deltas.

use chrono::Duration;
use gavel_types::constants::PAYMENT_DECIMALS;

/// Render a smallest-unit amount in whole payment-currency units, trailing
/// zeros trimmed (`1500000000000000000` with 18 decimals renders as `1.5`).
#[must_use]
pub fn format_amount(amount: u128, decimals: u32) -> String {
    let unit = 10u128.pow(decimals);
    let whole = amount / unit;
    let frac = amount % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let mut frac = format!("{frac:0width$}", width = decimals as usize);
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("{whole}.{frac}")
}

/// `format_amount` at the payment currency's native precision.
#[must_use]
pub fn format_payment(amount: u128) -> String {
    format_amount(amount, PAYMENT_DECIMALS)
}

/// Render a duration as its two most significant units (`2d 4h`, `3h 5m`,
/// `45s`). Non-positive durations render as `now`.
#[must_use]
pub fn format_time_delta(delta: Duration) -> String {
    let total = delta.num_seconds();
    if total <= 0 {
        return "now".to_string();
    }
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
