//! Defensive numeric parsing.
//!
//! The backend serializes prices, quantities, and wei balances as strings.
//! Display code must never crash on a malformed field, so parse failures
//! fall back to zero.

use rust_decimal::Decimal;

/// Wei per whole GHOST token (18 decimals).
const WEI_PER_TOKEN: u32 = 18;

/// Parse a string-encoded decimal, falling back to zero on failure.
pub fn parse_decimal_or_zero(s: &str) -> Decimal {
    s.trim().parse().unwrap_or(Decimal::ZERO)
}

/// Convert a wei-encoded string balance to a whole-token value.
///
/// Returns zero when the string is not a valid integer.
pub fn wei_to_token(wei: &str) -> Decimal {
    let mut value = parse_decimal_or_zero(wei);
    value.set_scale(WEI_PER_TOKEN).unwrap_or_default();
    value.normalize()
}
