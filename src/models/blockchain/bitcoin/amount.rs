//! BTC amount conversion.

use rust_decimal::{prelude::ToPrimitive, Decimal};
use std::str::FromStr;

const SATS_PER_BTC: i64 = 100_000_000;

/// Converts a BTC amount, as printed by Bitcoin Core, into a satoshi decimal string
///
/// # Arguments
/// * `btc` - Amount in BTC, e.g. `0.00012`
///
/// # Returns
/// * `Option<String>` - Integer satoshi amount, None for negative or unparsable input
pub fn btc_to_sats(btc: &serde_json::Number) -> Option<String> {
	let raw = btc.to_string();
	let amount = Decimal::from_str(&raw)
		.or_else(|_| Decimal::from_scientific(&raw))
		.ok()?;
	if amount.is_sign_negative() {
		return None;
	}
	let sats = (amount * Decimal::from(SATS_PER_BTC)).round();
	sats.to_u64().map(|s| s.to_string())
}
