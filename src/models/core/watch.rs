use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Chain, StandardTransaction};

/// A transaction that involved a watched address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchMatch {
	pub chain: Chain,
	pub transaction: StandardTransaction,
	pub matched_address: String,
}

impl fmt::Display for WatchMatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[{}] MATCH for {}: {} - {} -> {} ({})",
			self.chain,
			self.matched_address,
			self.transaction.hash,
			self.transaction.from,
			self.transaction.to.as_deref().unwrap_or("null"),
			self.transaction.value
		)
	}
}
