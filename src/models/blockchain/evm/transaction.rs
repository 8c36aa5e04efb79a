//! EVM transaction data structures.

use alloy::primitives::{U256, U64};
use serde::{Deserialize, Serialize};

use crate::models::StandardTransaction;

/// Transaction object returned by `eth_getTransactionByHash`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	/// Transaction hash
	pub hash: String,
	/// Sender address
	pub from: String,
	/// Recipient address (None for contract creation)
	#[serde(default)]
	pub to: Option<String>,
	/// Transferred amount in wei
	pub value: U256,
	/// Block height, None while pending
	#[serde(default)]
	pub block_number: Option<U64>,
}

impl Transaction {
	/// Get the block number, or 0 for pending transactions
	pub fn block_number(&self) -> u64 {
		self.block_number.map(|n| n.to::<u64>()).unwrap_or_default()
	}

	/// Converts the transaction into its canonical form
	///
	/// # Arguments
	/// * `timestamp` - Timestamp of the including block
	pub fn to_standard(&self, timestamp: u64) -> StandardTransaction {
		StandardTransaction::new(
			self.hash.clone(),
			self.from.clone(),
			self.to.clone(),
			self.value.to_string(),
			self.block_number(),
			timestamp,
		)
		.with_chain_specific(serde_json::to_value(self).unwrap_or_default())
	}
}
