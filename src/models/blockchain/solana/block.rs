//! Solana block and signature listing structures.

use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Block returned by `getBlock` with `json` encoding and full transaction details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
	/// Hash of the block
	#[serde(default)]
	pub blockhash: String,
	/// Estimated production time, unix seconds
	#[serde(default)]
	pub block_time: Option<i64>,
	/// Transactions in block order
	#[serde(default)]
	pub transactions: Vec<Transaction>,
}

/// Entry returned by `getSignaturesForAddress`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
	/// Transaction signature
	pub signature: String,
	/// Slot of the including block
	pub slot: u64,
	/// Estimated production time, unix seconds
	#[serde(default)]
	pub block_time: Option<i64>,
}

impl SignatureInfo {
	/// Production time, 0 when unknown
	pub fn timestamp(&self) -> u64 {
		self.block_time.unwrap_or_default().max(0) as u64
	}
}
