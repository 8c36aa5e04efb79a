//! EVM block data structures.

use alloy::primitives::U64;
use serde::{Deserialize, Serialize};

/// Block header returned by `eth_getBlockByNumber` without full transaction objects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
	/// Block height
	pub number: U64,
	/// Block hash
	#[serde(default)]
	pub hash: Option<String>,
	/// Unix timestamp in seconds
	pub timestamp: U64,
	/// Hashes of the transactions included in the block
	#[serde(default)]
	pub transactions: Vec<String>,
}

impl Block {
	/// Get the block number
	pub fn number(&self) -> u64 {
		self.number.to::<u64>()
	}

	/// Get the block timestamp
	pub fn timestamp(&self) -> u64 {
		self.timestamp.to::<u64>()
	}
}
