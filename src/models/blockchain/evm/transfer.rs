//! Asset transfer records returned by `alchemy_getAssetTransfers`.

use alloy::primitives::{U256, U64};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::StandardTransaction;

/// Contract level details of a transfer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContract {
	/// Raw transferred amount in the smallest unit
	#[serde(default)]
	pub value: Option<U256>,
}

/// Optional metadata attached when `withMetadata` is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMetadata {
	/// RFC 3339 timestamp of the including block
	pub block_timestamp: String,
}

/// One external transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransfer {
	/// Block height
	pub block_num: U64,
	/// Transaction hash
	pub hash: String,
	/// Sender address
	pub from: String,
	/// Recipient address
	#[serde(default)]
	pub to: Option<String>,
	/// Raw contract details
	#[serde(default)]
	pub raw_contract: RawContract,
	/// Block metadata
	#[serde(default)]
	pub metadata: Option<TransferMetadata>,
}

impl AssetTransfer {
	/// Block height of the transfer
	pub fn block_number(&self) -> u64 {
		self.block_num.to::<u64>()
	}

	/// Unix timestamp of the transfer, 0 when metadata is missing or unparsable
	pub fn timestamp(&self) -> u64 {
		self.metadata
			.as_ref()
			.and_then(|m| DateTime::parse_from_rfc3339(&m.block_timestamp).ok())
			.map(|t| t.timestamp().max(0) as u64)
			.unwrap_or_default()
	}

	/// Converts the transfer into its canonical form
	pub fn to_standard(&self) -> StandardTransaction {
		StandardTransaction::new(
			self.hash.clone(),
			self.from.clone(),
			self.to.clone(),
			self.raw_contract.value.unwrap_or_default().to_string(),
			self.block_number(),
			self.timestamp(),
		)
		.with_chain_specific(serde_json::to_value(self).unwrap_or_default())
	}
}

/// One page of `alchemy_getAssetTransfers` results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransfersPage {
	/// Transfers in the requested order
	#[serde(default)]
	pub transfers: Vec<AssetTransfer>,
	/// Cursor for the next page, absent on the last page
	#[serde(default)]
	pub page_key: Option<String>,
}
