//! Canonical chain-agnostic transaction representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One or many sender addresses
///
/// Account based chains have a single sender, UTXO and multi-signer chains may have several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressList {
	Single(String),
	Many(Vec<String>),
}

impl AddressList {
	/// Returns the addresses as a flat list of string slices
	pub fn as_vec(&self) -> Vec<&str> {
		match self {
			AddressList::Single(address) => vec![address.as_str()],
			AddressList::Many(addresses) => addresses.iter().map(String::as_str).collect(),
		}
	}

	/// Case-insensitive membership test
	pub fn contains(&self, address: &str) -> bool {
		self.as_vec()
			.iter()
			.any(|candidate| candidate.eq_ignore_ascii_case(address))
	}
}

impl Default for AddressList {
	fn default() -> Self {
		AddressList::Many(Vec::new())
	}
}

impl From<String> for AddressList {
	fn from(address: String) -> Self {
		AddressList::Single(address)
	}
}

impl From<&str> for AddressList {
	fn from(address: &str) -> Self {
		AddressList::Single(address.to_string())
	}
}

impl From<Vec<String>> for AddressList {
	fn from(addresses: Vec<String>) -> Self {
		AddressList::Many(addresses)
	}
}

impl fmt::Display for AddressList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.as_vec().join(","))
	}
}

/// Standardized transaction that works across all chains
///
/// Produced by chain providers and history fetchers. `value` is always a decimal string holding a
/// non-negative integer in the chain's smallest unit (wei, satoshi, lamport).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardTransaction {
	/// Chain-native transaction identifier
	pub hash: String,
	/// Sender address(es)
	pub from: AddressList,
	/// Receiving counterparty, if any
	pub to: Option<String>,
	/// Amount in the smallest unit of the chain
	pub value: String,
	/// Block height or slot
	pub block_number: u64,
	/// Unix timestamp in seconds
	pub timestamp: u64,
	/// Raw upstream payload, kept for diagnostics only
	#[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
	pub chain_specific: serde_json::Value,
}

impl StandardTransaction {
	/// Creates a transaction without any chain specific payload
	pub fn new(
		hash: impl Into<String>,
		from: impl Into<AddressList>,
		to: Option<String>,
		value: impl Into<String>,
		block_number: u64,
		timestamp: u64,
	) -> Self {
		Self {
			hash: hash.into(),
			from: from.into(),
			to,
			value: value.into(),
			block_number,
			timestamp,
			chain_specific: serde_json::Value::Null,
		}
	}

	/// Attaches the raw upstream payload
	pub fn with_chain_specific(mut self, chain_specific: serde_json::Value) -> Self {
		self.chain_specific = chain_specific;
		self
	}

	/// Every address involved in the transaction, senders first, empty values discarded
	pub fn involved_addresses(&self) -> Vec<&str> {
		self.from
			.as_vec()
			.into_iter()
			.chain(self.to.as_deref())
			.filter(|address| !address.is_empty())
			.collect()
	}

	/// Whether the given address appears among the senders
	pub fn is_sent_by(&self, address: &str) -> bool {
		self.from.contains(address)
	}
}

/// Returns true if `value` is a decimal string of a non-negative integer
pub fn is_integer_amount(value: &str) -> bool {
	!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
