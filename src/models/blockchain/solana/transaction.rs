//! Solana transaction structures and their normalization.
//!
//! A transaction is reduced to a transfer: the signers are the senders, the recipient is the
//! first non-signer account whose lamport balance increased and the value is that increase.

use serde::{Deserialize, Serialize};

use crate::models::{AddressList, StandardTransaction};

/// Message header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeader {
	/// Number of leading account keys that signed the transaction
	pub num_required_signatures: usize,
}

/// Transaction message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
	/// Static account keys
	#[serde(default)]
	pub account_keys: Vec<String>,
	/// Signature requirements
	#[serde(default)]
	pub header: MessageHeader,
}

/// Signed transaction envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
	/// Signatures, the first one identifies the transaction
	#[serde(default)]
	pub signatures: Vec<String>,
	/// Message
	#[serde(default)]
	pub message: Message,
}

/// Accounts loaded through address lookup tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedAddresses {
	#[serde(default)]
	pub writable: Vec<String>,
	#[serde(default)]
	pub readonly: Vec<String>,
}

/// Execution metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
	/// Lamport balances before execution, indexed like the account keys
	#[serde(default)]
	pub pre_balances: Vec<u64>,
	/// Lamport balances after execution
	#[serde(default)]
	pub post_balances: Vec<u64>,
	/// Accounts appended after the static keys
	#[serde(default)]
	pub loaded_addresses: Option<LoadedAddresses>,
}

/// Transaction entry of a block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Signed envelope
	pub transaction: Envelope,
	/// Execution metadata, absent when the node pruned it
	#[serde(default)]
	pub meta: Option<Meta>,
}

/// Transaction returned by `getTransaction`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransaction {
	/// Slot of the including block
	pub slot: u64,
	/// Estimated production time, unix seconds
	#[serde(default)]
	pub block_time: Option<i64>,
	/// Signed envelope
	pub transaction: Envelope,
	/// Execution metadata
	#[serde(default)]
	pub meta: Option<Meta>,
}

impl ConfirmedTransaction {
	/// Production time, 0 when unknown
	pub fn timestamp(&self) -> u64 {
		self.block_time.unwrap_or_default().max(0) as u64
	}

	/// Converts the transaction into its canonical form
	pub fn to_standard(&self) -> Option<StandardTransaction> {
		self.as_block_transaction()
			.to_standard(self.slot, self.timestamp())
	}

	/// Whether `address` signed the transaction
	pub fn is_signed_by(&self, address: &str) -> bool {
		self.as_block_transaction().is_signed_by(address)
	}

	fn as_block_transaction(&self) -> Transaction {
		Transaction {
			transaction: self.transaction.clone(),
			meta: self.meta.clone(),
		}
	}
}

impl Transaction {
	/// Transaction signature
	pub fn signature(&self) -> Option<&str> {
		self.transaction.signatures.first().map(String::as_str)
	}

	/// Accounts that signed the transaction
	pub fn signers(&self) -> Vec<String> {
		let message = &self.transaction.message;
		message
			.account_keys
			.iter()
			.take(message.header.num_required_signatures)
			.cloned()
			.collect()
	}

	/// Static keys followed by lookup table writable then readonly accounts
	pub fn account_keys(&self) -> Vec<String> {
		let mut keys = self.transaction.message.account_keys.clone();
		if let Some(loaded) = self.meta.as_ref().and_then(|m| m.loaded_addresses.as_ref()) {
			keys.extend(loaded.writable.iter().cloned());
			keys.extend(loaded.readonly.iter().cloned());
		}
		keys
	}

	/// Whether `address` signed the transaction
	pub fn is_signed_by(&self, address: &str) -> bool {
		self.signers().iter().any(|signer| signer == address)
	}

	/// Converts the transaction into its canonical form
	///
	/// # Arguments
	/// * `slot` - Slot of the including block
	/// * `timestamp` - Production time of the including block
	///
	/// # Returns
	/// * `Option<StandardTransaction>` - None when the signature or metadata is missing
	pub fn to_standard(&self, slot: u64, timestamp: u64) -> Option<StandardTransaction> {
		let hash = self.signature()?.to_string();
		let meta = self.meta.as_ref()?;
		let signers = self.signers();

		let recipient = self
			.account_keys()
			.into_iter()
			.enumerate()
			.filter(|(_, key)| !signers.contains(key))
			.find_map(|(index, key)| {
				let pre = meta.pre_balances.get(index).copied().unwrap_or_default();
				let post = meta.post_balances.get(index).copied().unwrap_or_default();
				(post > pre).then(|| (key, post - pre))
			});

		let (to, value) = match recipient {
			Some((key, delta)) => (Some(key), delta.to_string()),
			None => (None, "0".to_string()),
		};

		Some(
			StandardTransaction::new(
				hash,
				AddressList::Many(signers),
				to,
				value,
				slot,
				timestamp,
			)
			.with_chain_specific(serde_json::to_value(self).unwrap_or_default()),
		)
	}
}
