//! Esplora REST API payloads used for Bitcoin address history.

use serde::{Deserialize, Serialize};

use crate::models::{AddressList, StandardTransaction};

/// Output spent by an input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraPrevout {
	/// Address of the spent output
	#[serde(default)]
	pub scriptpubkey_address: Option<String>,
	/// Amount in satoshi
	#[serde(default)]
	pub value: u64,
}

/// Transaction input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraTxInput {
	/// Spent output, absent for coinbase inputs
	#[serde(default)]
	pub prevout: Option<EsploraPrevout>,
}

/// Transaction output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraTxOutput {
	/// Receiving address, absent for non-standard scripts
	#[serde(default)]
	pub scriptpubkey_address: Option<String>,
	/// Amount in satoshi
	#[serde(default)]
	pub value: u64,
}

/// Confirmation status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraTxStatus {
	/// Whether the transaction is in a block
	pub confirmed: bool,
	/// Height of the including block
	#[serde(default)]
	pub block_height: Option<u64>,
	/// Time of the including block
	#[serde(default)]
	pub block_time: Option<u64>,
}

/// Transaction returned by `/tx/{txid}` and `/address/{address}/txs/chain`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraTransaction {
	/// Transaction id
	pub txid: String,
	/// Inputs
	#[serde(default)]
	pub vin: Vec<EsploraTxInput>,
	/// Outputs
	#[serde(default)]
	pub vout: Vec<EsploraTxOutput>,
	/// Confirmation status
	#[serde(default)]
	pub status: EsploraTxStatus,
}

impl EsploraTransaction {
	/// Addresses funding the transaction, in input order, without duplicates
	pub fn input_addresses(&self) -> Vec<String> {
		let mut addresses: Vec<String> = Vec::new();
		for address in self
			.vin
			.iter()
			.filter_map(|input| input.prevout.as_ref())
			.filter_map(|prevout| prevout.scriptpubkey_address.clone())
		{
			if !addresses.contains(&address) {
				addresses.push(address);
			}
		}
		addresses
	}

	/// Whether `address` funds at least one input
	pub fn is_spent_by(&self, address: &str) -> bool {
		self.vin
			.iter()
			.filter_map(|input| input.prevout.as_ref())
			.any(|prevout| prevout.scriptpubkey_address.as_deref() == Some(address))
	}

	/// Block height and time, None while unconfirmed
	pub fn position(&self) -> Option<(u64, u64)> {
		if !self.status.confirmed {
			return None;
		}
		Some((
			self.status.block_height?,
			self.status.block_time.unwrap_or_default(),
		))
	}

	/// Converts the transaction into the canonical form as seen from `sender`
	///
	/// `to` is the first output paying another address and `value` the total paid to other
	/// addresses. Change outputs back to `sender` are ignored.
	pub fn to_standard_from(&self, sender: &str) -> StandardTransaction {
		let external_outputs: Vec<&EsploraTxOutput> = self
			.vout
			.iter()
			.filter(|output| {
				output
					.scriptpubkey_address
					.as_deref()
					.is_some_and(|address| address != sender)
			})
			.collect();

		let to = external_outputs
			.first()
			.and_then(|output| output.scriptpubkey_address.clone());
		let value: u128 = external_outputs
			.iter()
			.map(|output| u128::from(output.value))
			.sum();
		let (block_number, timestamp) = self.position().unwrap_or_default();

		StandardTransaction::new(
			self.txid.clone(),
			AddressList::Many(self.input_addresses()),
			to,
			value.to_string(),
			block_number,
			timestamp,
		)
		.with_chain_specific(serde_json::to_value(self).unwrap_or_default())
	}
}
