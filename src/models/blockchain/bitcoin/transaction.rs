//! Bitcoin transaction data structures.

use serde::{Deserialize, Serialize};

use super::btc_to_sats;
use crate::models::{AddressList, StandardTransaction};

/// Output script details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPubKey {
	/// Decoded address, absent for non-standard scripts
	#[serde(default)]
	pub address: Option<String>,
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
	/// Amount in BTC
	pub value: serde_json::Number,
	/// Output index
	#[serde(default)]
	pub n: u32,
	/// Locking script
	#[serde(default)]
	pub script_pub_key: ScriptPubKey,
}

/// Transaction input
///
/// `prevout` is only populated with `getrawtransaction <txid> 2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
	/// Spent transaction id, absent for coinbase inputs
	#[serde(default)]
	pub txid: Option<String>,
	/// Coinbase script, present only on coinbase inputs
	#[serde(default)]
	pub coinbase: Option<String>,
	/// The output being spent
	#[serde(default)]
	pub prevout: Option<TxPrevout>,
}

/// Output spent by an input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxPrevout {
	/// Locking script of the spent output
	#[serde(default)]
	pub script_pub_key: ScriptPubKey,
}

/// Verbose transaction returned by `getrawtransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Transaction id
	pub txid: String,
	/// Inputs
	#[serde(default)]
	pub vin: Vec<TxInput>,
	/// Outputs
	#[serde(default)]
	pub vout: Vec<TxOutput>,
}

impl Transaction {
	/// Addresses funding the transaction
	pub fn input_addresses(&self) -> Vec<String> {
		self.vin
			.iter()
			.filter_map(|input| input.prevout.as_ref())
			.filter_map(|prevout| prevout.script_pub_key.address.clone())
			.collect()
	}

	/// Converts the transaction into its canonical form
	///
	/// `to` is the first output address and `value` the amount of that output.
	pub fn to_standard(&self, block_number: u64, timestamp: u64) -> StandardTransaction {
		let first_output = self.vout.first();
		let to = first_output.and_then(|output| output.script_pub_key.address.clone());
		let value = first_output
			.and_then(|output| btc_to_sats(&output.value))
			.unwrap_or_else(|| "0".to_string());

		StandardTransaction::new(
			self.txid.clone(),
			AddressList::Many(self.input_addresses()),
			to,
			value,
			block_number,
			timestamp,
		)
		.with_chain_specific(serde_json::to_value(self).unwrap_or_default())
	}
}

/// Placeholder for a transaction whose details could not be fetched
pub fn degraded_transaction(txid: &str, block_number: u64, timestamp: u64) -> StandardTransaction {
	StandardTransaction::new(
		txid,
		AddressList::default(),
		None,
		"0",
		block_number,
		timestamp,
	)
}
