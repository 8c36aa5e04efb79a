//! Exploration task model.
//!
//! An [`ExplorationTask`] describes one address to trace forward from a cursor transaction. It is
//! serialized as the JSON body of a queue message.

use serde::{Deserialize, Serialize};

use crate::models::Chain;

/// Deepest hop, counted from the seed address, that is still explored
pub const MAX_DEPTH: u32 = 5;

/// Unit of work describing one address/cursor/depth to trace forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationTask {
	/// Address whose outbound transactions are followed
	pub address: String,
	/// Transaction after which history is considered
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start_tx: Option<String>,
	/// Amount that reached `address`, as a decimal integer string
	pub amount_to_track: String,
	/// Chain the address lives on
	pub chain: Chain,
	/// Number of hops from the seed address
	#[serde(default)]
	pub depth: u32,
}

impl ExplorationTask {
	/// Creates the depth 0 task for a seed address
	pub fn seed(
		chain: Chain,
		address: impl Into<String>,
		start_tx: Option<String>,
		amount_to_track: impl Into<String>,
	) -> Self {
		Self {
			address: address.into(),
			start_tx,
			amount_to_track: amount_to_track.into(),
			chain,
			depth: 0,
		}
	}

	/// Builds the task following a flow of `amount` to `address` through transaction `tx_hash`
	pub fn child(
		&self,
		address: impl Into<String>,
		tx_hash: impl Into<String>,
		amount: impl Into<String>,
	) -> Self {
		Self {
			address: address.into(),
			start_tx: Some(tx_hash.into()),
			amount_to_track: amount.into(),
			chain: self.chain,
			depth: self.depth + 1,
		}
	}

	/// Whether the task sits on or past the exploration horizon
	///
	/// Children of such a task would be deeper than [`MAX_DEPTH`], so it is never expanded.
	pub fn at_depth_limit(&self) -> bool {
		self.depth >= MAX_DEPTH
	}
}
