//! Bitcoin block data structures.

use serde::{Deserialize, Serialize};

/// Block returned by `getblock <hash> 1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
	/// Block hash
	pub hash: String,
	/// Block height
	pub height: u64,
	/// Block time, unix seconds
	pub time: u64,
	/// Transaction ids in block order
	#[serde(default)]
	pub tx: Vec<String>,
}
