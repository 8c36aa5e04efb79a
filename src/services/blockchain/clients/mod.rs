//! Blockchain client implementations.
//!
//! Contains one client per supported chain plus the Esplora REST client used for Bitcoin
//! address history. Each client exposes a trait so that providers and history fetchers can
//! be exercised against mocks.

mod bitcoin {
	pub mod client;
}
mod esplora {
	pub mod client;
}
mod evm {
	pub mod client;
}
mod solana {
	pub mod client;
}

pub use bitcoin::client::{BitcoinClient, BitcoinClientTrait};
pub use esplora::client::{EsploraClient, EsploraClientTrait, ESPLORA_PAGE_SIZE};
pub use evm::client::{EvmClient, EvmClientTrait, MAX_TRANSFERS_PER_PAGE};
pub use solana::client::{SolanaClient, SolanaClientTrait, MAX_SIGNATURES_PER_PAGE};

use serde_json::Value;

use crate::services::blockchain::BlockChainError;

/// Extracts the `result` member of a JSON-RPC response
///
/// A non-null `error` member is turned into a request error.
fn rpc_result(mut response: Value, method: &str) -> Result<Value, BlockChainError> {
	if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
		return Err(BlockChainError::request_error(format!(
			"{} failed: {}",
			method, error
		)));
	}
	response
		.get_mut("result")
		.map(Value::take)
		.ok_or_else(|| BlockChainError::request_error(format!("{}: missing 'result' field", method)))
}
