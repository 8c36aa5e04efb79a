//! Solana client implementation.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::{
		solana::{SolanaBlock, SolanaConfirmedTransaction, SolanaSignatureInfo},
		ChainEndpoints,
	},
	services::blockchain::{
		clients::rpc_result,
		transports::{BlockchainTransport, SolanaTransportClient},
		BlockChainError,
	},
};

/// Largest page accepted by `getSignaturesForAddress`
pub const MAX_SIGNATURES_PER_PAGE: usize = 1000;

/// Client implementation for Solana RPC nodes
#[derive(Clone)]
pub struct SolanaClient<T: Send + Sync + Clone> {
	transport: T,
}

impl<T: Send + Sync + Clone> SolanaClient<T> {
	/// Creates a new Solana client instance with a specific transport client
	pub fn new_with_transport(transport: T) -> Self {
		Self { transport }
	}
}

impl SolanaClient<SolanaTransportClient> {
	/// Creates a new Solana client on the configured polling endpoints
	pub async fn new(endpoints: &ChainEndpoints) -> Result<Self, BlockChainError> {
		let transport = SolanaTransportClient::new(&endpoints.polling)
			.await
			.map_err(|e| BlockChainError::connection_error(format!("{:#}", e)))?;
		Ok(Self::new_with_transport(transport))
	}
}

/// Solana specific operations
#[async_trait]
pub trait SolanaClientTrait: Send + Sync {
	/// Current slot
	async fn get_slot(&self) -> Result<u64, BlockChainError>;

	/// Block produced in `slot`, None for skipped slots
	async fn get_block(&self, slot: u64) -> Result<Option<SolanaBlock>, BlockChainError>;

	/// Confirmed transaction by signature, None when unknown
	async fn get_transaction(
		&self,
		signature: &str,
	) -> Result<Option<SolanaConfirmedTransaction>, BlockChainError>;

	/// Signatures involving `address`, newest first
	///
	/// # Arguments
	/// * `address` - Account to query
	/// * `before` - Only return signatures older than this one
	/// * `limit` - Page size, at most [`MAX_SIGNATURES_PER_PAGE`]
	async fn get_signatures_for_address(
		&self,
		address: &str,
		before: Option<String>,
		limit: usize,
	) -> Result<Vec<SolanaSignatureInfo>, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> SolanaClientTrait for SolanaClient<T> {
	async fn get_slot(&self) -> Result<u64, BlockChainError> {
		let response = self
			.transport
			.send_raw_request::<Value>("getSlot", None)
			.await?;
		rpc_result(response, "getSlot")?
			.as_u64()
			.ok_or_else(|| BlockChainError::request_error("getSlot: result is not a number"))
	}

	async fn get_block(&self, slot: u64) -> Result<Option<SolanaBlock>, BlockChainError> {
		let params = json!([slot, {
			"encoding": "json",
			"transactionDetails": "full",
			"maxSupportedTransactionVersion": 0,
			"rewards": false
		}]);
		let response = self
			.transport
			.send_raw_request("getBlock", Some(params))
			.await?;
		let result = rpc_result(response, "getBlock")?;
		if result.is_null() {
			return Ok(None);
		}

		serde_json::from_value(result)
			.map(Some)
			.map_err(|e| BlockChainError::request_error(format!("Failed to parse block: {}", e)))
	}

	async fn get_transaction(
		&self,
		signature: &str,
	) -> Result<Option<SolanaConfirmedTransaction>, BlockChainError> {
		let params = json!([signature, {
			"encoding": "json",
			"maxSupportedTransactionVersion": 0
		}]);
		let response = self
			.transport
			.send_raw_request("getTransaction", Some(params))
			.await?;
		let result = rpc_result(response, "getTransaction")?;
		if result.is_null() {
			return Ok(None);
		}

		serde_json::from_value(result).map(Some).map_err(|e| {
			BlockChainError::transaction_error(format!(
				"Failed to parse transaction {}: {}",
				signature, e
			))
		})
	}

	async fn get_signatures_for_address(
		&self,
		address: &str,
		before: Option<String>,
		limit: usize,
	) -> Result<Vec<SolanaSignatureInfo>, BlockChainError> {
		let mut options = json!({"limit": limit.min(MAX_SIGNATURES_PER_PAGE)});
		if let Some(before) = before {
			options["before"] = Value::String(before);
		}
		let response = self
			.transport
			.send_raw_request("getSignaturesForAddress", Some(json!([address, options])))
			.await?;
		let result = rpc_result(response, "getSignaturesForAddress")?;

		serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(format!("Failed to parse signatures: {}", e))
		})
	}
}
