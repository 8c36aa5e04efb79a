//! Ethereum client implementation.
//!
//! Covers the calls needed for head polling, block and transaction lookup and the
//! `alchemy_getAssetTransfers` address index used for history.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::{
		evm::{EVMAssetTransfersPage, EVMBlock, EVMTransaction},
		ChainEndpoints,
	},
	services::blockchain::{
		clients::rpc_result,
		transports::{BlockchainTransport, EVMTransportClient},
		BlockChainError,
	},
};

/// Maximum number of transfers per `alchemy_getAssetTransfers` page
pub const MAX_TRANSFERS_PER_PAGE: u64 = 1000;

/// Client implementation for Ethereum JSON-RPC nodes
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying transport client for RPC communication
	transport: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(transport: T) -> Self {
		Self { transport }
	}
}

impl EvmClient<EVMTransportClient> {
	/// Creates a new EVM client instance
	///
	/// # Arguments
	/// * `endpoints` - Configured Ethereum endpoints
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - New client instance or connection error
	pub async fn new(endpoints: &ChainEndpoints) -> Result<Self, BlockChainError> {
		let transport = EVMTransportClient::new(&endpoints.polling)
			.await
			.map_err(|e| BlockChainError::connection_error(format!("{:#}", e)))?;
		Ok(Self::new_with_transport(transport))
	}
}

/// Ethereum specific operations
#[async_trait]
pub trait EvmClientTrait: Send + Sync {
	/// Retrieves the latest block number
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError>;

	/// Retrieves a block header with the hashes of its transactions
	///
	/// # Errors
	/// * `BlockNotFound` when the node does not know the block
	async fn get_block_by_number(&self, number: u64) -> Result<EVMBlock, BlockChainError>;

	/// Retrieves a transaction by hash, None when the node does not know it
	async fn get_transaction_by_hash(
		&self,
		hash: &str,
	) -> Result<Option<EVMTransaction>, BlockChainError>;

	/// Retrieves one page of external transfers sent by `from_address`
	///
	/// Transfers are listed oldest first from `from_block`. Without a starting block the most
	/// recent transfers are listed first.
	///
	/// # Arguments
	/// * `from_address` - Sender to query
	/// * `from_block` - First block to include, None for the whole history newest first
	/// * `page_key` - Cursor returned by the previous page
	async fn get_asset_transfers(
		&self,
		from_address: &str,
		from_block: Option<u64>,
		page_key: Option<String>,
	) -> Result<EVMAssetTransfersPage, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> EvmClientTrait for EvmClient<T> {
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError> {
		let response = self
			.transport
			.send_raw_request::<Value>("eth_blockNumber", None)
			.await?;
		let result = rpc_result(response, "eth_blockNumber")?;
		let hex_str = result.as_str().ok_or_else(|| {
			BlockChainError::request_error("eth_blockNumber: result is not a string")
		})?;

		u64::from_str_radix(hex_str.trim_start_matches("0x"), 16).map_err(|e| {
			BlockChainError::request_error(format!("Failed to parse block number: {}", e))
		})
	}

	async fn get_block_by_number(&self, number: u64) -> Result<EVMBlock, BlockChainError> {
		let params = json!([format!("0x{:x}", number), false]);
		let response = self
			.transport
			.send_raw_request("eth_getBlockByNumber", Some(params))
			.await?;
		let result = rpc_result(response, "eth_getBlockByNumber")?;
		if result.is_null() {
			return Err(BlockChainError::block_not_found(number));
		}

		serde_json::from_value(result)
			.map_err(|e| BlockChainError::request_error(format!("Failed to parse block: {}", e)))
	}

	async fn get_transaction_by_hash(
		&self,
		hash: &str,
	) -> Result<Option<EVMTransaction>, BlockChainError> {
		let response = self
			.transport
			.send_raw_request("eth_getTransactionByHash", Some(json!([hash])))
			.await?;
		let result = rpc_result(response, "eth_getTransactionByHash")?;
		if result.is_null() {
			return Ok(None);
		}

		serde_json::from_value(result).map(Some).map_err(|e| {
			BlockChainError::transaction_error(format!("Failed to parse transaction {}: {}", hash, e))
		})
	}

	async fn get_asset_transfers(
		&self,
		from_address: &str,
		from_block: Option<u64>,
		page_key: Option<String>,
	) -> Result<EVMAssetTransfersPage, BlockChainError> {
		let mut query = json!({
			"fromBlock": format!("0x{:x}", from_block.unwrap_or_default()),
			"toBlock": "latest",
			"fromAddress": from_address,
			"category": ["external"],
			"withMetadata": true,
			"excludeZeroValue": false,
			"order": if from_block.is_some() { "asc" } else { "desc" },
			"maxCount": format!("0x{:x}", MAX_TRANSFERS_PER_PAGE),
		});
		if let Some(page_key) = page_key {
			query["pageKey"] = Value::String(page_key);
		}

		let response = self
			.transport
			.send_raw_request("alchemy_getAssetTransfers", Some(json!([query])))
			.await?;
		let result = rpc_result(response, "alchemy_getAssetTransfers")?;

		serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(format!("Failed to parse asset transfers: {}", e))
		})
	}
}
