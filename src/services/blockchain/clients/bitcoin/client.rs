//! Bitcoin Core client implementation.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::{
		bitcoin::{BitcoinBlock, BitcoinTransaction},
		ChainEndpoints,
	},
	services::blockchain::{
		clients::rpc_result,
		transports::{BitcoinTransportClient, BlockchainTransport},
		BlockChainError,
	},
};

/// Client implementation for Bitcoin Core RPC nodes
#[derive(Clone)]
pub struct BitcoinClient<T: Send + Sync + Clone> {
	transport: T,
}

impl<T: Send + Sync + Clone> BitcoinClient<T> {
	/// Creates a new Bitcoin client instance with a specific transport client
	pub fn new_with_transport(transport: T) -> Self {
		Self { transport }
	}
}

impl BitcoinClient<BitcoinTransportClient> {
	/// Creates a new Bitcoin client on the configured polling endpoints
	pub async fn new(endpoints: &ChainEndpoints) -> Result<Self, BlockChainError> {
		let transport = BitcoinTransportClient::new(&endpoints.polling)
			.await
			.map_err(|e| BlockChainError::connection_error(format!("{:#}", e)))?;
		Ok(Self::new_with_transport(transport))
	}
}

/// Bitcoin specific operations
#[async_trait]
pub trait BitcoinClientTrait: Send + Sync {
	/// Hash of the tip of the best chain
	async fn get_best_block_hash(&self) -> Result<String, BlockChainError>;

	/// Block with its transaction ids (`getblock <hash> 1`)
	async fn get_block(&self, hash: &str) -> Result<BitcoinBlock, BlockChainError>;

	/// Verbose transaction including spent outputs (`getrawtransaction <txid> 2`)
	async fn get_raw_transaction(&self, txid: &str) -> Result<BitcoinTransaction, BlockChainError>;
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BitcoinClientTrait for BitcoinClient<T> {
	async fn get_best_block_hash(&self) -> Result<String, BlockChainError> {
		let response = self
			.transport
			.send_raw_request::<Value>("getbestblockhash", None)
			.await?;
		rpc_result(response, "getbestblockhash")?
			.as_str()
			.map(str::to_string)
			.ok_or_else(|| BlockChainError::request_error("getbestblockhash: result is not a string"))
	}

	async fn get_block(&self, hash: &str) -> Result<BitcoinBlock, BlockChainError> {
		let response = self
			.transport
			.send_raw_request("getblock", Some(json!([hash, 1])))
			.await?;
		let result = rpc_result(response, "getblock")?;
		if result.is_null() {
			return Err(BlockChainError::block_not_found(hash));
		}

		serde_json::from_value(result)
			.map_err(|e| BlockChainError::request_error(format!("Failed to parse block: {}", e)))
	}

	async fn get_raw_transaction(&self, txid: &str) -> Result<BitcoinTransaction, BlockChainError> {
		let response = self
			.transport
			.send_raw_request("getrawtransaction", Some(json!([txid, 2])))
			.await?;
		let result = rpc_result(response, "getrawtransaction")?;

		serde_json::from_value(result).map_err(|e| {
			BlockChainError::transaction_error(format!("Failed to parse transaction {}: {}", txid, e))
		})
	}
}
