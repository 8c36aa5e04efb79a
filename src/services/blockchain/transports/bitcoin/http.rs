//! Bitcoin Core transport implementation.
//!
//! Bitcoin Core speaks JSON-RPC 1.0, so requests are sent with `"jsonrpc": "1.0"`. Credentials,
//! when needed, are carried in the URL user info and sent as basic auth.

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde_json::{json, Value};

use crate::services::blockchain::transports::{
	BlockchainTransport, HttpTransportClient, RotatingTransport, TransientErrorRetryStrategy,
	TransportError,
};

/// A client for interacting with Bitcoin Core RPC nodes
#[derive(Clone, Debug)]
pub struct BitcoinTransportClient {
	http_client: HttpTransportClient,
}

impl BitcoinTransportClient {
	/// Creates a new Bitcoin transport client on the first reachable URL
	///
	/// Endpoints are probed with `getblockcount`.
	pub async fn new(urls: &[String]) -> Result<Self, anyhow::Error> {
		let test_connection_payload =
			json!({"id": 1, "jsonrpc": "1.0", "method": "getblockcount", "params": []});
		let http_client = HttpTransportClient::new(urls, test_connection_payload)
			.await?
			.with_json_rpc_version("1.0");
		Ok(Self { http_client })
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for BitcoinTransportClient {
	async fn get_current_url(&self) -> String {
		self.http_client.get_current_url().await
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.http_client.send_raw_request(method, params).await
	}

	fn set_retry_policy(
		&mut self,
		retry_policy: ExponentialBackoff,
		retry_strategy: Option<TransientErrorRetryStrategy>,
	) -> Result<(), anyhow::Error> {
		self.http_client
			.set_retry_policy(retry_policy, retry_strategy)
	}

	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		self.http_client.update_endpoint_manager_client(client)
	}
}

#[async_trait::async_trait]
impl RotatingTransport for BitcoinTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		self.http_client.try_connect(url).await
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		self.http_client.update_client(url).await
	}
}
