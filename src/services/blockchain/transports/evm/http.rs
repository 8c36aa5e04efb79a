//! EVM transport implementation for blockchain interactions.
//!
//! Wraps the [`HttpTransportClient`] and probes endpoints with `net_version`.

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde_json::{json, Value};

use crate::services::blockchain::transports::{
	BlockchainTransport, HttpTransportClient, RotatingTransport, TransientErrorRetryStrategy,
	TransportError,
};

/// A client for interacting with Ethereum JSON-RPC nodes
#[derive(Clone, Debug)]
pub struct EVMTransportClient {
	/// The underlying HTTP transport client that handles actual RPC communications
	http_client: HttpTransportClient,
}

impl EVMTransportClient {
	/// Creates a new EVM transport client on the first reachable URL
	///
	/// # Arguments
	/// * `urls` - Candidate RPC URLs, first preferred
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - A new client instance or connection error
	pub async fn new(urls: &[String]) -> Result<Self, anyhow::Error> {
		let test_connection_payload =
			json!({"id": 1, "jsonrpc": "2.0", "method": "net_version", "params": []});
		let http_client = HttpTransportClient::new(urls, test_connection_payload).await?;
		Ok(Self { http_client })
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for EVMTransportClient {
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
impl RotatingTransport for EVMTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		self.http_client.try_connect(url).await
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		self.http_client.update_client(url).await
	}
}
