//! Network transport implementations for blockchain clients.
//!
//! Provides concrete implementations for the protocols spoken by the supported chains:
//! - JSON-RPC over HTTP with endpoint rotation for Ethereum, Bitcoin Core and Solana
//! - JSON-RPC subscriptions over WebSocket for push based ingestion

mod error;
mod http {
	pub mod endpoint_manager;
	pub mod transport;
}
mod evm {
	pub mod http;
}
mod bitcoin {
	pub mod http;
}
mod solana {
	pub mod http;
}
mod ws {
	pub mod config;
	pub mod connection;
	pub mod subscription;
}

pub use bitcoin::http::BitcoinTransportClient;
pub use error::TransportError;
pub use evm::http::EVMTransportClient;
pub use http::{
	endpoint_manager::EndpointManager as HttpEndpointManager, transport::HttpTransportClient,
};
pub use solana::http::SolanaTransportClient;
pub use ws::{
	config::WsConfig, connection::WebSocketConnection, subscription::WsSubscriptionClient,
};

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{
	default_on_request_failure, default_on_request_success, policies::ExponentialBackoff,
	Retryable, RetryableStrategy,
};
use serde::Serialize;
use serde_json::{json, Value};

/// HTTP status codes that trigger RPC endpoint rotation
/// - 429: Too Many Requests - indicates rate limiting from the current endpoint
pub const ROTATE_ON_ERROR_CODES: [u16; 1] = [429];

/// Base trait for all blockchain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the current URL being used by the transport
	async fn get_current_url(&self) -> String;

	/// Send a raw request to the blockchain
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Customizes the request for specific blockchain requirements
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		// Default implementation for JSON-RPC
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into())
		})
	}

	/// Sets the retry policy for the transport
	fn set_retry_policy(
		&mut self,
		retry_policy: ExponentialBackoff,
		retry_strategy: Option<TransientErrorRetryStrategy>,
	) -> Result<(), anyhow::Error>;

	/// Update endpoint manager with a new client
	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error>;
}

/// Extension trait for transports that support URL rotation
#[async_trait::async_trait]
pub trait RotatingTransport: BlockchainTransport {
	/// Attempts to establish a connection with a new URL
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error>;

	/// Updates the client with a new URL
	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error>;
}

/// Retry strategy of the HTTP middleware
///
/// Follows the default transient classification, except that rate limited responses are
/// returned immediately so the endpoint manager can rotate to a fallback URL instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientErrorRetryStrategy;

impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(response) if ROTATE_ON_ERROR_CODES.contains(&response.status().as_u16()) => {
				Some(Retryable::Fatal)
			}
			Ok(response) => default_on_request_success(response),
			Err(error) => default_on_request_failure(error),
		}
	}
}
