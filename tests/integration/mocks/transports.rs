use mockall::mock;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde_json::{json, Value};

use blokbustr::services::blockchain::{
	BlockchainTransport, RotatingTransport, TransientErrorRetryStrategy, TransportError,
};

// Mock implementation of a JSON-RPC transport.
// Shared by the Ethereum, Bitcoin Core and Solana clients, which only differ in the methods
// they call.
mock! {
	pub RpcTransport {
		pub async fn send_raw_request(&self, method: &str, params: Option<Value>) -> Result<Value, TransportError>;
		pub async fn get_current_url(&self) -> String;
	}

	impl Clone for RpcTransport {
		fn clone(&self) -> Self;
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for MockRpcTransport {
	async fn get_current_url(&self) -> String {
		self.get_current_url().await
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.send_raw_request(method, params.map(|p| p.into())).await
	}

	fn set_retry_policy(
		&mut self,
		_: ExponentialBackoff,
		_: Option<TransientErrorRetryStrategy>,
	) -> Result<(), anyhow::Error> {
		Ok(())
	}

	fn update_endpoint_manager_client(
		&mut self,
		_: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		Ok(())
	}
}

#[async_trait::async_trait]
impl RotatingTransport for MockRpcTransport {
	async fn try_connect(&self, _url: &str) -> Result<(), anyhow::Error> {
		Ok(())
	}

	async fn update_client(&self, _url: &str) -> Result<(), anyhow::Error> {
		Ok(())
	}
}

/// Wraps `result` in a JSON-RPC response envelope
pub fn rpc_response(result: Value) -> Value {
	json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

/// Transport answering `method` once with `result`
pub fn transport_returning(method: &'static str, result: Value) -> MockRpcTransport {
	let mut transport = MockRpcTransport::new();
	transport
		.expect_send_raw_request()
		.withf(move |m, _| m == method)
		.times(1)
		.returning(move |_, _| Ok(rpc_response(result.clone())));
	transport
}
