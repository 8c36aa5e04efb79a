use mockito::{Matcher, Server, ServerGuard};
use reqwest_middleware::ClientBuilder;
use serde_json::{json, Value};

use blokbustr::services::blockchain::{
	BlockchainTransport, EVMTransportClient, HttpEndpointManager, TransportError,
};

use crate::integration::mocks::MockRpcTransport;

async fn rpc_server(block_number_status: usize) -> ServerGuard {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "net_version"})))
		.with_status(200)
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"1"}"#)
		.create_async()
		.await;
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
		.with_status(block_number_status)
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#)
		.create_async()
		.await;
	server
}

fn plain_client() -> reqwest_middleware::ClientWithMiddleware {
	ClientBuilder::new(reqwest::Client::new()).build()
}

#[tokio::test]
async fn test_rotates_on_rate_limit() {
	let limited = rpc_server(429).await;
	let healthy = rpc_server(200).await;

	let transport = EVMTransportClient::new(&[limited.url(), healthy.url()])
		.await
		.unwrap();
	assert_eq!(transport.get_current_url().await, limited.url());

	let response = transport
		.send_raw_request::<Value>("eth_blockNumber", None)
		.await
		.unwrap();
	assert_eq!(response["result"], "0x10");
	assert_eq!(transport.get_current_url().await, healthy.url());
}

#[tokio::test]
async fn test_unreachable_urls_are_skipped_on_startup() {
	let healthy = rpc_server(200).await;
	let transport = EVMTransportClient::new(&[
		"not a url".to_string(),
		"http://127.0.0.1:1".to_string(),
		healthy.url(),
	])
	.await
	.unwrap();
	assert_eq!(transport.get_current_url().await, healthy.url());
}

#[tokio::test]
async fn test_no_reachable_url_is_an_error() {
	let result = EVMTransportClient::new(&["http://127.0.0.1:1".to_string()]).await;
	assert!(result.is_err());
}

#[tokio::test]
async fn test_rotates_on_network_error() {
	let healthy = rpc_server(200).await;
	let manager = HttpEndpointManager::new(plain_client(), "http://127.0.0.1:1", vec![healthy.url()]);

	let response = manager
		.send_raw_request(&MockRpcTransport::new(), "eth_blockNumber", None::<Value>)
		.await
		.unwrap();
	assert_eq!(response["result"], "0x10");
	assert_eq!(*manager.active_url.read().await, healthy.url());
	assert_eq!(
		*manager.fallback_urls.read().await,
		vec!["http://127.0.0.1:1".to_string()]
	);
}

#[tokio::test]
async fn test_server_error_does_not_rotate() {
	let failing = rpc_server(500).await;
	let healthy = rpc_server(200).await;
	let manager = HttpEndpointManager::new(plain_client(), &failing.url(), vec![healthy.url()]);

	let result = manager
		.send_raw_request(&MockRpcTransport::new(), "eth_blockNumber", None::<Value>)
		.await;
	assert!(matches!(result, Err(TransportError::Http { status: 500, .. })));
	assert_eq!(*manager.active_url.read().await, failing.url());
}

#[tokio::test]
async fn test_rate_limit_without_fallback_is_final() {
	let limited = rpc_server(429).await;
	let manager = HttpEndpointManager::new(plain_client(), &limited.url(), vec![]);

	let result = manager
		.send_raw_request(&MockRpcTransport::new(), "eth_blockNumber", None::<Value>)
		.await;
	assert!(matches!(result, Err(TransportError::Http { status: 429, .. })));
}
