//! HTTP transport implementation for blockchain interactions.
//!
//! A JSON-RPC client over HTTP shared by every chain. It probes the configured URLs in order,
//! keeps the first one that answers as active and the others as fallbacks, and retries
//! transient failures with exponential backoff.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use url::Url;

use crate::{
	services::blockchain::transports::{
		BlockchainTransport, HttpEndpointManager, RotatingTransport, TransientErrorRetryStrategy,
		TransportError,
	},
	utils::http::{create_retryable_http_client, HttpRetryConfig},
};

/// JSON-RPC client over HTTP with endpoint failover
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Plain HTTP client used for connection probes
	pub client: Arc<Client>,
	/// Active and fallback endpoints
	endpoint_manager: HttpEndpointManager,
	/// Request sent to probe an endpoint
	test_connection_payload: Value,
	/// Value of the `jsonrpc` member of every request
	json_rpc_version: &'static str,
}

impl HttpTransportClient {
	/// Creates a client on the first reachable URL
	///
	/// # Arguments
	/// * `urls` - Candidate URLs in order of preference
	/// * `test_connection_payload` - JSON-RPC request used to probe an endpoint
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New client or an error when no URL answers
	pub async fn new(urls: &[String], test_connection_payload: Value) -> Result<Self, anyhow::Error> {
		let http_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create HTTP client")?;

		let retrying_client = create_retryable_http_client(
			&HttpRetryConfig::default(),
			http_client.clone(),
			Some(TransientErrorRetryStrategy),
		);

		for url in urls {
			if Url::parse(url).is_err() {
				tracing::warn!(%url, "Skipping invalid RPC URL");
				continue;
			}

			match probe(&http_client, url, &test_connection_payload).await {
				Ok(()) => {
					let fallback_urls = urls.iter().filter(|u| *u != url).cloned().collect();
					return Ok(Self {
						client: Arc::new(http_client),
						endpoint_manager: HttpEndpointManager::new(
							retrying_client,
							url,
							fallback_urls,
						),
						test_connection_payload,
						json_rpc_version: "2.0",
					});
				}
				Err(e) => tracing::warn!(%url, "RPC endpoint unavailable: {:#}", e),
			}
		}

		Err(anyhow::anyhow!("All RPC URLs failed to connect"))
	}

	/// Overrides the `jsonrpc` member of outgoing requests
	pub fn with_json_rpc_version(mut self, version: &'static str) -> Self {
		self.json_rpc_version = version;
		self
	}
}

async fn probe(client: &Client, url: &str, payload: &Value) -> Result<(), anyhow::Error> {
	let response = client
		.post(url)
		.json(payload)
		.send()
		.await
		.with_context(|| format!("Failed to connect to {}", url))?;

	let status = response.status();
	if !status.is_success() {
		return Err(anyhow::anyhow!(
			"Failed to connect to {}: {}",
			url,
			status.as_u16()
		));
	}
	Ok(())
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}

	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": self.json_rpc_version,
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into()).unwrap_or_else(|| json!([]))
		})
	}

	fn set_retry_policy(
		&mut self,
		retry_policy: ExponentialBackoff,
		retry_strategy: Option<TransientErrorRetryStrategy>,
	) -> Result<(), anyhow::Error> {
		self.endpoint_manager
			.set_retry_policy(retry_policy, retry_strategy.unwrap_or_default());
		Ok(())
	}

	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		self.endpoint_manager.update_client(client);
		Ok(())
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		probe(&self.client, url, &self.test_connection_payload).await
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		let parsed = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		// The endpoint manager owns the active URL, the HTTP client itself is URL agnostic
		*self.endpoint_manager.active_url.write().await =
			parsed.as_str().trim_end_matches('/').to_string();
		Ok(())
	}
}
