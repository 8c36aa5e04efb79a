//! Rotation of HTTP JSON-RPC endpoints.
//!
//! One URL is active at a time. When a request cannot reach it, or it answers with a status in
//! [`ROTATE_ON_ERROR_CODES`], the next reachable fallback becomes active and the request is
//! replayed against it. The previously active URL goes to the back of the fallback list.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware, RetryableStrategy};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::services::blockchain::transports::{
	RotatingTransport, TransportError, ROTATE_ON_ERROR_CODES,
};

/// Active endpoint, its fallbacks and the middleware client used to reach them
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	rotation_lock: Arc<Mutex<()>>,
}

impl EndpointManager {
	/// Creates a manager starting on `active_url`
	///
	/// # Arguments
	/// * `client` - Middleware client used for every request
	/// * `active_url` - URL used until a rotation happens
	/// * `fallback_urls` - URLs tried, in order, when the active one fails
	pub fn new(client: ClientWithMiddleware, active_url: &str, fallback_urls: Vec<String>) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			client,
			rotation_lock: Arc::new(Mutex::new(())),
		}
	}

	/// Replaces the middleware client
	pub fn update_client(&mut self, client: ClientWithMiddleware) {
		self.client = client;
	}

	/// Wraps the current client in a new retry layer
	pub fn set_retry_policy<R: RetryableStrategy + Send + Sync + 'static>(
		&mut self,
		retry_policy: ExponentialBackoff,
		retry_strategy: R,
	) {
		let client = ClientBuilder::from_client(self.client.clone())
			.with(RetryTransientMiddleware::new_with_policy_and_strategy(
				retry_policy,
				retry_strategy,
			))
			.build();
		self.update_client(client);
	}

	/// Makes the first reachable fallback the active URL
	///
	/// Only one rotation runs at a time. A fallback that fails the connection test is put back
	/// at the end of the list.
	pub async fn rotate_url<T: RotatingTransport>(
		&self,
		transport: &T,
	) -> Result<(), anyhow::Error> {
		let _guard = self.rotation_lock.lock().await;
		let previous = self.active_url.read().await.clone();

		let candidate = {
			let mut fallbacks = self.fallback_urls.write().await;
			match fallbacks.iter().position(|url| url != &previous) {
				Some(index) => fallbacks.remove(index),
				None => return Err(anyhow::anyhow!("No fallback URLs available")),
			}
		};

		if let Err(e) = transport.try_connect(&candidate).await {
			self.fallback_urls.write().await.push(candidate);
			return Err(e.context("Fallback URL is unreachable"));
		}

		transport.update_client(&candidate).await?;
		*self.active_url.write().await = candidate.clone();
		self.fallback_urls.write().await.push(previous.clone());
		tracing::info!(from = %previous, to = %candidate, "Rotated RPC endpoint");
		Ok(())
	}

	/// Rotates when fallbacks exist and the failure warrants it
	///
	/// # Arguments
	/// * `transport` - Transport owning this manager
	/// * `status` - HTTP status of the failed response, None for network failures
	///
	/// # Returns
	/// * `Ok(true)` - A rotation happened and the request should be replayed
	/// * `Ok(false)` - The failure is final
	async fn rotate_on_failure<T: RotatingTransport>(
		&self,
		transport: &T,
		status: Option<u16>,
	) -> Result<bool, anyhow::Error> {
		let eligible = status.is_none_or(|code| ROTATE_ON_ERROR_CODES.contains(&code));
		if !eligible || self.fallback_urls.read().await.is_empty() {
			return Ok(false);
		}
		self.rotate_url(transport).await?;
		Ok(true)
	}

	/// Posts a JSON-RPC request to the active URL, rotating and replaying on failure
	///
	/// # Arguments
	/// * `transport` - Transport owning this manager, used to shape the request body
	/// * `method` - RPC method name
	/// * `params` - RPC parameters
	///
	/// # Returns
	/// * `Result<Value, TransportError>` - The full JSON-RPC response envelope
	pub async fn send_raw_request<
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError> {
		loop {
			let url = self.active_url.read().await.clone();
			let body = transport.customize_request(method, params.clone()).await;
			let body = serde_json::to_string(&body).map_err(|e| {
				TransportError::request_serialization(format!("{} request: {}", method, e))
			})?;

			let response = match self
				.client
				.post(url.as_str())
				.header("Content-Type", "application/json")
				.body(body)
				.send()
				.await
			{
				Ok(response) => response,
				Err(network_error) => {
					tracing::warn!(%url, method, "Request failed: {}", network_error);
					match self.rotate_on_failure(transport, None).await {
						Ok(true) => continue,
						Ok(false) => {
							return Err(TransportError::network(format!(
								"{} request to {} failed: {}",
								method, url, network_error
							)))
						}
						Err(e) => {
							return Err(TransportError::url_rotation(format!(
								"after network error on {}: {:#}",
								url, e
							)))
						}
					}
				}
			};

			let status = response.status();
			if !status.is_success() {
				let body = response.text().await.unwrap_or_default();
				tracing::warn!(%url, method, status = status.as_u16(), "Request rejected");
				match self.rotate_on_failure(transport, Some(status.as_u16())).await {
					Ok(true) => continue,
					Ok(false) => return Err(TransportError::http(status.as_u16(), url, body)),
					Err(e) => {
						return Err(TransportError::url_rotation(format!(
							"after HTTP {} on {}: {:#}",
							status.as_u16(),
							url,
							e
						)))
					}
				}
			}

			return response.json().await.map_err(|e| {
				TransportError::response_parse(format!("{} response from {}: {}", method, url, e))
			});
		}
	}
}
